//! Token amounts and their on-ledger encoding.

use shared_types::errors::{ContractError, ContractResult};

/// Signed so that negative inputs can be detected and rejected.
pub type Amount = i64;

/// Parse a decimal amount argument.
pub fn parse_amount(arg: &str) -> ContractResult<Amount> {
    arg.parse::<Amount>()
        .map_err(|e| ContractError::InvalidAmount(format!("{arg:?}: {e}")))
}

/// Amounts are stored as JSON integers.
pub fn encode_amount(amount: Amount) -> ContractResult<Vec<u8>> {
    Ok(serde_json::to_vec(&amount)?)
}

pub fn decode_amount(bytes: &[u8]) -> ContractResult<Amount> {
    Ok(serde_json::from_slice(bytes)?)
}
