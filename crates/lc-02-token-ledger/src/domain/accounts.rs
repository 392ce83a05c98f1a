//! # Account Ledger
//!
//! Balances keyed by `("BALANCE", identity)`. An absent key reads as zero;
//! accounts are never deleted.

use lc_01_world_state::{KeySchema, WorldState};
use shared_types::entities::Identity;
use shared_types::errors::{ContractError, ContractResult};
use std::sync::LazyLock;

use super::amount::{decode_amount, encode_amount, Amount};

/// Object type of balance keys.
pub const BALANCE_PREFIX: &str = "BALANCE";

static BALANCE_KEY: LazyLock<KeySchema> =
    LazyLock::new(|| KeySchema::new(BALANCE_PREFIX, ["identity"]));

/// Storage key of `identity`'s balance.
pub fn balance_key(identity: &Identity) -> ContractResult<String> {
    BALANCE_KEY.encode(&[identity.as_str()])
}

/// Current balance, or zero if the account was never credited.
pub async fn get_balance(ctx: &mut dyn WorldState, identity: &Identity) -> ContractResult<Amount> {
    let key = balance_key(identity)?;
    match ctx.get_state(&key).await? {
        Some(bytes) => decode_amount(&bytes),
        None => Ok(0),
    }
}

/// Buffer a new balance. Negative balances are rejected.
pub async fn set_balance(
    ctx: &mut dyn WorldState,
    identity: &Identity,
    balance: Amount,
) -> ContractResult<()> {
    if balance < 0 {
        return Err(ContractError::InvalidBalance(balance));
    }
    let key = balance_key(identity)?;
    ctx.put_state(&key, encode_amount(balance)?).await?;
    Ok(())
}
