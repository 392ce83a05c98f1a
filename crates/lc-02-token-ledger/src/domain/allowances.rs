//! # Allowance Ledger
//!
//! Spending allowances keyed by `("APPROVE", owner, spender)`.

use lc_01_world_state::{KeySchema, WorldState};
use shared_types::entities::Identity;
use shared_types::errors::{ContractError, ContractResult};
use std::sync::LazyLock;

use super::amount::{decode_amount, encode_amount, Amount};

/// Object type of allowance keys.
pub const ALLOWANCE_PREFIX: &str = "APPROVE";

static ALLOWANCE_KEY: LazyLock<KeySchema> =
    LazyLock::new(|| KeySchema::new(ALLOWANCE_PREFIX, ["owner", "spender"]));

pub fn allowance_key(owner: &Identity, spender: &Identity) -> ContractResult<String> {
    ALLOWANCE_KEY.encode(&[owner.as_str(), spender.as_str()])
}

/// Amount `spender` may still move out of `owner`'s account.
pub async fn get_allowance(
    ctx: &mut dyn WorldState,
    owner: &Identity,
    spender: &Identity,
) -> ContractResult<Amount> {
    let key = allowance_key(owner, spender)?;
    match ctx.get_state(&key).await? {
        Some(bytes) => decode_amount(&bytes),
        None => Ok(0),
    }
}

/// Overwrite an allowance.
pub async fn set_allowance(
    ctx: &mut dyn WorldState,
    owner: &Identity,
    spender: &Identity,
    amount: Amount,
) -> ContractResult<()> {
    if amount < 0 {
        return Err(ContractError::InvalidBalance(amount));
    }
    let key = allowance_key(owner, spender)?;
    ctx.put_state(&key, encode_amount(amount)?).await?;
    Ok(())
}
