//! # Token Metadata
//!
//! `symbol` and `name` are stored as raw UTF-8 under plain keys;
//! `totalSupply` as a JSON integer.

use lc_01_world_state::WorldState;
use shared_types::errors::{ContractError, ContractResult};

use super::amount::{decode_amount, encode_amount, Amount};

pub const SYMBOL_KEY: &str = "symbol";
pub const NAME_KEY: &str = "name";
pub const TOTAL_SUPPLY_KEY: &str = "totalSupply";

async fn get_required(ctx: &mut dyn WorldState, key: &str) -> ContractResult<Vec<u8>> {
    ctx.get_state(key)
        .await?
        .ok_or_else(|| ContractError::NotFound {
            key: key.to_string(),
        })
}

pub async fn symbol(ctx: &mut dyn WorldState) -> ContractResult<Vec<u8>> {
    get_required(ctx, SYMBOL_KEY).await
}

pub async fn name(ctx: &mut dyn WorldState) -> ContractResult<Vec<u8>> {
    get_required(ctx, NAME_KEY).await
}

pub async fn total_supply(ctx: &mut dyn WorldState) -> ContractResult<Amount> {
    decode_amount(&get_required(ctx, TOTAL_SUPPLY_KEY).await?)
}

/// True once `init` has committed.
pub async fn is_initialized(ctx: &mut dyn WorldState) -> ContractResult<bool> {
    Ok(ctx.get_state(TOTAL_SUPPLY_KEY).await?.is_some())
}

/// Buffer the metadata writes.
pub async fn store(
    ctx: &mut dyn WorldState,
    symbol: &str,
    name: &str,
    total_supply: Amount,
) -> ContractResult<()> {
    ctx.put_state(SYMBOL_KEY, symbol.as_bytes().to_vec()).await?;
    ctx.put_state(NAME_KEY, name.as_bytes().to_vec()).await?;
    ctx.put_state(TOTAL_SUPPLY_KEY, encode_amount(total_supply)?)
        .await?;
    Ok(())
}
