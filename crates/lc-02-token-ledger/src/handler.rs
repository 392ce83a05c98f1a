//! # Token Handler
//!
//! Argument parsing and response encoding around the transfer engine.

use lc_01_world_state::{history_json, WorldState};
use shared_types::entities::Identity;
use shared_types::errors::{Arity, ContractError, ContractResult};
use tracing::debug;

use crate::domain::amount::parse_amount;
use crate::domain::{engine, metadata};
use crate::operations::TokenOperation;

fn to_json<T: serde::Serialize>(value: &T) -> ContractResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Run one token operation inside `ctx`.
///
/// `caller` is the resolved identity of the transaction creator; operations
/// that move value fail with `ContractError::Identity` without it.
pub async fn execute(
    op: TokenOperation,
    ctx: &mut dyn WorldState,
    caller: Option<&Identity>,
    args: &[String],
) -> ContractResult<Vec<u8>> {
    if args.len() != op.arity() {
        return Err(ContractError::ArgumentCount {
            expected: Arity::Exact(op.arity()),
            given: args.len(),
        });
    }
    let require_caller = || {
        caller.ok_or_else(|| ContractError::Identity("no caller identity available".to_string()))
    };
    let identity = |i: usize| Identity::from(args[i].as_str());

    debug!(tx_id = %ctx.tx_id(), operation = %op, "Executing token operation");

    match op {
        TokenOperation::BalanceOf => to_json(&engine::balance_of(ctx, &identity(0)).await?),
        TokenOperation::Allowance => {
            to_json(&engine::allowance_of(ctx, &identity(0), &identity(1)).await?)
        }
        TokenOperation::Approve => {
            let amount = parse_amount(&args[1])?;
            to_json(&engine::approve(ctx, require_caller()?, &identity(0), amount).await?)
        }
        TokenOperation::Transfer => {
            let amount = parse_amount(&args[1])?;
            to_json(&engine::transfer(ctx, require_caller()?, &identity(0), amount).await?)
        }
        TokenOperation::TransferFrom => {
            let amount = parse_amount(&args[2])?;
            to_json(
                &engine::transfer_from(ctx, require_caller()?, &identity(0), &identity(1), amount).await?,
            )
        }
        TokenOperation::Symbol => metadata::symbol(ctx).await,
        TokenOperation::Name => metadata::name(ctx).await,
        TokenOperation::TotalSupply => to_json(&metadata::total_supply(ctx).await?),
        TokenOperation::BalanceHistory => {
            let entries = engine::balance_history(ctx, &identity(0)).await?;
            Ok(history_json(&entries)?)
        }
        TokenOperation::Init => {
            let total_supply = parse_amount(&args[2])?;
            to_json(&engine::init(ctx, require_caller()?, &args[0], &args[1], total_supply).await?)
        }
    }
}
