//! # Transfer Engine
//!
//! Token operations. Each call runs inside one transaction simulation;
//! every check happens before the first write, so a failed call leaves the
//! write-set empty.

use lc_01_world_state::{collect_history, history, WorldState};
use serde::Serialize;
use shared_types::entities::{HistoryEntry, Identity};
use shared_types::errors::{ContractError, ContractResult};
use tracing::{debug, error, instrument};

use super::accounts::{balance_key, get_balance, set_balance};
use super::allowances::{get_allowance, set_allowance};
use super::amount::Amount;
use super::metadata;
use crate::events::{topics, ApproveEvent, TransferEvent};

/// Record an event. Failures are logged and never fail the operation.
fn emit<T: Serialize>(ctx: &mut dyn WorldState, name: &str, payload: &T) {
    let result = serde_json::to_vec(payload)
        .map_err(ContractError::from)
        .and_then(|bytes| ctx.set_event(name, bytes).map_err(ContractError::from));
    if let Err(e) = result {
        error!(tx_id = %ctx.tx_id(), event = name, error = %e, "Failed to record event");
    }
}

fn require_positive(amount: Amount) -> ContractResult<()> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount(format!(
            "{amount} must be greater than zero"
        )));
    }
    Ok(())
}

/// Balance of `identity`; zero for unknown accounts.
pub async fn balance_of(ctx: &mut dyn WorldState, identity: &Identity) -> ContractResult<Amount> {
    get_balance(ctx, identity).await
}

/// Allowance `owner` granted `spender`.
pub async fn allowance_of(
    ctx: &mut dyn WorldState,
    owner: &Identity,
    spender: &Identity,
) -> ContractResult<Amount> {
    get_allowance(ctx, owner, spender).await
}

/// Move `amount` from the caller to `to`. Returns the caller's new balance.
#[instrument(skip(ctx), fields(tx_id = %ctx.tx_id()))]
pub async fn transfer(
    ctx: &mut dyn WorldState,
    caller: &Identity,
    to: &Identity,
    amount: Amount,
) -> ContractResult<Amount> {
    require_positive(amount)?;
    if caller == to {
        return Err(ContractError::SelfTransfer);
    }

    let from_balance = get_balance(ctx, caller).await?;
    if from_balance < amount {
        return Err(ContractError::InsufficientFunds {
            available: from_balance,
            required: amount,
        });
    }
    let to_balance = get_balance(ctx, to).await?;
    let new_to = to_balance.checked_add(amount).ok_or(ContractError::Overflow)?;
    let new_from = from_balance - amount;

    set_balance(ctx, caller, new_from).await?;
    set_balance(ctx, to, new_to).await?;

    emit(
        ctx,
        topics::TRANSFER,
        &TransferEvent {
            from: caller.clone(),
            to: to.clone(),
            amount,
        },
    );
    debug!(new_balance = new_from, "Transfer buffered");
    Ok(new_from)
}

/// Set the caller's allowance for `spender`. Overwrites any previous value.
#[instrument(skip(ctx), fields(tx_id = %ctx.tx_id()))]
pub async fn approve(
    ctx: &mut dyn WorldState,
    caller: &Identity,
    spender: &Identity,
    amount: Amount,
) -> ContractResult<bool> {
    if amount < 0 {
        return Err(ContractError::InvalidAmount(format!(
            "{amount} must not be negative"
        )));
    }
    set_allowance(ctx, caller, spender, amount).await?;
    emit(
        ctx,
        topics::APPROVE,
        &ApproveEvent {
            from: caller.clone(),
            spender: spender.clone(),
            amount,
        },
    );
    Ok(true)
}

/// Move `amount` from `from` to `to` against the caller's allowance.
/// Returns `from`'s new balance.
#[instrument(skip(ctx), fields(tx_id = %ctx.tx_id()))]
pub async fn transfer_from(
    ctx: &mut dyn WorldState,
    caller: &Identity,
    from: &Identity,
    to: &Identity,
    amount: Amount,
) -> ContractResult<Amount> {
    require_positive(amount)?;

    let allowance = get_allowance(ctx, from, caller).await?;
    if allowance < amount {
        return Err(ContractError::InsufficientAllowance {
            available: allowance,
            required: amount,
        });
    }
    let from_balance = get_balance(ctx, from).await?;
    if from_balance < amount {
        return Err(ContractError::InsufficientFunds {
            available: from_balance,
            required: amount,
        });
    }

    let new_from = if from == to {
        // Debit and credit cancel out
        set_balance(ctx, from, from_balance).await?;
        from_balance
    } else {
        let to_balance = get_balance(ctx, to).await?;
        let new_to = to_balance.checked_add(amount).ok_or(ContractError::Overflow)?;
        let new_from = from_balance - amount;
        set_balance(ctx, from, new_from).await?;
        set_balance(ctx, to, new_to).await?;
        new_from
    };
    set_allowance(ctx, from, caller, allowance - amount).await?;

    emit(
        ctx,
        topics::TRANSFER,
        &TransferEvent {
            from: from.clone(),
            to: to.clone(),
            amount,
        },
    );
    Ok(new_from)
}

/// One-time setup: store metadata and credit the caller with the supply.
#[instrument(skip(ctx), fields(tx_id = %ctx.tx_id()))]
pub async fn init(
    ctx: &mut dyn WorldState,
    caller: &Identity,
    symbol: &str,
    name: &str,
    total_supply: Amount,
) -> ContractResult<bool> {
    if total_supply < 0 {
        return Err(ContractError::InvalidAmount(format!(
            "total supply {total_supply} must not be negative"
        )));
    }
    if metadata::is_initialized(ctx).await? {
        return Err(ContractError::AlreadyInitialized);
    }
    metadata::store(ctx, symbol, name, total_supply).await?;
    set_balance(ctx, caller, total_supply).await?;
    Ok(true)
}

/// Every recorded balance of `identity`, most recent first.
pub async fn balance_history(
    ctx: &mut dyn WorldState,
    identity: &Identity,
) -> ContractResult<Vec<HistoryEntry>> {
    let key = balance_key(identity)?;
    let stream = history(ctx, &key).await?;
    Ok(collect_history(stream).await?)
}
