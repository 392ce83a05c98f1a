//! Shared setup for the integration flows.

use std::sync::Arc;

use contract_runtime::{ContractRuntime, ContractSelection, IdentityMode, RuntimeConfig};
use lc_01_world_state::InMemoryLedger;
use lc_02_token_ledger::domain::balance_key;
use lc_03_record_contracts::ContractPreset;
use shared_bus::InMemoryEventBus;
use shared_types::entities::{Credential, Identity};
use shared_types::invocation::{Invocation, Response};

pub type TestRuntime = ContractRuntime<InMemoryLedger>;

/// Token runtime whose callers are identified by the public key in their
/// certificate field.
pub fn token_runtime() -> TestRuntime {
    let config = RuntimeConfig {
        identity_mode: IdentityMode::PublicKey,
        ..RuntimeConfig::default()
    };
    ContractRuntime::new(&config, InMemoryLedger::new(), Arc::new(InMemoryEventBus::new()))
        .expect("token runtime")
}

/// Runtime serving a record preset.
pub fn record_runtime(preset: ContractPreset) -> TestRuntime {
    let config = RuntimeConfig::for_contract(ContractSelection::Record(preset));
    ContractRuntime::new(&config, InMemoryLedger::new(), Arc::new(InMemoryEventBus::new()))
        .expect("record runtime")
}

/// Credential for the caller with public key `key`.
pub fn caller(key: &str) -> Credential {
    Credential::new("Org1MSP", key.as_bytes().to_vec())
}

/// Commit `balance` for `who` directly, outside any invocation.
pub fn seed_balance(runtime: &TestRuntime, who: &str, balance: i64) {
    let key = balance_key(&Identity::from(who)).expect("balance key");
    runtime
        .ledger()
        .seed("seed", [(key, balance.to_string().into_bytes())]);
}

/// Invoke as `who`.
pub async fn call(runtime: &TestRuntime, who: &str, function: &str, args: &[&str]) -> Response {
    runtime
        .invoke(Invocation::new(function, args.iter().copied(), caller(who)))
        .await
}

/// Invoke without a credential.
pub async fn query(runtime: &TestRuntime, function: &str, args: &[&str]) -> Response {
    runtime
        .invoke(Invocation::new(
            function,
            args.iter().copied(),
            Credential::default(),
        ))
        .await
}

/// `balanceOf(who)` as a number.
pub async fn balance(runtime: &TestRuntime, who: &str) -> i64 {
    let response = query(runtime, "balanceOf", &[who]).await;
    assert!(response.is_ok(), "balanceOf failed: {}", response.message);
    response.payload_str().parse().expect("numeric balance")
}

/// `allowance(owner, spender)` as a number.
pub async fn allowance(runtime: &TestRuntime, owner: &str, spender: &str) -> i64 {
    let response = query(runtime, "allowance", &[owner, spender]).await;
    assert!(response.is_ok(), "allowance failed: {}", response.message);
    response.payload_str().parse().expect("numeric allowance")
}
