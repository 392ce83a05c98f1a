//! Committed events observed through the bus stream interface.

use std::sync::Arc;
use std::time::Duration;

use contract_runtime::{ContractRuntime, ContractSelection, IdentityMode, RuntimeConfig};
use lc_01_world_state::InMemoryLedger;
use lc_03_record_contracts::ContractPreset;
use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};
use shared_types::entities::Credential;
use shared_types::invocation::Invocation;
use tokio_stream::StreamExt;

fn runtime(contract: ContractSelection, bus: Arc<InMemoryEventBus>) -> ContractRuntime<InMemoryLedger> {
    let config = RuntimeConfig {
        contract,
        identity_mode: IdentityMode::PublicKey,
        ..RuntimeConfig::default()
    };
    ContractRuntime::new(&config, InMemoryLedger::new(), bus).expect("runtime")
}

fn user(key: &str) -> Credential {
    Credential::new("Org1MSP", key.as_bytes().to_vec())
}

#[tokio::test]
async fn test_stream_yields_events_in_commit_order() {
    let bus = Arc::new(InMemoryEventBus::new());
    let token = runtime(ContractSelection::Token, Arc::clone(&bus));
    let mut stream = bus.event_stream(EventFilter::names(["transfer"]));

    token
        .invoke(Invocation::new("init", ["TKN", "Token", "100"], user("alice")))
        .await;
    for (to, amount) in [("bob", "10"), ("carol", "20")] {
        let response = token
            .invoke(Invocation::new("transfer", [to, amount], user("alice")))
            .await;
        assert!(response.is_ok(), "{}", response.message);
    }

    let mut amounts = Vec::new();
    for _ in 0..2 {
        let event = tokio::time::timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("event within timeout")
            .expect("open stream");
        amounts.push(event.payload_json().unwrap()["amount"].clone());
    }
    assert_eq!(amounts, vec![serde_json::json!(10), serde_json::json!(20)]);
}

#[tokio::test]
async fn test_topic_filter_separates_contracts() {
    let bus = Arc::new(InMemoryEventBus::new());
    let token = runtime(ContractSelection::Token, Arc::clone(&bus));
    let records = runtime(
        ContractSelection::Record(ContractPreset::BatchKeyValue),
        Arc::clone(&bus),
    );
    let mut record_events = bus.subscribe(EventFilter::topics(vec![EventTopic::RecordContracts]));

    token
        .invoke(Invocation::new("init", ["TKN", "Token", "100"], user("alice")))
        .await;
    records
        .invoke(Invocation::new("set", ["k", "v"], Credential::default()))
        .await;

    let event = record_events.recv().await.expect("record event");
    assert_eq!(event.name(), "set");
    assert_eq!(event.contract, "batch-key-value");
    assert_eq!(record_events.try_recv().unwrap(), None);
}
