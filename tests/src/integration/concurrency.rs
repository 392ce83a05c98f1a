//! # Concurrency Flows
//!
//! Two simulations over the same snapshot: the first to commit wins, the
//! second is aborted with nothing applied and no event delivered.

#[cfg(test)]
mod tests {
    use lc_01_world_state::{InMemoryLedger, Ledger};
    use lc_02_token_ledger::handler::execute as token_execute;
    use lc_02_token_ledger::operations::TokenOperation;
    use lc_03_record_contracts::ContractPreset;
    use shared_bus::EventFilter;
    use shared_types::entities::{CommitOutcome, Identity};

    use super::super::fixtures::{balance, call, query, record_runtime, seed_balance, token_runtime};

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_second_spend_from_same_account_aborts() {
        let ledger = InMemoryLedger::new();
        let alice = Identity::from("alice");

        let mut init = ledger.begin("tx-init");
        token_execute(TokenOperation::Init, &mut init, Some(&alice), &args(&["T", "T", "100"]))
            .await
            .unwrap();
        ledger.commit(init).await.unwrap();

        // Both simulations read alice's balance at 100
        let mut first = ledger.begin("tx-1");
        let mut second = ledger.begin("tx-2");
        token_execute(TokenOperation::Transfer, &mut first, Some(&alice), &args(&["bob", "80"]))
            .await
            .unwrap();
        token_execute(TokenOperation::Transfer, &mut second, Some(&alice), &args(&["carol", "80"]))
            .await
            .unwrap();

        let receipt = ledger.commit(first).await.unwrap();
        assert!(receipt.outcome.is_committed());
        assert!(receipt.event.is_some());

        let receipt = ledger.commit(second).await.unwrap();
        assert!(matches!(
            receipt.outcome,
            CommitOutcome::ConflictAborted { .. }
        ));
        assert!(receipt.event.is_none());

        let mut read = ledger.begin("tx-read");
        let carol = token_execute(TokenOperation::BalanceOf, &mut read, None, &args(&["carol"]))
            .await
            .unwrap();
        assert_eq!(carol, b"0".to_vec());
        let alice_balance =
            token_execute(TokenOperation::BalanceOf, &mut read, None, &args(&["alice"]))
                .await
                .unwrap();
        assert_eq!(alice_balance, b"20".to_vec());
    }

    #[tokio::test]
    async fn test_disjoint_transactions_both_commit() {
        let ledger = InMemoryLedger::new();
        let alice = Identity::from("alice");
        let dave = Identity::from("dave");

        let mut init = ledger.begin("tx-init");
        token_execute(TokenOperation::Init, &mut init, Some(&alice), &args(&["T", "T", "100"]))
            .await
            .unwrap();
        ledger.commit(init).await.unwrap();

        let mut first = ledger.begin("tx-1");
        let mut second = ledger.begin("tx-2");
        token_execute(TokenOperation::Transfer, &mut first, Some(&alice), &args(&["bob", "10"]))
            .await
            .unwrap();
        token_execute(TokenOperation::Approve, &mut second, Some(&dave), &args(&["erin", "5"]))
            .await
            .unwrap();

        assert!(ledger.commit(first).await.unwrap().outcome.is_committed());
        assert!(ledger.commit(second).await.unwrap().outcome.is_committed());
    }

    #[tokio::test]
    async fn test_failed_invocation_publishes_nothing() {
        let runtime = token_runtime();
        let mut events = runtime.bus().subscribe(EventFilter::all());
        seed_balance(&runtime, "A", 5);

        let response = call(&runtime, "A", "transfer", &["B", "6"]).await;
        assert_eq!(response.status, 400);
        assert_eq!(events.try_recv().unwrap(), None);

        let response = call(&runtime, "A", "transfer", &["B", "5"]).await;
        assert!(response.is_ok());
        let event = events.try_recv().unwrap().expect("event after commit");
        assert_eq!(event.name(), "transfer");
        assert_eq!(balance(&runtime, "B").await, 5);
    }

    #[tokio::test]
    async fn test_reads_publish_nothing() {
        let runtime = record_runtime(ContractPreset::BatchKeyValue);
        query(&runtime, "set", &["k", "v"]).await;

        let mut events = runtime.bus().subscribe(EventFilter::all());
        let response = query(&runtime, "get", &["k"]).await;
        assert!(response.is_ok());
        assert_eq!(events.try_recv().unwrap(), None);
    }
}
