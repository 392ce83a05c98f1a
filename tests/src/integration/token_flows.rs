//! # Token Flows
//!
//! The token contract driven through the runtime: each call is its own
//! transaction, committed before the next one starts.

#[cfg(test)]
mod tests {
    use lc_01_world_state::Ledger;
    use rand::Rng;
    use shared_bus::EventFilter;
    use shared_types::invocation::Invocation;

    use super::super::fixtures::{
        allowance, balance, call, caller, query, seed_balance, token_runtime,
    };

    // =========================================================================
    // LITERAL SCENARIOS
    // =========================================================================

    #[tokio::test]
    async fn test_scenario_sequence() {
        let runtime = token_runtime();
        let mut events = runtime.bus().subscribe(EventFilter::names(["transfer"]));

        // 1. empty ledger
        assert_eq!(balance(&runtime, "A").await, 0);

        // 2. seeded transfer
        seed_balance(&runtime, "A", 100);
        let response = call(&runtime, "A", "transfer", &["B", "30"]).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.payload_str(), "70");
        assert_eq!(balance(&runtime, "B").await, 30);

        let event = events.recv().await.expect("transfer event");
        assert_eq!(
            event.payload_json().unwrap(),
            serde_json::json!({"from": "A", "to": "B", "amount": 30})
        );

        // 3. approve
        let response = call(&runtime, "A", "approve", &["B", "50"]).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.payload_str(), "true");
        assert_eq!(allowance(&runtime, "A", "B").await, 50);

        // 4. delegated transfer
        let response = call(&runtime, "B", "transferFrom", &["A", "C", "20"]).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.payload_str(), "50");
        assert_eq!(balance(&runtime, "A").await, 50);
        assert_eq!(balance(&runtime, "C").await, 20);
        assert_eq!(allowance(&runtime, "A", "B").await, 30);

        // 5. over the allowance
        let height = runtime.ledger().height();
        let response = call(&runtime, "B", "transferFrom", &["A", "C", "1000"]).await;
        assert_eq!(response.status, 400);
        assert!(response.message.contains("allowance"), "{}", response.message);
        assert_eq!(balance(&runtime, "A").await, 50);
        assert_eq!(balance(&runtime, "C").await, 20);
        assert_eq!(allowance(&runtime, "A", "B").await, 30);
        assert_eq!(runtime.ledger().height(), height);
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    #[tokio::test]
    async fn test_non_positive_amounts_rejected() {
        let runtime = token_runtime();
        seed_balance(&runtime, "A", 100);
        call(&runtime, "A", "approve", &["B", "100"]).await;

        for amount in ["0", "-5"] {
            let response = call(&runtime, "A", "transfer", &["B", amount]).await;
            assert_eq!(response.status, 400, "transfer {amount}");
            let response = call(&runtime, "B", "transferFrom", &["A", "C", amount]).await;
            assert_eq!(response.status, 400, "transferFrom {amount}");
        }
        assert_eq!(balance(&runtime, "A").await, 100);
        assert_eq!(balance(&runtime, "B").await, 0);
    }

    #[tokio::test]
    async fn test_self_transfer_rejected() {
        let runtime = token_runtime();
        seed_balance(&runtime, "A", 10);
        let response = call(&runtime, "A", "transfer", &["A", "1"]).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.message, "forbidden to transfer to same account");
    }

    #[tokio::test]
    async fn test_random_transfers_conserve_supply() {
        let runtime = token_runtime();
        let accounts = ["A", "B", "C", "D"];
        for who in accounts {
            seed_balance(&runtime, who, 1_000);
        }

        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let from = accounts[rng.gen_range(0..accounts.len())];
            let to = accounts[rng.gen_range(0..accounts.len())];
            let amount = rng.gen_range(-10..400i64).to_string();

            let before_from = balance(&runtime, from).await;
            let before_to = balance(&runtime, to).await;
            let response = call(&runtime, from, "transfer", &[to, amount.as_str()]).await;
            let after_from = balance(&runtime, from).await;
            let after_to = balance(&runtime, to).await;

            if response.is_ok() {
                assert_eq!(before_from + before_to, after_from + after_to);
            } else {
                assert_eq!((before_from, before_to), (after_from, after_to));
            }
            assert!(after_from >= 0 && after_to >= 0);
        }

        let mut total = 0;
        for who in accounts {
            total += balance(&runtime, who).await;
        }
        assert_eq!(total, 4_000);
    }

    #[tokio::test]
    async fn test_approve_is_idempotent() {
        let runtime = token_runtime();
        call(&runtime, "A", "approve", &["B", "50"]).await;
        call(&runtime, "A", "approve", &["B", "50"]).await;
        assert_eq!(allowance(&runtime, "A", "B").await, 50);
    }

    #[tokio::test]
    async fn test_transfer_from_needs_funds_and_allowance() {
        let runtime = token_runtime();
        seed_balance(&runtime, "A", 10);
        call(&runtime, "A", "approve", &["B", "100"]).await;

        let response = call(&runtime, "B", "transferFrom", &["A", "C", "11"]).await;
        assert_eq!(response.status, 400);
        assert!(response.message.contains("funds"), "{}", response.message);
        assert_eq!(allowance(&runtime, "A", "B").await, 100);
    }

    #[tokio::test]
    async fn test_balance_history_reverse_chronological() {
        let runtime = token_runtime();
        call(&runtime, "A", "init", &["TKN", "Token", "100"]).await;
        for (i, to) in ["B", "C", "D"].iter().enumerate() {
            let response = runtime
                .invoke(
                    Invocation::new("transfer", [*to, "10"], caller("A"))
                    .with_tx_id(format!("tx-{i}")),
                )
                .await;
            assert!(response.is_ok());
        }

        let response = query(&runtime, "balanceHistory", &["A"]).await;
        let trail: serde_json::Value = serde_json::from_slice(&response.payload).unwrap();
        let trail = trail.as_array().unwrap();
        assert_eq!(trail.len(), 4);
        assert_eq!(trail[0]["TxId"], "tx-2");
        assert_eq!(trail[0]["Value"], 70);
        assert_eq!(trail[1]["TxId"], "tx-1");
        assert_eq!(trail[2]["TxId"], "tx-0");
        assert_eq!(trail[3]["Value"], 100);
    }

    #[tokio::test]
    async fn test_metadata_after_init() {
        let runtime = token_runtime();
        assert_eq!(query(&runtime, "symbol", &[]).await.status, 404);

        call(&runtime, "A", "init", &["TKN", "Token", "100"]).await;
        assert_eq!(query(&runtime, "symbol", &[]).await.payload_str(), "TKN");
        assert_eq!(query(&runtime, "name", &[]).await.payload_str(), "Token");
        assert_eq!(query(&runtime, "totalSupply", &[]).await.payload_str(), "100");
        assert_eq!(balance(&runtime, "A").await, 100);

        let again = call(&runtime, "B", "init", &["X", "X", "1"]).await;
        assert_eq!(again.status, 409);
    }

    #[tokio::test]
    async fn test_wrong_arity_message() {
        let runtime = token_runtime();
        let response = call(&runtime, "A", "transfer", &["B"]).await;
        assert_eq!(response.status, 400);
        assert_eq!(
            response.message,
            "Incorrect number of arguments. Expecting 2 arguments: 1 given."
        );
    }
}
