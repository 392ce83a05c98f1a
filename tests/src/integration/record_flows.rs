//! # Record Flows
//!
//! Record presets driven through the runtime.

#[cfg(test)]
mod tests {
    use lc_01_world_state::{KeySchema, Ledger};
    use lc_03_record_contracts::{ContractPreset, PROBE_RESPONSE};
    use shared_bus::{EventFilter, EventTopic};

    use super::super::fixtures::{query, record_runtime};

    #[tokio::test]
    async fn test_get_unknown_key_is_not_found() {
        for preset in [ContractPreset::KeyValue, ContractPreset::BatchKeyValue] {
            let runtime = record_runtime(preset);
            let response = query(&runtime, "get", &["unknown-key"]).await;
            assert_eq!(response.status, 404, "{preset}");
            assert_eq!(response.message, "No value found for key unknown-key");
        }
    }

    #[tokio::test]
    async fn test_batch_set_partial_failure_commits_the_rest() {
        let runtime = record_runtime(ContractPreset::BatchKeyValue);
        let mut events = runtime.bus().subscribe(EventFilter::all());

        let response = query(&runtime, "set", &["k1", "v1", "k2", ""]).await;
        assert_eq!(response.status, 200);
        let body: serde_json::Value = serde_json::from_slice(&response.payload).unwrap();
        assert_eq!(body["result"], serde_json::json!([{"key": "k1", "value": "v1"}]));
        assert_eq!(
            body["errors"],
            serde_json::json!([{"key": "k2", "error": "No value for key"}])
        );

        assert_eq!(runtime.ledger().committed_value("k1"), Some(b"v1".to_vec()));
        assert_eq!(runtime.ledger().committed_value("k2"), None);

        let event = events.recv().await.unwrap();
        assert_eq!(event.name(), "set");
        assert_eq!(event.topic, EventTopic::RecordContracts);
        assert_eq!(event.event.payload, response.payload);
    }

    #[tokio::test]
    async fn test_batch_get_and_delete() {
        let runtime = record_runtime(ContractPreset::BatchKeyValue);
        query(&runtime, "set", &["a", "1", "b", "2"]).await;

        let response = query(&runtime, "get", &["a", "b", "c"]).await;
        let body: serde_json::Value = serde_json::from_slice(&response.payload).unwrap();
        assert_eq!(body["result"].as_array().unwrap().len(), 2);
        assert_eq!(body["errors"][0]["error"], "404 - No value found for key");

        let response = query(&runtime, "del", &["a", "b"]).await;
        assert_eq!(response.payload_str(), r#"["a","b"]"#);
        assert!(runtime.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_probe_call_commits_nothing() {
        let runtime = record_runtime(ContractPreset::TypedRecords);
        let response = query(&runtime, "storeData", &["Xooa Test"]).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.payload_str(), PROBE_RESPONSE);
        assert_eq!(runtime.ledger().height(), 0);
    }

    #[tokio::test]
    async fn test_typed_records_lifecycle() {
        let runtime = record_runtime(ContractPreset::TypedRecords);
        let stored = query(&runtime, "storeData", &["Account", "42", r#"{"name":"Acme"}"#]).await;
        assert_eq!(stored.payload_str(), "42");

        let fetched = query(&runtime, "retrieveData", &["Account", "42"]).await;
        assert_eq!(fetched.payload_str(), r#"{"name":"Acme"}"#);

        let deleted = query(&runtime, "deleteData", &["Account", "42"]).await;
        assert_eq!(deleted.status, 200);
        let fetched = query(&runtime, "retrieveData", &["Account", "42"]).await;
        assert_eq!(fetched.status, 404);

        let empty = query(&runtime, "storeData", &["", "42", "{}"]).await;
        assert_eq!(empty.status, 400);
        assert_eq!(empty.message, "Key must not be empty: sObject");
    }

    #[tokio::test]
    async fn test_tilde_segments_do_not_collide() {
        let runtime = record_runtime(ContractPreset::RealmEntities);
        query(&runtime, "saveNewEvent", &["a~b", "c", "k", r#"{"v":1}"#]).await;
        query(&runtime, "saveNewEvent", &["a", "b~c", "k", r#"{"v":2}"#]).await;

        let first = query(&runtime, "getEntityDetails", &["a~b", "c", "k"]).await;
        let second = query(&runtime, "getEntityDetails", &["a", "b~c", "k"]).await;
        assert_eq!(first.payload_str(), r#"{"v":1}"#);
        assert_eq!(second.payload_str(), r#"{"v":2}"#);

        let schema = KeySchema::tilde_joined(&["realm", "entity", "key"]);
        assert_ne!(
            schema.encode(&["a~b", "c", "k"]).unwrap(),
            schema.encode(&["a", "b~c", "k"]).unwrap()
        );
    }

    #[tokio::test]
    async fn test_separator_in_segment_rejected() {
        let runtime = record_runtime(ContractPreset::RealmEntities);
        let response = query(&runtime, "saveNewEvent", &["a\u{0}b", "c", "k", "{}"]).await;
        assert_eq!(response.status, 400);
        assert_eq!(runtime.ledger().height(), 0);
    }

    #[tokio::test]
    async fn test_entity_history_after_n_writes() {
        let runtime = record_runtime(ContractPreset::EntityProfiles);
        for n in 1..=3 {
            let invocation = shared_types::invocation::Invocation::new(
                "saveNewEvent",
                ["e1".to_string(), format!(r#"{{"n":{n}}}"#)],
                Default::default(),
            )
            .with_tx_id(format!("tx-{n}"));
            assert!(runtime.invoke(invocation).await.is_ok());
        }

        let response = query(&runtime, "getHistoryForEntity", &["e1"]).await;
        let trail: serde_json::Value = serde_json::from_slice(&response.payload).unwrap();
        let ids: Vec<_> = trail
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["TxId"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["tx-3", "tx-2", "tx-1"]);
    }

    #[tokio::test]
    async fn test_device_events_scan_and_selector() {
        let runtime = record_runtime(ContractPreset::DeviceEvents);
        for (time, value) in [("2024-01-01T00:00", "20"), ("2024-01-01T01:00", "21")] {
            let doc = format!(r#"{{"displayName":"Thermostat","value":"{value}"}}"#);
            let response = query(&runtime, "saveNewEvent", &["d1", time, doc.as_str()]).await;
            assert!(response.is_ok(), "{}", response.message);
            assert_eq!(response.payload_str(), time);
        }
        query(
            &runtime,
            "saveNewEvent",
            &["d2", "2024-01-02T00:00", r#"{"displayName":"Lamp","value":"5"}"#],
        )
        .await;

        let scan = query(&runtime, "queryDeviceEvents", &["d1"]).await;
        let scan: serde_json::Value = serde_json::from_slice(&scan.payload).unwrap();
        assert_eq!(scan.as_array().unwrap().len(), 2);
        assert_eq!(scan[1]["Record"]["value"], "21");

        let by_date = query(&runtime, "queryByDate", &["d1", "20240101"]).await;
        let by_date: serde_json::Value = serde_json::from_slice(&by_date.payload).unwrap();
        assert_eq!(by_date.as_array().unwrap().len(), 2);
        assert_eq!(by_date[0]["Key"], "||deviceId~time||d1||2024-01-01T00:00||");

        let location = query(&runtime, "queryLocation", &[]).await;
        let location: serde_json::Value = serde_json::from_slice(&location.payload).unwrap();
        assert_eq!(location[0]["Record"]["value"], "21");
        assert_eq!(location[1]["Record"]["displayName"], "Lamp");

        let selector = r#"{"selector":{"deviceId":"d2"},"fields":["value"]}"#;
        let found = query(&runtime, "queryBySelector", &[selector]).await;
        let found: serde_json::Value = serde_json::from_slice(&found.payload).unwrap();
        assert_eq!(
            found,
            serde_json::json!([{
                "Key": "\u{0}deviceId~time\u{0}d2\u{0}2024-01-02T00:00\u{0}",
                "Record": {"value": "5"}
            }])
        );
    }

    #[tokio::test]
    async fn test_presets_answer_to_deployed_names() {
        let calls: [(ContractPreset, &str, &[&str]); 6] = [
            (ContractPreset::KeyValue, "getVersion", &[]),
            (ContractPreset::FormResponses, "saveNewResponse", &["r1", r#"{"q":"a"}"#]),
            (ContractPreset::FormResponses, "getKeyDetails", &["r1"]),
            (ContractPreset::DeviceEvents, "saveNewEvent", &["d1", "2024-01-01T00:00", "{}"]),
            (ContractPreset::DeviceEvents, "queryByDate", &["d1", "20240101"]),
            (ContractPreset::DeviceEvents, "queryLocation", &[]),
        ];
        let mut runtimes = std::collections::HashMap::new();
        for (preset, function, args) in calls {
            let runtime = runtimes
                .entry(preset)
                .or_insert_with(|| record_runtime(preset));
            let response = query(runtime, function, args).await;
            assert_eq!(response.status, 200, "{preset} {function}: {}", response.message);
        }
        assert_eq!(
            query(&runtimes[&ContractPreset::KeyValue], "getVersion", &[]).await.payload_str(),
            "key-value:1.0.0"
        );
    }

    #[tokio::test]
    async fn test_key_value_set_echoes_pair() {
        let runtime = record_runtime(ContractPreset::KeyValue);
        let response = query(&runtime, "set", &["color", "blue"]).await;
        assert_eq!(response.payload_str(), "color:blue");
        assert_eq!(query(&runtime, "get", &["color"]).await.payload_str(), "blue");
    }

    #[tokio::test]
    async fn test_batch_get_answers_test_call() {
        let runtime = record_runtime(ContractPreset::BatchKeyValue);
        let response = query(&runtime, "get", &["Xooa Test"]).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.payload_str(), PROBE_RESPONSE);

        let single = record_runtime(ContractPreset::KeyValue);
        let response = query(&single, "get", &["Xooa Test"]).await;
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_unknown_function() {
        let runtime = record_runtime(ContractPreset::KeyedEvents);
        let response = query(&runtime, "transfer", &["x", "1"]).await;
        assert_eq!(response.status, 404);
        assert_eq!(response.message, "Invalid function name: transfer");
    }
}
