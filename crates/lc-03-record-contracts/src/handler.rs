//! # Record Handler
//!
//! Runs a record operation: arity check, key resolution, storage call,
//! event and response encoding.

use lc_01_world_state::{history_json, records_json, validate_simple_key, WorldState};
use shared_types::errors::{ContractError, ContractResult};
use tracing::{debug, error};

use crate::domain::{
    batch_delete, batch_get, batch_set, delete_record, device_documents, get_record, put_record,
    query_records, record_history, resolve_key, scan_records, ResolvedKey,
};
use crate::operations::{RecordKey, RecordKind, RecordOperation};

/// Response to a probe call.
pub const PROBE_RESPONSE: &str = "Method test call. Nothing will be committed to ledger";

fn emit(ctx: &mut dyn WorldState, op: &RecordOperation, payload: &[u8]) {
    let Some(name) = op.event else {
        return;
    };
    if let Err(e) = ctx.set_event(name, payload.to_vec()) {
        error!(tx_id = %ctx.tx_id(), event = name, error = %e, "Failed to record event");
    }
}

/// Run `op` inside `ctx`. `version_label` is the `getVersion` answer.
pub async fn execute(
    op: &RecordOperation,
    ctx: &mut dyn WorldState,
    args: &[String],
    version_label: &str,
) -> ContractResult<Vec<u8>> {
    let expected = op.arity();
    if !expected.accepts(args.len()) {
        return Err(ContractError::ArgumentCount {
            expected,
            given: args.len(),
        });
    }

    debug!(tx_id = %ctx.tx_id(), operation = %op, "Executing record operation");

    match &op.kind {
        RecordKind::Put(key) => {
            let (segments, document) = args.split_at(key.arity());
            let resolved = resolve_key(key, segments)?;
            let document = document[0].as_bytes().to_vec();
            put_record(ctx, &resolved, document.clone()).await?;
            emit(ctx, op, &document);
            Ok(resolved.id.into_bytes())
        }
        RecordKind::PutPair(key) => {
            let resolved = resolve_key(key, &args[..1])?;
            let value = args[1].as_bytes().to_vec();
            put_record(ctx, &resolved, value).await?;
            emit(ctx, op, args[1].as_bytes());
            Ok(format!("{}:{}", resolved.id, args[1]).into_bytes())
        }
        RecordKind::Get(key) => {
            let resolved = resolve_key(key, args)?;
            get_record(ctx, &resolved).await
        }
        RecordKind::Delete(key) => {
            let resolved = resolve_key(key, args)?;
            delete_record(ctx, &resolved).await?;
            emit(ctx, op, resolved.id.as_bytes());
            Ok(resolved.id.into_bytes())
        }
        RecordKind::History(key) => {
            let resolved = resolve_key(key, args)?;
            let entries = record_history(ctx, &resolved).await?;
            Ok(history_json(&entries)?)
        }
        RecordKind::BatchSet => {
            let outcome = serde_json::to_vec(&batch_set(ctx, args).await?)?;
            emit(ctx, op, &outcome);
            Ok(outcome)
        }
        RecordKind::BatchGet => Ok(serde_json::to_vec(&batch_get(ctx, args).await?)?),
        RecordKind::BatchDelete => {
            let deleted = serde_json::to_vec(&batch_delete(ctx, args).await?)?;
            emit(ctx, op, &deleted);
            Ok(deleted)
        }
        RecordKind::Scan { schema, .. } => {
            let records = scan_records(ctx, schema, args).await?;
            Ok(records_json(&records)?)
        }
        RecordKind::Query => {
            let records = query_records(ctx, &args[0]).await?;
            Ok(records_json(&records)?)
        }
        RecordKind::Selector(template) => {
            let mut records = query_records(ctx, &template.render(args)).await?;
            for record in &mut records {
                record.key = record.key.replace('\u{0}', "||");
            }
            Ok(records_json(&records)?)
        }
        RecordKind::DeviceEvent(schema) => {
            let (segments, document) = args.split_at(schema.arity());
            let entry = resolve_key(&RecordKey::Composite(schema.clone()), segments)?;
            let device = segments[0].clone();
            validate_simple_key(&device)?;
            let latest = ResolvedKey {
                storage: device.clone(),
                id: device.clone(),
                display: device,
            };

            let docs = device_documents(&segments[0], &segments[1], &document[0])?;
            put_record(ctx, &latest, docs.summary).await?;
            put_record(ctx, &entry, docs.event.clone()).await?;
            emit(ctx, op, &docs.event);
            Ok(entry.id.into_bytes())
        }
        RecordKind::Version => Ok(version_label.as_bytes().to_vec()),
    }
}
