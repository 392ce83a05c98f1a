//! # Device Events
//!
//! A device reading is stored twice: the full event under `deviceId~time`
//! and a short summary under the bare device id, overwritten by every new
//! reading.

use serde_json::{Map, Value};
use shared_types::errors::{ContractError, ContractResult};

/// `docType` of a full event.
pub const EVENT_DOC_TYPE: &str = "Event";

/// `docType` of a device's latest-reading summary.
pub const SUMMARY_DOC_TYPE: &str = "EventLess";

/// Fields copied from the event into the summary.
const SUMMARY_FIELDS: [&str; 3] = ["displayName", "value", "locationId"];

/// The two documents written for one reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDocuments {
    /// Full event, stored under the composite key.
    pub event: Vec<u8>,
    /// Summary, stored under the device id.
    pub summary: Vec<u8>,
}

/// Calendar day of an ISO-8601 timestamp without separators:
/// `2024-03-05T10:00:00Z` becomes `20240305`.
#[must_use]
pub fn event_date(time: &str) -> String {
    let day = time.split('T').next().unwrap_or_default();
    day.replace('-', "")
}

/// Build both documents for `document` read from `device_id` at `time`.
///
/// `document` must be a JSON object. `docType`, `deviceId`, `time` and
/// `date` are set from the arguments and override any value it carries.
pub fn device_documents(
    device_id: &str,
    time: &str,
    document: &str,
) -> ContractResult<DeviceDocuments> {
    let parsed: Value = serde_json::from_str(document)
        .map_err(|e| ContractError::InvalidDocument(e.to_string()))?;
    let Value::Object(mut event) = parsed else {
        return Err(ContractError::InvalidDocument(
            "device event must be a JSON object".to_string(),
        ));
    };

    let mut summary = Map::new();
    summary.insert("docType".into(), SUMMARY_DOC_TYPE.into());
    for field in SUMMARY_FIELDS {
        let value = event.get(field).cloned().unwrap_or_else(|| "".into());
        summary.insert(field.into(), value);
    }
    summary.insert("time".into(), time.into());

    event.insert("docType".into(), EVENT_DOC_TYPE.into());
    event.insert("deviceId".into(), device_id.into());
    event.insert("time".into(), time.into());
    event.insert("date".into(), event_date(time).into());

    Ok(DeviceDocuments {
        event: serde_json::to_vec(&event)?,
        summary: serde_json::to_vec(&summary)?,
    })
}
