//! # Contract Presets
//!
//! Each preset is the operation table of one deployed record contract.

use lc_01_world_state::KeySchema;
use std::fmt;

use crate::domain::device::{EVENT_DOC_TYPE, SUMMARY_DOC_TYPE};
use crate::operations::{RecordKey, RecordKind, RecordOperation, SelectorTemplate};

/// Event names recorded by record operations.
pub mod topics {
    /// Batch `set`.
    pub const SET: &str = "set";
    /// Batch `del`.
    pub const DEL: &str = "del";
    /// `saveNewEvent` in the event-style presets.
    pub const SAVE_NEW_EVENT: &str = "saveNewEvent";
}

/// Record contract presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractPreset {
    KeyValue,
    BatchKeyValue,
    KeyedEvents,
    FormResponses,
    EntityProfiles,
    RealmEntities,
    TypedRecords,
    DeviceEvents,
}

impl ContractPreset {
    pub const ALL: [Self; 8] = [
        Self::KeyValue,
        Self::BatchKeyValue,
        Self::KeyedEvents,
        Self::FormResponses,
        Self::EntityProfiles,
        Self::RealmEntities,
        Self::TypedRecords,
        Self::DeviceEvents,
    ];

    /// Configuration name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::KeyValue => "key-value",
            Self::BatchKeyValue => "batch-key-value",
            Self::KeyedEvents => "keyed-events",
            Self::FormResponses => "form-responses",
            Self::EntityProfiles => "entity-profiles",
            Self::RealmEntities => "realm-entities",
            Self::TypedRecords => "typed-records",
            Self::DeviceEvents => "device-events",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }

    /// Names every preset must answer to. The registry checks the table
    /// against this list at startup.
    #[must_use]
    pub const fn required_operations(self) -> &'static [&'static str] {
        match self {
            Self::KeyValue => &["set", "get", "getVersion"],
            Self::BatchKeyValue => &["set", "get", "del"],
            Self::KeyedEvents => &["saveNewEvent", "getKeyDetails", "getHistoryByKey", "getVersion"],
            Self::FormResponses => &["saveNewResponse", "getKeyDetails", "getHistoryByKey"],
            Self::EntityProfiles => &[
                "saveNewEvent",
                "getEntityDetails",
                "getHistoryForEntity",
                "saveProfile",
                "getProfile",
                "getVersion",
            ],
            Self::RealmEntities => &[
                "saveNewEvent",
                "getEntityDetails",
                "getHistoryForEntity",
                "getVersion",
            ],
            Self::TypedRecords => &["storeData", "retrieveData", "deleteData"],
            Self::DeviceEvents => &[
                "saveNewEvent",
                "queryByDate",
                "queryLocation",
                "queryDeviceEvents",
                "queryBySelector",
            ],
        }
    }

    /// The preset's operation table.
    #[must_use]
    pub fn operations(self) -> Vec<RecordOperation> {
        use RecordKind::{
            BatchDelete, BatchGet, BatchSet, Delete, DeviceEvent, Get, History, Put, PutPair, Query,
            Scan, Selector, Version,
        };

        match self {
            Self::KeyValue => vec![
                RecordOperation::new("set", PutPair(RecordKey::Simple("key"))),
                RecordOperation::new("get", Get(RecordKey::Simple("key"))),
                RecordOperation::new("getVersion", Version),
            ],
            Self::BatchKeyValue => vec![
                RecordOperation::new("set", BatchSet).with_event(topics::SET),
                RecordOperation::new("get", BatchGet),
                RecordOperation::new("del", BatchDelete).with_event(topics::DEL),
            ],
            Self::KeyedEvents => {
                let key = RecordKey::Simple("key");
                vec![
                    RecordOperation::new("saveNewEvent", Put(key.clone()))
                        .with_event(topics::SAVE_NEW_EVENT),
                    RecordOperation::new("getKeyDetails", Get(key.clone())),
                    RecordOperation::new("getHistoryByKey", History(key)),
                    RecordOperation::new("getVersion", Version),
                ]
            }
            Self::FormResponses => {
                let key = RecordKey::Simple("key");
                vec![
                    RecordOperation::new("saveNewResponse", Put(key.clone())),
                    RecordOperation::new("getKeyDetails", Get(key.clone())),
                    RecordOperation::new("getHistoryByKey", History(key)),
                ]
            }
            Self::EntityProfiles => {
                let entity = RecordKey::Simple("id");
                let profile = RecordKey::Simple("accountId");
                vec![
                    RecordOperation::new("saveNewEvent", Put(entity.clone()))
                        .with_event(topics::SAVE_NEW_EVENT),
                    RecordOperation::new("getEntityDetails", Get(entity.clone())),
                    RecordOperation::new("getHistoryForEntity", History(entity)),
                    RecordOperation::new("saveProfile", Put(profile.clone())),
                    RecordOperation::new("getProfile", Get(profile)),
                    RecordOperation::new("getVersion", Version),
                ]
            }
            Self::RealmEntities => {
                let key = RecordKey::Composite(KeySchema::tilde_joined(&["realm", "entity", "key"]));
                vec![
                    RecordOperation::new("saveNewEvent", Put(key.clone()))
                        .with_event(topics::SAVE_NEW_EVENT),
                    RecordOperation::new("getEntityDetails", Get(key.clone())),
                    RecordOperation::new("getHistoryForEntity", History(key)),
                    RecordOperation::new("getVersion", Version),
                ]
            }
            Self::TypedRecords => {
                let key = RecordKey::Composite(KeySchema::tilde_joined(&["sObject", "key"]));
                vec![
                    RecordOperation::new("storeData", Put(key.clone())),
                    RecordOperation::new("retrieveData", Get(key.clone())),
                    RecordOperation::new("deleteData", Delete(key)),
                ]
            }
            Self::DeviceEvents => {
                let schema = KeySchema::tilde_joined(&["deviceId", "time"]);
                vec![
                    RecordOperation::new("saveNewEvent", DeviceEvent(schema.clone()))
                        .with_event(topics::SAVE_NEW_EVENT),
                    RecordOperation::new(
                        "queryByDate",
                        Selector(SelectorTemplate {
                            doc_type: EVENT_DOC_TYPE,
                            params: &["deviceId", "date"],
                            fields: &["value", "time"],
                        }),
                    ),
                    RecordOperation::new(
                        "queryLocation",
                        Selector(SelectorTemplate {
                            doc_type: SUMMARY_DOC_TYPE,
                            params: &[],
                            fields: &["displayName", "value", "time"],
                        }),
                    ),
                    RecordOperation::new(
                        "queryDeviceEvents",
                        Scan {
                            schema,
                            leading: 1,
                        },
                    ),
                    RecordOperation::new("queryBySelector", Query),
                ]
            }
        }
    }
}

impl fmt::Display for ContractPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
