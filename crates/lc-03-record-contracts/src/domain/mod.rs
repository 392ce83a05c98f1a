//! Domain layer: keyed records, multi-key batches and device events.

pub mod batch;
pub mod device;
pub mod records;

pub use batch::{batch_delete, batch_get, batch_set, BatchEntry, BatchFailure, BatchResult};
pub use device::{device_documents, event_date, DeviceDocuments};
pub use records::{
    delete_record, get_record, put_record, query_records, record_history, resolve_key,
    scan_records, ResolvedKey,
};
