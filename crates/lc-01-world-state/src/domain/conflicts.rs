//! # Commit-time Conflict Detection
//!
//! Optimistic concurrency: a transaction commits only if every version it
//! read, and every range it scanned, is still what is committed now.

use serde::{Deserialize, Serialize};
use shared_types::entities::Version;

use super::rwset::ReadWriteSet;

/// Read access to committed versions.
pub trait CommittedVersions {
    /// Current version of `key`, `None` if absent.
    fn committed_version(&self, key: &str) -> Option<Version>;

    /// Current keys under `prefix` with their versions, in key order.
    fn committed_range(&self, prefix: &str) -> Vec<(String, Version)>;
}

/// Why a transaction was invalidated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictType {
    /// A key read by the transaction was written since.
    ReadWrite,
    /// A scanned range gained, lost or changed a key.
    Phantom,
}

/// First conflict found for a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictInfo {
    pub key: String,
    pub conflict_type: ConflictType,
}

/// Validate a read-set against committed state.
pub fn detect_conflict(
    rwset: &ReadWriteSet,
    committed: &impl CommittedVersions,
) -> Option<ConflictInfo> {
    for (key, observed) in rwset.reads() {
        if committed.committed_version(key) != observed {
            return Some(ConflictInfo {
                key: key.to_string(),
                conflict_type: ConflictType::ReadWrite,
            });
        }
    }

    for range in rwset.range_reads() {
        let current = committed.committed_range(&range.prefix);
        if current != range.observed {
            let key = current
                .iter()
                .zip(&range.observed)
                .find(|(now, then)| now != then)
                .map(|(now, _)| now.0.clone())
                .or_else(|| {
                    let longer = if current.len() > range.observed.len() {
                        &current
                    } else {
                        &range.observed
                    };
                    longer
                        .get(current.len().min(range.observed.len()))
                        .map(|(k, _)| k.clone())
                })
                .unwrap_or_else(|| range.prefix.clone());
            return Some(ConflictInfo {
                key,
                conflict_type: ConflictType::Phantom,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rwset::RangeRead;
    use std::collections::BTreeMap;

    struct Fixture(BTreeMap<String, Version>);

    impl CommittedVersions for Fixture {
        fn committed_version(&self, key: &str) -> Option<Version> {
            self.0.get(key).copied()
        }

        fn committed_range(&self, prefix: &str) -> Vec<(String, Version)> {
            self.0
                .iter()
                .filter(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), *v))
                .collect()
        }
    }

    fn fixture(entries: &[(&str, u64)]) -> Fixture {
        Fixture(
            entries
                .iter()
                .map(|(k, b)| (k.to_string(), Version::new(*b, 0)))
                .collect(),
        )
    }

    #[test]
    fn test_unchanged_reads_pass() {
        let mut set = ReadWriteSet::new();
        set.record_read("a", Some(Version::new(1, 0)));
        set.record_read("missing", None);
        assert!(detect_conflict(&set, &fixture(&[("a", 1)])).is_none());
    }

    #[test]
    fn test_stale_read_conflicts() {
        let mut set = ReadWriteSet::new();
        set.record_read("a", Some(Version::new(1, 0)));
        let conflict = detect_conflict(&set, &fixture(&[("a", 2)])).unwrap();
        assert_eq!(conflict.key, "a");
        assert_eq!(conflict.conflict_type, ConflictType::ReadWrite);
    }

    #[test]
    fn test_read_of_absent_key_conflicts_when_created() {
        let mut set = ReadWriteSet::new();
        set.record_read("new", None);
        assert!(detect_conflict(&set, &fixture(&[("new", 3)])).is_some());
    }

    #[test]
    fn test_phantom_insert_detected() {
        let mut set = ReadWriteSet::new();
        set.record_range(RangeRead {
            prefix: "p/".into(),
            observed: vec![("p/1".into(), Version::new(1, 0))],
        });
        let conflict = detect_conflict(&set, &fixture(&[("p/1", 1), ("p/2", 2)])).unwrap();
        assert_eq!(conflict.key, "p/2");
        assert_eq!(conflict.conflict_type, ConflictType::Phantom);
    }
}
