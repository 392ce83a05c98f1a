//! # Composite Key Codec
//!
//! Ledger-compatible composite keys:
//!
//! ```text
//! U+0000 objectType U+0000 seg1 U+0000 ... segN U+0000
//! ```
//!
//! Neither the object type nor any segment may contain `U+0000` or the
//! reserved rune `U+10FFFF`, so splitting on `U+0000` always recovers the
//! original parts. That makes the encoding injective without escaping.
//! Simple keys never start with `U+0000`, keeping the two key spaces apart.

use shared_types::errors::{Arity, ContractError, ContractResult};

/// Leading byte of every composite key, also used as the segment separator.
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Highest Unicode scalar; reserved as the upper bound of range scans.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

fn validate_part(part: &str, what: &str) -> ContractResult<()> {
    if let Some(bad) = part
        .chars()
        .find(|c| *c == COMPOSITE_KEY_NAMESPACE || *c == MAX_UNICODE_RUNE)
    {
        return Err(ContractError::KeyEncoding(format!(
            "{what} {part:?} contains reserved character U+{:04X}",
            bad as u32
        )));
    }
    Ok(())
}

/// Build a composite key from an object type and ordered segments.
pub fn create_composite_key<S: AsRef<str>>(
    object_type: &str,
    segments: &[S],
) -> ContractResult<String> {
    if object_type.is_empty() {
        return Err(ContractError::KeyEncoding(
            "object type must not be empty".to_string(),
        ));
    }
    validate_part(object_type, "object type")?;

    let mut key = String::with_capacity(
        2 + object_type.len() + segments.iter().map(|s| s.as_ref().len() + 1).sum::<usize>(),
    );
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(COMPOSITE_KEY_NAMESPACE);
    for segment in segments {
        let segment = segment.as_ref();
        validate_part(segment, "segment")?;
        key.push_str(segment);
        key.push(COMPOSITE_KEY_NAMESPACE);
    }
    Ok(key)
}

/// Prefix matching every composite key whose leading segments equal
/// `segments`. Identical to `create_composite_key`; named for intent.
pub fn partial_composite_key<S: AsRef<str>>(
    object_type: &str,
    segments: &[S],
) -> ContractResult<String> {
    create_composite_key(object_type, segments)
}

/// Split a composite key back into `(object_type, segments)`.
pub fn split_composite_key(key: &str) -> ContractResult<(String, Vec<String>)> {
    let body = key
        .strip_prefix(COMPOSITE_KEY_NAMESPACE)
        .and_then(|rest| rest.strip_suffix(COMPOSITE_KEY_NAMESPACE))
        .ok_or_else(|| ContractError::KeyEncoding(format!("{key:?} is not a composite key")))?;

    let mut parts = body.split(COMPOSITE_KEY_NAMESPACE).map(str::to_string);
    let object_type = parts.next().unwrap_or_default();
    if object_type.is_empty() {
        return Err(ContractError::KeyEncoding(format!(
            "{key:?} has no object type"
        )));
    }
    Ok((object_type, parts.collect()))
}

/// True when `key` lives in the composite key space.
#[must_use]
pub fn is_composite_key(key: &str) -> bool {
    key.starts_with(COMPOSITE_KEY_NAMESPACE)
}

/// Reject simple keys that would collide with the composite key space.
pub fn validate_simple_key(key: &str) -> ContractResult<()> {
    if is_composite_key(key) {
        return Err(ContractError::KeyEncoding(format!(
            "simple key {key:?} must not start with U+0000"
        )));
    }
    Ok(())
}

/// A named key type: object type plus the names of its segments.
///
/// The display form joins them with `~` (e.g. `realm~entity~key`), which is
/// how the record contracts name their key types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    object_type: String,
    segments: Vec<String>,
    require_non_empty: bool,
}

impl KeySchema {
    /// Schema with the given object type and segment names. Segments must
    /// be non-empty unless `allow_empty_segments` is called.
    pub fn new<I, S>(object_type: impl Into<String>, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            object_type: object_type.into(),
            segments: segments.into_iter().map(Into::into).collect(),
            require_non_empty: true,
        }
    }

    /// Schema named after its segments, e.g. `sObject~key`.
    pub fn tilde_joined<S: AsRef<str>>(segments: &[S]) -> Self {
        let names: Vec<String> = segments.iter().map(|s| s.as_ref().to_string()).collect();
        Self::new(names.join("~"), names)
    }

    /// Permit empty segment values.
    #[must_use]
    pub fn allow_empty_segments(mut self) -> Self {
        self.require_non_empty = false;
        self
    }

    /// Object type prefix.
    #[must_use]
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Segment names in order.
    #[must_use]
    pub fn segment_names(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.segments.len()
    }

    /// Encode a full key.
    pub fn encode<S: AsRef<str>>(&self, values: &[S]) -> ContractResult<String> {
        if values.len() != self.segments.len() {
            return Err(ContractError::ArgumentCount {
                expected: Arity::Exact(self.segments.len()),
                given: values.len(),
            });
        }
        self.check_values(values)?;
        create_composite_key(&self.object_type, values)
    }

    /// Encode a prefix of leading segment values for a range scan.
    pub fn encode_prefix<S: AsRef<str>>(&self, values: &[S]) -> ContractResult<String> {
        if values.len() > self.segments.len() {
            return Err(ContractError::ArgumentCount {
                expected: Arity::Exact(self.segments.len()),
                given: values.len(),
            });
        }
        self.check_values(values)?;
        partial_composite_key(&self.object_type, values)
    }

    /// Decode a key of this schema back to its segment values.
    pub fn decode(&self, key: &str) -> ContractResult<Vec<String>> {
        let (object_type, segments) = split_composite_key(key)?;
        if object_type != self.object_type || segments.len() != self.segments.len() {
            return Err(ContractError::KeyEncoding(format!(
                "{key:?} is not a {} key",
                self.object_type
            )));
        }
        Ok(segments)
    }

    fn check_values<S: AsRef<str>>(&self, values: &[S]) -> ContractResult<()> {
        if !self.require_non_empty {
            return Ok(());
        }
        match values
            .iter()
            .zip(&self.segments)
            .find(|(value, _)| value.as_ref().is_empty())
        {
            Some((_, name)) => Err(ContractError::KeyEncoding(format!(
                "segment {name} of {} must not be empty",
                self.object_type
            ))),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for KeySchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.object_type)
    }
}
