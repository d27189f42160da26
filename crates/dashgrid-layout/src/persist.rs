#![forbid(unsafe_code)]

//! Persisted form of a layout snapshot.
//!
//! The snapshot is stored as two independent JSON values under
//! [`LAYOUT_STORAGE_KEY`] and [`SPANS_STORAGE_KEY`]. Either may be missing,
//! unparseable or of the wrong shape; decoding always produces a valid,
//! compacted snapshot. Storage I/O failures are the only errors surfaced.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::engine::LayoutEngine;
use crate::logging::debug;
use crate::model::LayoutSnapshot;
use crate::normalize::{parse_slots_or_default, parse_spans};

/// Storage key of the slot array.
pub const LAYOUT_STORAGE_KEY: &str = "module-layout";

/// Storage key of the span object.
pub const SPANS_STORAGE_KEY: &str = "module-spans";

/// The two serialized values making up a persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLayout {
    pub layout_json: String,
    pub spans_json: String,
}

/// Serialize a snapshot into its two persisted values.
pub fn encode_snapshot(snapshot: &LayoutSnapshot) -> Result<PersistedLayout, serde_json::Error> {
    Ok(PersistedLayout {
        layout_json: serde_json::to_string(&snapshot.layout)?,
        spans_json: serde_json::to_string(&snapshot.spans)?,
    })
}

/// Rebuild a snapshot from persisted values, tolerating any corruption.
#[must_use]
pub fn decode_snapshot(
    layout_json: Option<&str>,
    spans_json: Option<&str>,
    engine: &LayoutEngine,
) -> LayoutSnapshot {
    let layout_value = parse_value(layout_json, LAYOUT_STORAGE_KEY);
    let spans_value = parse_value(spans_json, SPANS_STORAGE_KEY);
    let slots = parse_slots_or_default(&layout_value, engine.defaults());
    let spans = parse_spans(&spans_value);
    engine.compact(&slots, &spans)
}

// `key` and the parse error only feed log events.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn parse_value(raw: Option<&str>, key: &str) -> Value {
    let Some(raw) = raw else {
        debug!(key, "no persisted value");
        return Value::Null;
    };
    serde_json::from_str(raw).unwrap_or_else(|err| {
        debug!(key, error = %err, "discarding unparseable persisted value");
        Value::Null
    })
}

/// Key-value storage collaborator holding persisted snapshots.
pub trait LayoutStore {
    type Error;

    /// Read the raw value stored under `key`, `None` when absent.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// Load the snapshot held by `store`, falling back to the engine's default.
pub fn load_snapshot<S: LayoutStore>(
    store: &S,
    engine: &LayoutEngine,
) -> Result<LayoutSnapshot, S::Error> {
    let layout = store.read(LAYOUT_STORAGE_KEY)?;
    let spans = store.read(SPANS_STORAGE_KEY)?;
    Ok(decode_snapshot(layout.as_deref(), spans.as_deref(), engine))
}

/// Persist `snapshot` into `store`.
pub fn save_snapshot<S>(store: &mut S, snapshot: &LayoutSnapshot) -> Result<(), S::Error>
where
    S: LayoutStore,
    S::Error: From<serde_json::Error>,
{
    let persisted = encode_snapshot(snapshot)?;
    store.write(LAYOUT_STORAGE_KEY, &persisted.layout_json)?;
    store.write(SPANS_STORAGE_KEY, &persisted.spans_json)?;
    Ok(())
}

/// In-memory store, useful for tests and embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw access for seeding corrupt or legacy values.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl LayoutStore for MemoryStore {
    type Error = MemoryStoreError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Errors from [`MemoryStore`]; only serialization can fail.
#[derive(Debug)]
pub enum MemoryStoreError {
    Encode(serde_json::Error),
}

impl std::fmt::Display for MemoryStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode layout: {err}"),
        }
    }
}

impl std::error::Error for MemoryStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for MemoryStoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err)
    }
}
