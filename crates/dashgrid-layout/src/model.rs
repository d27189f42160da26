#![forbid(unsafe_code)]

//! Grid data model: module keys, slots, spans and the layout snapshot.
//!
//! The grid is fixed at two columns. Slot `i` lives in row `i / 2`; even
//! indices are left cells and odd indices are right cells. A module whose
//! span is [`FULL_WIDTH_SPAN`] sits in a left cell and covers the right cell
//! of its row.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of columns in every grid row.
pub const GRID_COLUMNS: usize = 2;

/// Minimum slot count of a normalized grid (two full rows).
pub const MIN_SLOTS: usize = 4;

/// The only span value with meaning: occupy both columns of a row.
pub const FULL_WIDTH_SPAN: u8 = 2;

/// Opaque, application-defined identifier of one dashboard module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleKey(String);

impl ModuleKey {
    /// Create a key. The empty string is not a valid key; use [`ModuleKey::parse`]
    /// when the input is untrusted.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Create a key from untrusted input, rejecting the empty string.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        if key.is_empty() {
            None
        } else {
            Some(Self(key.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ModuleKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for ModuleKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One grid cell: a module or empty.
pub type Slot = Option<ModuleKey>;

/// Column multipliers keyed by module. Absence means span 1.
pub type SpanMap = BTreeMap<ModuleKey, u8>;

/// Span of `key` as recorded in `spans` (1 when absent).
#[must_use]
pub fn span_of(spans: &SpanMap, key: &ModuleKey) -> u8 {
    spans.get(key).copied().unwrap_or(1)
}

/// True when `key` is recorded as spanning the full row.
#[must_use]
pub fn is_full_width(spans: &SpanMap, key: &ModuleKey) -> bool {
    span_of(spans, key) == FULL_WIDTH_SPAN
}

/// Row index of slot `index`.
#[must_use]
pub const fn row_of(index: usize) -> usize {
    index / GRID_COLUMNS
}

/// Index of the left cell of the row containing `index`.
#[must_use]
pub const fn row_start(index: usize) -> usize {
    index - index % GRID_COLUMNS
}

/// The `(slots, spans)` pair describing the whole grid at one point in time.
///
/// Serializes as `{ "layout": [...], "spans": {...} }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    #[serde(default)]
    pub layout: Vec<Slot>,
    #[serde(default)]
    pub spans: SpanMap,
}

impl LayoutSnapshot {
    #[must_use]
    pub fn new(layout: Vec<Slot>, spans: SpanMap) -> Self {
        Self { layout, spans }
    }

    /// Build a snapshot from string-ish cells, `None` meaning empty.
    ///
    /// ```
    /// use dashgrid_layout::LayoutSnapshot;
    ///
    /// let snapshot = LayoutSnapshot::from_keys([Some("nutrition"), None, Some("sleep"), None]);
    /// assert_eq!(snapshot.layout.len(), 4);
    /// assert!(snapshot.spans.is_empty());
    /// ```
    #[must_use]
    pub fn from_keys<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let layout = cells
            .into_iter()
            .map(|cell| cell.and_then(|key| ModuleKey::parse(key.as_ref())))
            .collect();
        Self {
            layout,
            spans: SpanMap::new(),
        }
    }

    /// Builder: mark `key` as spanning both columns.
    #[must_use]
    pub fn with_full_width(mut self, key: impl Into<ModuleKey>) -> Self {
        self.spans.insert(key.into(), FULL_WIDTH_SPAN);
        self
    }

    /// Module at `index`, if any.
    #[must_use]
    pub fn module_at(&self, index: usize) -> Option<&ModuleKey> {
        self.layout.get(index).and_then(Option::as_ref)
    }

    /// Slot index holding `key`.
    #[must_use]
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.layout
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|k| k.as_str() == key))
    }

    /// Span of `key` in this snapshot (1 when absent).
    #[must_use]
    pub fn span(&self, key: &ModuleKey) -> u8 {
        span_of(&self.spans, key)
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.layout.iter().filter(|slot| slot.is_some()).count()
    }

    /// Occupied modules in scan order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleKey> + '_ {
        self.layout.iter().filter_map(Option::as_ref)
    }

    /// Number of grid rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.layout.len().div_ceil(GRID_COLUMNS)
    }
}

/// Configuration injected into the normalizer: the fallback layout used when
/// nothing usable was persisted, and the universe of known modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDefaults {
    pub default_layout: Vec<Slot>,
    pub catalog: Vec<ModuleKey>,
}

impl LayoutDefaults {
    #[must_use]
    pub fn new(default_layout: Vec<Slot>, catalog: Vec<ModuleKey>) -> Self {
        Self {
            default_layout,
            catalog,
        }
    }
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            default_layout: vec![
                Some(ModuleKey::new("nutrition")),
                Some(ModuleKey::new("productivity")),
                Some(ModuleKey::new("fitness")),
                None,
            ],
            catalog: ["nutrition", "productivity", "fitness", "pomodoro", "sleep"]
                .into_iter()
                .map(ModuleKey::new)
                .collect(),
        }
    }
}
