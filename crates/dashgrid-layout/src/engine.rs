#![forbid(unsafe_code)]

//! Structural mutators.
//!
//! Every mutator takes a snapshot by reference, builds a raw `(slots, spans)`
//! pair and finishes through [`compact`]. Out-of-range or otherwise invalid
//! requests are no-ops: they return the compacted input unchanged in meaning.

use crate::compact::compact;
use crate::grid::{insert_at, is_covered};
use crate::logging::debug;
use crate::model::{
    FULL_WIDTH_SPAN, GRID_COLUMNS, LayoutDefaults, LayoutSnapshot, ModuleKey, Slot, SpanMap,
    is_full_width, row_start,
};
use crate::normalize::normalize;

/// Stateless layout engine configured with the module universe and the
/// fallback layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutEngine {
    defaults: LayoutDefaults,
}

impl LayoutEngine {
    #[must_use]
    pub fn new(defaults: LayoutDefaults) -> Self {
        Self { defaults }
    }

    #[must_use]
    pub fn defaults(&self) -> &LayoutDefaults {
        &self.defaults
    }

    /// The configured default layout, compacted.
    #[must_use]
    pub fn default_snapshot(&self) -> LayoutSnapshot {
        compact(&[], &SpanMap::new(), &self.defaults)
    }

    /// See [`normalize`].
    #[must_use]
    pub fn normalize(&self, input: &[Slot]) -> Vec<Slot> {
        normalize(input, &self.defaults)
    }

    /// See [`compact`].
    #[must_use]
    pub fn compact(&self, slots: &[Slot], spans: &SpanMap) -> LayoutSnapshot {
        compact(slots, spans, &self.defaults)
    }

    #[must_use]
    pub fn compact_snapshot(&self, snapshot: &LayoutSnapshot) -> LayoutSnapshot {
        self.compact(&snapshot.layout, &snapshot.spans)
    }

    /// Catalog modules not currently placed, in catalog order.
    #[must_use]
    pub fn available_modules(&self, snapshot: &LayoutSnapshot) -> Vec<ModuleKey> {
        self.defaults
            .catalog
            .iter()
            .filter(|key| snapshot.position_of(key.as_str()).is_none())
            .cloned()
            .collect()
    }

    /// Expand the module at `index` to span both columns of its row.
    ///
    /// The module moves to the left cell of its row. Whatever else occupied
    /// that row is re-inserted right after it. The resulting span map holds
    /// only this module: expanding one module collapses every other.
    #[must_use]
    pub fn stretch(&self, snapshot: &LayoutSnapshot, index: usize) -> LayoutSnapshot {
        let Some(key) = snapshot.module_at(index).cloned() else {
            debug!(index, "stretch ignored: no module at index");
            return self.compact_snapshot(snapshot);
        };

        let start = row_start(index);
        let end = start + 1;
        let mut slots = snapshot.layout.clone();
        if slots.len() <= end {
            slots.resize(end + 1, None);
        }
        slots[index] = None;

        let mut displaced = Vec::with_capacity(GRID_COLUMNS);
        for cell in [start, end] {
            if let Some(other) = slots[cell].take()
                && other != key
                && !displaced.contains(&other)
            {
                displaced.push(other);
            }
        }
        slots[start] = Some(key.clone());

        for (offset, other) in displaced.into_iter().enumerate() {
            insert_at(&mut slots, other, end + 1 + offset);
        }

        debug!(module = %key, row_start = start, "stretched module");
        let spans = SpanMap::from([(key, FULL_WIDTH_SPAN)]);
        self.compact(&slots, &spans)
    }

    /// Return `key` to a single column. No-op unless it is full width.
    #[must_use]
    pub fn collapse(&self, snapshot: &LayoutSnapshot, key: &ModuleKey) -> LayoutSnapshot {
        if !is_full_width(&snapshot.spans, key) {
            debug!(module = %key, "collapse ignored: module is not full width");
            return self.compact_snapshot(snapshot);
        }
        let mut spans = snapshot.spans.clone();
        spans.remove(key);
        self.compact(&snapshot.layout, &spans)
    }

    /// Collapse the module at `index` if it is full width, stretch it otherwise.
    #[must_use]
    pub fn toggle_expand(&self, snapshot: &LayoutSnapshot, index: usize) -> LayoutSnapshot {
        match snapshot.module_at(index) {
            Some(key) if is_full_width(&snapshot.spans, key) => self.collapse(snapshot, key),
            _ => self.stretch(snapshot, index),
        }
    }

    /// Place `key` at `index`, replacing any occupant.
    ///
    /// No-op when `index` is covered or out of range. If `key` is already
    /// placed elsewhere, compaction keeps whichever copy scans first.
    #[must_use]
    pub fn add(&self, snapshot: &LayoutSnapshot, index: usize, key: ModuleKey) -> LayoutSnapshot {
        if !self.is_addressable(snapshot, index) {
            debug!(index, "add ignored: index is not addressable");
            return self.compact_snapshot(snapshot);
        }
        let mut slots = snapshot.layout.clone();
        slots[index] = Some(key);
        self.compact(&slots, &snapshot.spans)
    }

    /// Place `key` in the first available cell, growing the grid by a row
    /// when it is full. No-op when `key` is already placed.
    #[must_use]
    pub fn append(&self, snapshot: &LayoutSnapshot, key: ModuleKey) -> LayoutSnapshot {
        if snapshot.position_of(key.as_str()).is_some() {
            debug!(module = %key, "append ignored: module already placed");
            return self.compact_snapshot(snapshot);
        }
        // Pushed onto a whole number of rows, the module lands in a left cell
        // and compaction first-fits it into the earliest gap.
        let mut slots = self.normalize(&snapshot.layout);
        slots.push(Some(key));
        self.compact(&slots, &snapshot.spans)
    }

    /// Clear the cell at `index`, dropping the removed module's span.
    #[must_use]
    pub fn remove(&self, snapshot: &LayoutSnapshot, index: usize) -> LayoutSnapshot {
        if !self.is_addressable(snapshot, index) {
            debug!(index, "remove ignored: index is not addressable");
            return self.compact_snapshot(snapshot);
        }
        let mut slots = snapshot.layout.clone();
        let mut spans = snapshot.spans.clone();
        if let Some(key) = slots[index].take() {
            spans.remove(&key);
        }
        self.compact(&slots, &spans)
    }

    /// Drag the module at `source` onto `target`, exchanging the two cells.
    ///
    /// Both participants lose full width so neither lands on a covered cell.
    #[must_use]
    pub fn swap(&self, snapshot: &LayoutSnapshot, source: usize, target: usize) -> LayoutSnapshot {
        let Some(dragged) = snapshot.module_at(source) else {
            debug!(source, "swap ignored: nothing dragged");
            return self.compact_snapshot(snapshot);
        };
        if !self.is_addressable(snapshot, target) {
            debug!(source, target, "swap ignored: target is not a drop target");
            return self.compact_snapshot(snapshot);
        }

        let mut spans = snapshot.spans.clone();
        spans.remove(dragged);
        if let Some(Some(occupant)) = snapshot.layout.get(target) {
            spans.remove(occupant);
        }
        let mut slots = snapshot.layout.clone();
        slots.swap(source, target);
        self.compact(&slots, &spans)
    }

    fn is_addressable(&self, snapshot: &LayoutSnapshot, index: usize) -> bool {
        index < snapshot.layout.len() && !is_covered(&snapshot.layout, &snapshot.spans, index)
    }
}
