#![forbid(unsafe_code)]

//! Compaction: re-derive a gap-free, invariant-respecting snapshot from a
//! possibly inconsistent raw one.
//!
//! # Algorithm
//!
//! 1. Normalize the raw slots.
//! 2. Scan left to right, skipping covered cells, collecting each module the
//!    first time it is seen. Modules stranded in covered cells are dropped.
//! 3. Keep only span entries that name a collected module and equal
//!    [`FULL_WIDTH_SPAN`].
//! 4. Place the modules, in scan order, into a fresh grid by first fit:
//!    full-width modules take the first row with both cells empty, others take
//!    the first available cell. Either grows the grid by one row on a miss.
//! 5. Trim trailing empty rows down to [`MIN_SLOTS`].
//!
//! # Invariants
//!
//! - `compact(compact(x)) == compact(x)`.
//! - Every collected module is placed exactly once.
//! - Every span entry names a placed module sitting in a left cell.
//! - Covered cells are empty.

use std::collections::BTreeSet;

use crate::grid::{grow_row, is_available, is_covered};
use crate::logging::{debug, trace};
use crate::model::{
    FULL_WIDTH_SPAN, GRID_COLUMNS, LayoutDefaults, LayoutSnapshot, MIN_SLOTS, ModuleKey, Slot,
    SpanMap,
};
use crate::normalize::{normalize, normalize_owned};

/// Compact a raw `(slots, spans)` pair into a canonical snapshot.
#[must_use]
pub fn compact(
    raw_slots: &[Slot],
    raw_spans: &SpanMap,
    defaults: &LayoutDefaults,
) -> LayoutSnapshot {
    let slots = normalize(raw_slots, defaults);
    let ordered = ordered_modules(&slots, raw_spans);

    let spans: SpanMap = raw_spans
        .iter()
        .filter(|(key, span)| **span == FULL_WIDTH_SPAN && ordered.contains(*key))
        .map(|(key, span)| (key.clone(), *span))
        .collect();

    let mut target: Vec<Slot> = vec![None; slots.len().max(MIN_SLOTS)];
    for key in ordered {
        let index = if spans.contains_key(&key) {
            first_fit_full_width(&mut target)
        } else {
            first_fit_single(&mut target, &spans)
        };
        trace!(module = %key, index, "placed module");
        target[index] = Some(key);
    }

    trim_trailing_rows(&mut target);
    debug!(
        slots = target.len(),
        full_width = spans.len(),
        "compacted layout"
    );

    LayoutSnapshot {
        layout: normalize_owned(target, defaults),
        spans,
    }
}

/// Modules in left-to-right scan order, skipping covered cells and repeats.
fn ordered_modules(slots: &[Slot], spans: &SpanMap) -> Vec<ModuleKey> {
    let mut seen = BTreeSet::new();
    slots
        .iter()
        .enumerate()
        .filter(|(index, _)| !is_covered(slots, spans, *index))
        .filter_map(|(_, slot)| slot.as_ref())
        .filter(|key| seen.insert((*key).clone()))
        .cloned()
        .collect()
}

fn first_fit_full_width(target: &mut Vec<Slot>) -> usize {
    let free_row = (0..target.len())
        .step_by(GRID_COLUMNS)
        .find(|&start| target[start].is_none() && target[start + 1].is_none());
    free_row.unwrap_or_else(|| {
        let start = target.len();
        grow_row(target);
        start
    })
}

fn first_fit_single(target: &mut Vec<Slot>, spans: &SpanMap) -> usize {
    let free_cell = (0..target.len()).find(|&index| is_available(target, spans, index));
    free_cell.unwrap_or_else(|| {
        let start = target.len();
        grow_row(target);
        start
    })
}

fn trim_trailing_rows(target: &mut Vec<Slot>) {
    while target.len() > MIN_SLOTS
        && target[target.len() - GRID_COLUMNS..]
            .iter()
            .all(Option::is_none)
    {
        target.truncate(target.len() - GRID_COLUMNS);
    }
}
