#![forbid(unsafe_code)]

//! Slot predicates over a raw `(slots, spans)` pair.

use crate::model::{GRID_COLUMNS, ModuleKey, Slot, SpanMap, is_full_width};

/// True when `index` is the right cell of a row whose left cell holds a
/// full-width module. Covered cells are never independently addressable.
///
/// ```
/// use dashgrid_layout::{LayoutSnapshot, is_covered};
///
/// let snapshot = LayoutSnapshot::from_keys([Some("sleep"), None, Some("fitness"), None])
///     .with_full_width("sleep");
/// assert!(is_covered(&snapshot.layout, &snapshot.spans, 1));
/// assert!(!is_covered(&snapshot.layout, &snapshot.spans, 3));
/// ```
#[must_use]
pub fn is_covered(slots: &[Slot], spans: &SpanMap, index: usize) -> bool {
    if index % GRID_COLUMNS == 0 {
        return false;
    }
    matches!(slots.get(index - 1), Some(Some(left)) if is_full_width(spans, left))
}

/// True when `index` exists, is empty, and is not covered.
#[must_use]
pub fn is_available(slots: &[Slot], spans: &SpanMap, index: usize) -> bool {
    matches!(slots.get(index), Some(None)) && !is_covered(slots, spans, index)
}

/// Number of occupied slots.
#[must_use]
pub fn occupied_count(slots: &[Slot]) -> usize {
    slots.iter().filter(|slot| slot.is_some()).count()
}

/// Append one empty row.
pub(crate) fn grow_row(slots: &mut Vec<Slot>) {
    slots.extend(std::iter::repeat_n(None, GRID_COLUMNS));
}

/// Insert `key` at `index`, shifting occupants right into the first empty
/// cell at or after `index`. Grows by whole rows when no such cell exists.
pub(crate) fn insert_at(slots: &mut Vec<Slot>, key: ModuleKey, index: usize) {
    let hole = loop {
        if let Some(offset) = slots.iter().skip(index).position(Option::is_none) {
            break index + offset;
        }
        grow_row(slots);
    };
    // Rotating the window [index, hole] right moves the hole to `index`.
    slots[index..=hole].rotate_right(1);
    slots[index] = Some(key);
}
