#![forbid(unsafe_code)]

//! Two-column dashboard module layout engine.
//!
//! A dashboard places named modules into a grid of two columns and a variable
//! number of rows. A module may span both columns of its row. Users reorder
//! modules by dragging, toggle their width, add and remove them.
//!
//! The engine is a set of pure transformations over a [`LayoutSnapshot`]:
//! every mutator builds a raw `(slots, spans)` pair and passes it through
//! [`compact`], which is the single place the grid invariants are enforced.
//!
//! # Usage
//!
//! ```
//! use dashgrid_layout::{LayoutEngine, LayoutOperation};
//!
//! let engine = LayoutEngine::default();
//! let snapshot = engine.default_snapshot();
//!
//! // Expand "productivity" (slot 1) to full width.
//! let outcome = engine.apply(&snapshot, LayoutOperation::ToggleExpand { index: 1 });
//! assert!(outcome.changed);
//! assert_eq!(outcome.snapshot.position_of("productivity"), Some(0));
//! assert_eq!(outcome.snapshot.module_count(), 3);
//! ```
//!
//! # Invariants
//!
//! 1. Slot count is even and at least four.
//! 2. A module key occurs at most once.
//! 3. Every span entry names a placed module and equals 2.
//! 4. Full-width modules sit in left cells; the covered right cell is empty.
//!
//! # Failure Modes
//!
//! None. Malformed input is normalized and invalid indices are no-ops.

pub mod compact;
pub mod engine;
pub mod grid;
pub mod invariants;
mod logging;
pub mod model;
pub mod normalize;
pub mod ops;
pub mod persist;
pub mod render;

pub use compact::compact;
pub use engine::LayoutEngine;
pub use grid::{is_available, is_covered, occupied_count};
pub use invariants::{
    LayoutInvariantCode, LayoutInvariantIssue, LayoutInvariantReport, LayoutInvariantSeverity,
    LayoutValidationError,
};
pub use model::{
    FULL_WIDTH_SPAN, GRID_COLUMNS, LayoutDefaults, LayoutSnapshot, MIN_SLOTS, ModuleKey, Slot,
    SpanMap, span_of,
};
pub use normalize::{RawSlot, normalize, parse_slots_or_default, parse_spans};
pub use ops::{LayoutOperation, LayoutOutcome};
pub use persist::{
    LAYOUT_STORAGE_KEY, LayoutStore, MemoryStore, MemoryStoreError, PersistedLayout,
    SPANS_STORAGE_KEY, decode_snapshot, encode_snapshot, load_snapshot, save_snapshot,
};
pub use render::GridCell;
