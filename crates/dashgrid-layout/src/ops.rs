#![forbid(unsafe_code)]

//! Serializable user operations and their dispatch.
//!
//! Each UI action maps to exactly one [`LayoutOperation`]. Applying it yields
//! a [`LayoutOutcome`] whose `changed` flag tells the caller whether the
//! action was a non-event.

use serde::{Deserialize, Serialize};

use crate::engine::LayoutEngine;
use crate::model::{LayoutSnapshot, ModuleKey};

/// One user-level layout action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LayoutOperation {
    /// Expand or collapse the module at `index`.
    ToggleExpand { index: usize },
    /// Place `module` at `index`.
    Add { index: usize, module: ModuleKey },
    /// Place `module` in the first free cell.
    Append { module: ModuleKey },
    /// Clear the cell at `index`.
    Remove { index: usize },
    /// Drag the module at `source` onto `target`.
    Swap { source: usize, target: usize },
    /// Re-derive the canonical layout without other changes.
    Compact,
}

impl LayoutOperation {
    /// Stable name for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ToggleExpand { .. } => "toggle_expand",
            Self::Add { .. } => "add",
            Self::Append { .. } => "append",
            Self::Remove { .. } => "remove",
            Self::Swap { .. } => "swap",
            Self::Compact => "compact",
        }
    }
}

/// Result of applying one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOutcome {
    pub snapshot: LayoutSnapshot,
    /// False when the result equals the input snapshot.
    pub changed: bool,
}

impl LayoutEngine {
    /// Dispatch `operation` to its mutator.
    #[must_use]
    pub fn apply(&self, snapshot: &LayoutSnapshot, operation: LayoutOperation) -> LayoutOutcome {
        let next = match operation {
            LayoutOperation::ToggleExpand { index } => self.toggle_expand(snapshot, index),
            LayoutOperation::Add { index, module } => self.add(snapshot, index, module),
            LayoutOperation::Append { module } => self.append(snapshot, module),
            LayoutOperation::Remove { index } => self.remove(snapshot, index),
            LayoutOperation::Swap { source, target } => self.swap(snapshot, source, target),
            LayoutOperation::Compact => self.compact_snapshot(snapshot),
        };
        LayoutOutcome {
            changed: next != *snapshot,
            snapshot: next,
        }
    }

    /// Apply `operations` in order starting from `initial`.
    #[must_use]
    pub fn replay<I>(&self, initial: &LayoutSnapshot, operations: I) -> LayoutSnapshot
    where
        I: IntoIterator<Item = LayoutOperation>,
    {
        operations
            .into_iter()
            .fold(self.compact_snapshot(initial), |snapshot, operation| {
                self.apply(&snapshot, operation).snapshot
            })
    }
}
