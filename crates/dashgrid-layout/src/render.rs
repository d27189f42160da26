#![forbid(unsafe_code)]

//! Renderer-facing view of a snapshot.
//!
//! Renderers walk [`LayoutSnapshot::cells`] instead of the raw slots: covered
//! cells are already skipped and full-width modules report a column span of 2.

use serde::Serialize;

use crate::grid::is_covered;
use crate::model::{FULL_WIDTH_SPAN, GRID_COLUMNS, LayoutSnapshot, ModuleKey, row_of};

/// One addressable grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCell<'a> {
    /// Slot index in the layout.
    pub index: usize,
    pub row: usize,
    pub column: usize,
    pub module: Option<&'a ModuleKey>,
    /// 1, or 2 for a full-width module.
    pub column_span: u8,
}

impl GridCell<'_> {
    /// True when the cell can receive a drop or an add action.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.module.is_none()
    }
}

impl LayoutSnapshot {
    /// Addressable cells in slot order.
    #[must_use]
    pub fn cells(&self) -> Vec<GridCell<'_>> {
        self.layout
            .iter()
            .enumerate()
            .filter(|(index, _)| !is_covered(&self.layout, &self.spans, *index))
            .map(|(index, slot)| {
                let module = slot.as_ref();
                let full_width = index % GRID_COLUMNS == 0
                    && module.is_some_and(|key| self.span(key) == FULL_WIDTH_SPAN);
                let column_span = if full_width { FULL_WIDTH_SPAN } else { 1 };
                GridCell {
                    index,
                    row: row_of(index),
                    column: index % GRID_COLUMNS,
                    module,
                    column_span,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covered_cells_are_skipped() {
        let snapshot = LayoutSnapshot::from_keys([Some("sleep"), None, Some("fitness"), None])
            .with_full_width("sleep");
        let cells = snapshot.cells();
        let indices: Vec<usize> = cells.iter().map(|cell| cell.index).collect();
        assert_eq!(indices, vec![0, 2, 3]);
        assert_eq!(cells[0].column_span, 2);
        assert_eq!(cells[1].column_span, 1);
        assert_eq!((cells[2].row, cells[2].column), (1, 1));
        assert!(cells[2].is_empty());
    }

    #[test]
    fn plain_grid_yields_every_cell() {
        let snapshot = LayoutSnapshot::from_keys([Some("a"), Some("b"), None, None]);
        assert_eq!(snapshot.cells().len(), 4);
        assert!(snapshot.cells().iter().all(|cell| cell.column_span == 1));
    }

    #[test]
    fn serializes_for_renderers() {
        let snapshot =
            LayoutSnapshot::from_keys([Some("a"), None, None, None]).with_full_width("a");
        let json = serde_json::to_value(snapshot.cells()).unwrap();
        assert_eq!(json[0]["module"], "a");
        assert_eq!(json[0]["column_span"], 2);
        assert_eq!(json[1]["index"], 2);
    }
}
