//! Plain-text grid rendering for terminal output.

use dashgrid_layout::{GRID_COLUMNS, GridCell, LayoutSnapshot};

/// Inner width of a single-column cell.
const CELL_WIDTH: usize = 18;

fn label(cell: &GridCell<'_>) -> String {
    match cell.module {
        Some(key) => format!("{} {key}", cell.index),
        None => format!("{} (empty)", cell.index),
    }
}

fn pad(text: &str, width: usize) -> String {
    let clipped: String = text.chars().take(width).collect();
    format!("{clipped:<width$}")
}

fn border() -> String {
    let segment = "-".repeat(CELL_WIDTH + 2);
    format!("+{}+", vec![segment; GRID_COLUMNS].join("+"))
}

/// Draw `snapshot` as an ASCII grid, one text row per grid row.
#[must_use]
pub fn render_grid(snapshot: &LayoutSnapshot) -> String {
    let cells = snapshot.cells();
    let border = border();
    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');

    for row in 0..snapshot.row_count() {
        let line: Vec<String> = cells
            .iter()
            .filter(|cell| cell.row == row)
            .map(|cell| {
                let span = usize::from(cell.column_span);
                // A spanning cell also absorbs the separator it covers.
                let width = CELL_WIDTH * span + 3 * (span - 1);
                format!(" {} ", pad(&label(cell), width))
            })
            .collect();
        out.push('|');
        out.push_str(&line.join("|"));
        out.push_str("|\n");
        out.push_str(&border);
        out.push('\n');
    }
    out
}
