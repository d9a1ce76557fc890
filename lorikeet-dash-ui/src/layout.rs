//! Grid Layout
//!
//! Tile placement for the chart grid. A tile's position is a pure function
//! of the chart's index in the fetched list, so the layout is never stored.

/// Columns of the widest breakpoint
pub const COLUMNS: u32 = 12;

/// Default tile size in grid cells
pub const TILE_WIDTH: u32 = 6;
pub const TILE_HEIGHT: u32 = 2;

/// Height of one grid row in pixels
pub const ROW_HEIGHT_PX: u32 = 150;

/// Gap between cells in pixels
pub const MARGIN_PX: u32 = 10;

/// Vertical distance covered by one extra row of a tile
pub const ROW_PITCH_PX: f64 = (ROW_HEIGHT_PX + MARGIN_PX) as f64;

/// (minimum container width, columns), widest first
const BREAKPOINTS: [(i32, u32); 5] = [(1200, 12), (996, 10), (768, 6), (480, 4), (0, 2)];

/// Position and size of one chart tile, in grid cells
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutEntry {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl LayoutEntry {
    /// Entry for the chart at `index`: two tiles per row, every tile on row 0.
    ///
    /// Row 0 is kept for every tile; the grid's auto-flow moves overlapping
    /// tiles down.
    pub fn for_index(id: impl Into<String>, index: usize) -> Self {
        Self {
            id: id.into(),
            x: ((index * TILE_WIDTH as usize) % COLUMNS as usize) as u32,
            y: 0,
            w: TILE_WIDTH,
            h: TILE_HEIGHT,
        }
    }

    /// Same tile with a user-chosen span
    pub fn with_span(&self, w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            ..self.clone()
        }
    }

    /// Clamp into a grid of `columns`, shifting left when the tile overhangs
    pub fn fit(&self, columns: u32) -> Placement {
        let columns = columns.max(1);
        let span = self.w.clamp(1, columns);
        let column = self.x.min(columns - span);

        Placement {
            column,
            span,
            rows: self.h.max(1),
        }
    }
}

/// A tile resolved against the current column count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Zero-based start column
    pub column: u32,
    pub span: u32,
    pub rows: u32,
}

impl Placement {
    /// CSS grid placement; rows are left to auto-flow
    pub fn style(&self) -> String {
        format!(
            "grid-column: {} / span {}; grid-row: span {};",
            self.column + 1,
            self.span,
            self.rows
        )
    }
}

/// Layout for an ordered chart list
pub fn layout(charts: &[String]) -> Vec<LayoutEntry> {
    charts
        .iter()
        .enumerate()
        .map(|(i, name)| LayoutEntry::for_index(name.as_str(), i))
        .collect()
}

/// Column count for a container width
pub fn columns_for_width(width: i32) -> u32 {
    BREAKPOINTS
        .iter()
        .find(|(min_width, _)| width >= *min_width)
        .map(|(_, columns)| *columns)
        .unwrap_or(BREAKPOINTS[BREAKPOINTS.len() - 1].1)
}

/// Span after dragging a resize handle by `delta` pixels.
///
/// Sizes snap to whole cells; width stays within `1..=columns`, height at
/// least one row.
pub fn resize_span(start: (u32, u32), delta: (f64, f64), cell: (f64, f64), columns: u32) -> (u32, u32) {
    let (cell_width, cell_height) = cell;

    let w = if cell_width > 0.0 {
        (start.0 as f64 + delta.0 / cell_width).round()
    } else {
        start.0 as f64
    };
    let h = if cell_height > 0.0 {
        (start.1 as f64 + delta.1 / cell_height).round()
    } else {
        start.1 as f64
    };

    (
        w.clamp(1.0, columns.max(1) as f64) as u32,
        h.max(1.0) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("chart-{}", i)).collect()
    }

    #[test]
    fn test_layout_formula() {
        for n in [0, 1, 2, 3, 13] {
            let entries = layout(&names(n));
            assert_eq!(entries.len(), n);

            for (i, entry) in entries.iter().enumerate() {
                assert_eq!(entry.id, format!("chart-{}", i));
                assert_eq!(entry.x, ((i * 6) % 12) as u32);
                assert_eq!(entry.y, 0);
                assert_eq!(entry.w, 6);
                assert_eq!(entry.h, 2);
            }
        }
    }

    #[test]
    fn test_three_charts_keep_row_zero() {
        let charts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let entries = layout(&charts);

        let columns: Vec<u32> = entries.iter().map(|e| e.x).collect();
        let rows: Vec<u32> = entries.iter().map(|e| e.y).collect();

        assert_eq!(columns, vec![0, 6, 0]);
        assert_eq!(rows, vec![0, 0, 0]);
    }

    #[test]
    fn test_columns_for_width() {
        assert_eq!(columns_for_width(1920), 12);
        assert_eq!(columns_for_width(1200), 12);
        assert_eq!(columns_for_width(1199), 10);
        assert_eq!(columns_for_width(800), 6);
        assert_eq!(columns_for_width(500), 4);
        assert_eq!(columns_for_width(320), 2);
        assert_eq!(columns_for_width(0), 2);
    }

    #[test]
    fn test_fit_full_grid() {
        let placement = LayoutEntry::for_index("b", 1).fit(12);
        assert_eq!(placement, Placement { column: 6, span: 6, rows: 2 });
        assert_eq!(placement.style(), "grid-column: 7 / span 6; grid-row: span 2;");
    }

    #[test]
    fn test_fit_narrow_grid() {
        // Second tile of a row no longer fits next to the first.
        assert_eq!(
            LayoutEntry::for_index("b", 1).fit(6),
            Placement { column: 0, span: 6, rows: 2 }
        );
        assert_eq!(
            LayoutEntry::for_index("a", 0).fit(4),
            Placement { column: 0, span: 4, rows: 2 }
        );
        assert_eq!(
            LayoutEntry::for_index("b", 1).fit(10),
            Placement { column: 4, span: 6, rows: 2 }
        );
    }

    #[test]
    fn test_resize_span_snaps_to_cells() {
        // 1200px grid, 12 columns: 100px cells
        let cell = (100.0, ROW_PITCH_PX);

        assert_eq!(resize_span((6, 2), (0.0, 0.0), cell, 12), (6, 2));
        assert_eq!(resize_span((6, 2), (140.0, 0.0), cell, 12), (7, 2));
        assert_eq!(resize_span((6, 2), (-260.0, 170.0), cell, 12), (3, 3));
    }

    #[test]
    fn test_resize_span_clamps() {
        let cell = (100.0, ROW_PITCH_PX);

        assert_eq!(resize_span((6, 2), (5000.0, 0.0), cell, 12), (12, 2));
        assert_eq!(resize_span((6, 2), (-5000.0, -5000.0), cell, 12), (1, 1));
        // Unmeasured grid keeps the starting span
        assert_eq!(resize_span((6, 2), (300.0, 0.0), (0.0, ROW_PITCH_PX), 12), (6, 2));
    }
}
