//! Grid layout: a fixed number of equal cells with margins and spacing.

use std::fmt;
use std::str::FromStr;

use ember_shared::Vec2;

use super::{Layout, LayoutContext};

/// Order in which child indices fill grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellOrder {
    /// Left to right, then top to bottom.
    #[default]
    RowMajor,
    /// Top to bottom, then left to right.
    ColumnMajor,
}

impl fmt::Display for CellOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RowMajor => "RowMajor",
            Self::ColumnMajor => "ColMajor",
        })
    }
}

impl FromStr for CellOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rowmajor" => Ok(Self::RowMajor),
            "colmajor" | "columnmajor" => Ok(Self::ColumnMajor),
            other => Err(other.to_string()),
        }
    }
}

/// Margins as `[top, right, bottom, left]`.
pub type Margins = [f32; 4];

/// Lays children out in a `rows x columns` grid of equal cells.
///
/// Margins and spacing each have a relative part (fraction of the owner's
/// size for margins, of the area inside the margins for spacing) and an
/// absolute part. Cells fill from the top-left corner. Indices past the last
/// cell get zero size and sit at the owner's bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    rows: usize,
    columns: usize,
    order: CellOrder,
    relative_margins: Margins,
    absolute_margins: Margins,
    relative_spacing: Vec2,
    absolute_spacing: Vec2,
    cell_size: Vec2,
    positions: Vec<Vec2>,
}

impl GridLayout {
    /// Creates a grid. Zero rows or columns are raised to one.
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows: rows.max(1),
            columns: columns.max(1),
            order: CellOrder::RowMajor,
            relative_margins: [0.0; 4],
            absolute_margins: [0.0; 4],
            relative_spacing: Vec2::ZERO,
            absolute_spacing: Vec2::ZERO,
            cell_size: Vec2::ZERO,
            positions: Vec::new(),
        }
    }

    /// Sets the cell fill order.
    #[must_use]
    pub const fn with_order(mut self, order: CellOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets margins relative to the owner's size.
    #[must_use]
    pub const fn with_relative_margins(mut self, margins: Margins) -> Self {
        self.relative_margins = margins;
        self
    }

    /// Sets absolute margins.
    #[must_use]
    pub const fn with_absolute_margins(mut self, margins: Margins) -> Self {
        self.absolute_margins = margins;
        self
    }

    /// Sets horizontal (`x`) and vertical (`y`) spacing relative to the area
    /// inside the margins.
    #[must_use]
    pub const fn with_relative_spacing(mut self, spacing: Vec2) -> Self {
        self.relative_spacing = spacing;
        self
    }

    /// Sets absolute horizontal (`x`) and vertical (`y`) spacing.
    #[must_use]
    pub const fn with_absolute_spacing(mut self, spacing: Vec2) -> Self {
        self.absolute_spacing = spacing;
        self
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    pub(crate) fn set_dimensions(&mut self, rows: usize, columns: usize) {
        self.rows = rows.max(1);
        self.columns = columns.max(1);
    }

    pub(crate) fn set_spacing(&mut self, relative: Vec2, absolute: Vec2) {
        self.relative_spacing = relative;
        self.absolute_spacing = absolute;
    }

    /// `(row, column)` of a cell index.
    fn coords(&self, index: usize) -> (usize, usize) {
        match self.order {
            CellOrder::RowMajor => (index / self.columns, index % self.columns),
            CellOrder::ColumnMajor => (index % self.rows, index / self.rows),
        }
    }
}

impl Layout for GridLayout {
    #[allow(clippy::cast_precision_loss)]
    fn build_layout(&mut self, ctx: LayoutContext) {
        let size = ctx.final_size;
        let [rel_top, rel_right, rel_bottom, rel_left] = self.relative_margins;
        let [abs_top, abs_right, abs_bottom, abs_left] = self.absolute_margins;

        let top = rel_top * size.y + abs_top;
        let right = rel_right * size.x + abs_right;
        let bottom = rel_bottom * size.y + abs_bottom;
        let left = rel_left * size.x + abs_left;

        let inner = Vec2::new(size.x - left - right, size.y - top - bottom);
        let spacing = self.relative_spacing * inner + self.absolute_spacing;

        let columns = self.columns as f32;
        let rows = self.rows as f32;
        self.cell_size = Vec2::new(
            ((inner.x - spacing.x * (columns - 1.0)) / columns).max(0.0),
            ((inner.y - spacing.y * (rows - 1.0)) / rows).max(0.0),
        );

        let cell = self.cell_size;
        self.positions = (0..self.cell_count())
            .map(|index| {
                let (row, column) = self.coords(index);
                Vec2::new(
                    left + column as f32 * (cell.x + spacing.x) + cell.x * 0.5,
                    size.y - top - row as f32 * (cell.y + spacing.y) - cell.y * 0.5,
                )
            })
            .collect();
    }

    fn size_for_index(&self, index: usize) -> Vec2 {
        if index < self.positions.len() {
            self.cell_size
        } else {
            Vec2::ZERO
        }
    }

    fn position_for_index(&self, index: usize) -> Vec2 {
        self.positions.get(index).copied().unwrap_or(Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(mut grid: GridLayout, size: Vec2) -> GridLayout {
        grid.build_layout(LayoutContext {
            final_size: size,
            child_count: grid.cell_count(),
        });
        grid
    }

    #[test]
    fn test_row_major_cells() {
        let grid = built(GridLayout::new(2, 2), Vec2::new(100.0, 50.0));

        assert_eq!(grid.size_for_index(0), Vec2::new(50.0, 25.0));
        assert_eq!(grid.position_for_index(0), Vec2::new(25.0, 37.5));
        assert_eq!(grid.position_for_index(1), Vec2::new(75.0, 37.5));
        assert_eq!(grid.position_for_index(2), Vec2::new(25.0, 12.5));
    }

    #[test]
    fn test_column_major_cells() {
        let grid = built(GridLayout::new(2, 2).with_order(CellOrder::ColumnMajor), Vec2::new(100.0, 50.0));

        assert_eq!(grid.position_for_index(1), Vec2::new(25.0, 12.5));
        assert_eq!(grid.position_for_index(2), Vec2::new(75.0, 37.5));
    }

    #[test]
    fn test_margins_and_spacing() {
        let grid = built(
            GridLayout::new(1, 2)
                .with_absolute_margins([10.0, 10.0, 10.0, 10.0])
                .with_absolute_spacing(Vec2::new(20.0, 0.0)),
            Vec2::new(120.0, 60.0),
        );

        // inner 100x40, two cells of 40 with 20 between
        assert_eq!(grid.size_for_index(0), Vec2::new(40.0, 40.0));
        assert_eq!(grid.position_for_index(0), Vec2::new(30.0, 30.0));
        assert_eq!(grid.position_for_index(1), Vec2::new(90.0, 30.0));
    }

    #[test]
    fn test_index_past_last_cell() {
        let grid = built(GridLayout::new(1, 1), Vec2::new(10.0, 10.0));

        assert_eq!(grid.size_for_index(1), Vec2::ZERO);
        assert_eq!(grid.position_for_index(1), Vec2::ZERO);
    }

    #[test]
    fn test_parse_order() {
        assert_eq!("ColMajor".parse(), Ok(CellOrder::ColumnMajor));
        assert_eq!("rowmajor".parse(), Ok(CellOrder::RowMajor));
        assert!("Diagonal".parse::<CellOrder>().is_err());
    }
}
