//! List layouts: a single row or column with one cell per child.

use std::str::FromStr;

use ember_shared::Vec2;

use super::grid::{GridLayout, Margins};
use super::{Layout, LayoutContext};

/// Layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Horizontal (left to right).
    #[default]
    Horizontal,
    /// Vertical (top to bottom).
    Vertical,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            other => Err(other.to_string()),
        }
    }
}

/// A one-row (horizontal) or one-column (vertical) grid whose cell count
/// follows the number of children.
#[derive(Debug, Clone, PartialEq)]
pub struct ListLayout {
    direction: Direction,
    relative_spacing: f32,
    absolute_spacing: f32,
    grid: GridLayout,
}

impl ListLayout {
    /// Creates a horizontal list.
    #[must_use]
    pub fn horizontal() -> Self {
        Self::new(Direction::Horizontal)
    }

    /// Creates a vertical list.
    #[must_use]
    pub fn vertical() -> Self {
        Self::new(Direction::Vertical)
    }

    /// Creates a list in the given direction.
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            relative_spacing: 0.0,
            absolute_spacing: 0.0,
            grid: GridLayout::new(1, 1),
        }
    }

    /// Sets margins relative to the owner's size.
    #[must_use]
    pub fn with_relative_margins(mut self, margins: Margins) -> Self {
        self.grid = self.grid.with_relative_margins(margins);
        self
    }

    /// Sets absolute margins.
    #[must_use]
    pub fn with_absolute_margins(mut self, margins: Margins) -> Self {
        self.grid = self.grid.with_absolute_margins(margins);
        self
    }

    /// Sets spacing between cells relative to the area inside the margins.
    #[must_use]
    pub const fn with_relative_spacing(mut self, spacing: f32) -> Self {
        self.relative_spacing = spacing;
        self
    }

    /// Sets absolute spacing between cells.
    #[must_use]
    pub const fn with_absolute_spacing(mut self, spacing: f32) -> Self {
        self.absolute_spacing = spacing;
        self
    }

    /// List direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

impl Layout for ListLayout {
    fn build_layout(&mut self, ctx: LayoutContext) {
        let cells = ctx.child_count.max(1);
        let (rows, columns, along) = match self.direction {
            Direction::Horizontal => (1, cells, Vec2::new(1.0, 0.0)),
            Direction::Vertical => (cells, 1, Vec2::new(0.0, 1.0)),
        };

        self.grid.set_dimensions(rows, columns);
        self.grid.set_spacing(along * self.relative_spacing, along * self.absolute_spacing);
        self.grid.build_layout(ctx);
    }

    fn size_for_index(&self, index: usize) -> Vec2 {
        self.grid.size_for_index(index)
    }

    fn position_for_index(&self, index: usize) -> Vec2 {
        self.grid.position_for_index(index)
    }
}
