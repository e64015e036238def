//! Grid geometry: cells, bounds, occupancy and surface fitting

use serde::{Deserialize, Serialize};

/// A grid cell (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbor one unit away along (dx, dy)
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance to another cell
    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Board dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub cols: u32,
    pub rows: u32,
}

impl Grid {
    /// Create a grid; zero dimensions are raised to 1
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    pub fn total_cells(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.cols && (cell.y as u32) < self.rows
    }

    /// True if the cell is taken by the snake, an obstacle, or (when given) food
    pub fn is_occupied<'a>(
        &self,
        cell: Cell,
        snake: impl IntoIterator<Item = &'a Cell>,
        obstacles: impl IntoIterator<Item = &'a Cell>,
        food: Option<Cell>,
    ) -> bool {
        food == Some(cell)
            || snake.into_iter().any(|c| *c == cell)
            || obstacles.into_iter().any(|c| *c == cell)
    }

    /// Iterate all cells row by row
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows as i32).flat_map(move |y| (0..self.cols as i32).map(move |x| Cell::new(x, y)))
    }
}

/// A grid fitted to a rendering surface with square cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub grid: Grid,
    /// Actual cell edge in surface pixels
    pub cell_size: u32,
}

impl GridLayout {
    /// Fit a grid to the available surface
    ///
    /// Columns and rows come from the desired edge, then the edge is recomputed
    /// so cells stay square, and finally clamped to `min_cell`.
    pub fn fit(available_w: u32, available_h: u32, desired_cell: u32, min_cell: u32) -> Self {
        let desired = desired_cell.max(1);
        let cols = (available_w / desired).max(1);
        let rows = (available_h / desired).max(1);

        let edge = (available_w / cols).min(available_h / rows).max(min_cell);

        Self {
            grid: Grid::new(cols, rows),
            cell_size: edge,
        }
    }

    /// Surface size actually covered by the grid
    pub fn surface_size(&self) -> (u32, u32) {
        (self.grid.cols * self.cell_size, self.grid.rows * self.cell_size)
    }

    /// Top-left pixel of a cell
    pub fn cell_origin(&self, cell: Cell) -> (f32, f32) {
        let edge = self.cell_size as f32;
        (cell.x as f32 * edge, cell.y as f32 * edge)
    }
}
