//! Grid module - the fixed 240x180 arrangement of clock cells
//!
//! Every second of the 12-hour cycle owns exactly one cell, laid out row by
//! row: `seconds = y * GRID_WIDTH + x`.

use shared::CYCLE_SECONDS;

pub const GRID_WIDTH: u32 = 240;
pub const GRID_HEIGHT: u32 = 180;
pub const CELL_COUNT: u32 = GRID_WIDTH * GRID_HEIGHT;

const _: () = assert!(CELL_COUNT == CYCLE_SECONDS);

/// Integer coordinate of a clock cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    /// Build a cell, rejecting coordinates outside the grid
    pub fn new(x: u32, y: u32) -> Option<Self> {
        (x < GRID_WIDTH && y < GRID_HEIGHT).then_some(Self { x, y })
    }

    /// Cell holding a given cycle value
    pub fn from_seconds(seconds: u32) -> Self {
        let seconds = seconds % CELL_COUNT;
        Self {
            x: seconds % GRID_WIDTH,
            y: seconds / GRID_WIDTH,
        }
    }

    /// Cell under a fractional grid position, if it lies inside the grid
    pub fn at(grid_x: f32, grid_y: f32) -> Option<Self> {
        if grid_x < 0.0 || grid_y < 0.0 || !grid_x.is_finite() || !grid_y.is_finite() {
            return None;
        }
        Self::new(grid_x.floor() as u32, grid_y.floor() as u32)
    }

    /// Fixed cycle value displayed by this cell
    pub fn seconds(&self) -> u32 {
        self.y * GRID_WIDTH + self.x
    }
}

/// Iterate every cell in row-major order
pub fn cells() -> impl Iterator<Item = Cell> {
    (0..GRID_HEIGHT).flat_map(|y| (0..GRID_WIDTH).map(move |x| Cell { x, y }))
}
