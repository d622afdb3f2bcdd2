use rand::seq::SliceRandom;
use rand::Rng;
use shared::{Cell, GridConfig};

/// Discrete lattice laid over a pixel surface
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: u32,
    height: u32,
    pitch: u32,
    cells: Vec<Cell>,
}

/// Every cell of a `width x height` surface cut into squares of side `pitch`,
/// column by column. A zero pitch gives an empty lattice.
pub fn compute_cells(width: u32, height: u32, pitch: u32) -> Vec<Cell> {
    if pitch == 0 {
        return Vec::new();
    }

    let cols = (width / pitch) as i32;
    let rows = (height / pitch) as i32;

    let mut cells = Vec::with_capacity((cols.max(0) * rows.max(0)) as usize);
    for x in 0..cols {
        for y in 0..rows {
            cells.push(Cell::new(x, y));
        }
    }
    cells
}

impl Grid {
    pub fn new(width: u32, height: u32, config: &GridConfig) -> Self {
        let pitch = config.pitch();
        Self {
            width,
            height,
            pitch,
            cells: compute_cells(width, height, pitch),
        }
    }

    /// Recompute the lattice for a new surface size or pitch
    pub fn resize(&mut self, width: u32, height: u32, pitch: u32) {
        self.width = width;
        self.height = height;
        self.pitch = pitch;
        self.cells = compute_cells(width, height, pitch);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    pub fn cols(&self) -> i32 {
        if self.pitch == 0 {
            0
        } else {
            (self.width / self.pitch) as i32
        }
    }

    pub fn rows(&self) -> i32 {
        if self.pitch == 0 {
            0
        } else {
            (self.height / self.pitch) as i32
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.cols() && cell.y < self.rows()
    }

    /// Uniformly random cell, or `None` when the surface is smaller than a cell
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Option<Cell> {
        self.cells.choose(rng).copied()
    }
}
