//! Walkability raster over the room floor.
//!
//! Every cell starts walkable. Each placed item blocks the cells whose
//! centers fall inside its floor footprint grown by half the agent's width
//! (X) and half its depth (Y), so a walkable cell is a spot where the whole
//! agent fits. Item height is ignored: a shelf mounted above head height
//! still blocks its column.

use crate::config::AgentSize;
use crate::error::{PlacementError, Result};
use crate::geometry::Room;
use crate::placement::PlacedItem;

/// Grid coordinates (column along X, row along Y). Signed so that
/// out-of-room points map to representable, out-of-bounds cells.
pub type Cell = (i32, i32);

/// Boolean walkability grid plus its world mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkGrid {
    nx: i32,
    ny: i32,
    cell_size: f32,
    x_min: f32,
    y_min: f32,
    /// Row-major: index = gy * nx + gx.
    walkable: Vec<bool>,
}

/// Largest raster `for_room` will allocate (a 400 m × 400 m floor at 0.1 m).
pub const MAX_GRID_CELLS: usize = 16_000_000;

/// Number of cells needed to cover `extent`. The small slack keeps
/// 4.0 / 0.1 from rounding up to 41 cells.
fn cells_along(extent: f32, cell_size: f32) -> i32 {
    ((extent / cell_size - 1e-4).ceil() as i32).max(1)
}

impl WalkGrid {
    /// Fully open `nx`×`ny` grid with its origin at (0, 0).
    pub fn open(nx: i32, ny: i32, cell_size: f32) -> Self {
        Self::with_origin(nx.max(1), ny.max(1), cell_size, 0.0, 0.0)
    }

    fn with_origin(nx: i32, ny: i32, cell_size: f32, x_min: f32, y_min: f32) -> Self {
        Self {
            nx,
            ny,
            cell_size,
            x_min,
            y_min,
            walkable: vec![true; nx as usize * ny as usize],
        }
    }

    /// Fully open grid covering the room floor.
    pub fn for_room(room: &Room, cell_size: f32) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(PlacementError::InvalidConfig(format!(
                "cell size must be positive, got {}",
                cell_size
            )));
        }
        room.validate()?;
        let nx = cells_along(room.width(), cell_size);
        let ny = cells_along(room.depth(), cell_size);
        let cells = nx as usize * ny as usize;
        if cells > MAX_GRID_CELLS {
            return Err(PlacementError::InvalidConfig(format!(
                "{}×{} grid ({} cells) exceeds the {} cell limit; raise cell_size_m",
                nx, ny, cells, MAX_GRID_CELLS
            )));
        }
        Ok(Self::with_origin(nx, ny, cell_size, room.x_min, room.y_min))
    }

    pub fn nx(&self) -> i32 {
        self.nx
    }

    pub fn ny(&self) -> i32 {
        self.ny
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn in_bounds(&self, (gx, gy): Cell) -> bool {
        gx >= 0 && gy >= 0 && gx < self.nx && gy < self.ny
    }

    fn index(&self, (gx, gy): Cell) -> usize {
        gy as usize * self.nx as usize + gx as usize
    }

    /// False for blocked and out-of-bounds cells.
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && self.walkable[self.index(cell)]
    }

    pub fn set_blocked(&mut self, cell: Cell) {
        if self.in_bounds(cell) {
            let i = self.index(cell);
            self.walkable[i] = false;
        }
    }

    pub fn blocked_count(&self) -> usize {
        self.walkable.iter().filter(|w| !**w).count()
    }

    /// Cell containing the world point (may be out of bounds).
    pub fn world_to_cell(&self, x: f32, y: f32) -> Cell {
        (
            ((x - self.x_min) / self.cell_size).floor() as i32,
            ((y - self.y_min) / self.cell_size).floor() as i32,
        )
    }

    /// World coordinates of the cell center.
    pub fn cell_center(&self, (gx, gy): Cell) -> (f32, f32) {
        (
            self.x_min + (gx as f32 + 0.5) * self.cell_size,
            self.y_min + (gy as f32 + 0.5) * self.cell_size,
        )
    }

    /// Block every cell whose center lies in the closed rectangle.
    pub fn block_rect(&mut self, x_lo: f32, x_hi: f32, y_lo: f32, y_hi: f32) {
        let c = self.cell_size;
        // First/last index whose center can fall in range, clamped to the grid.
        let gx_lo = (((x_lo - self.x_min) / c - 0.5).ceil() as i32).max(0);
        let gx_hi = (((x_hi - self.x_min) / c - 0.5).floor() as i32).min(self.nx - 1);
        let gy_lo = (((y_lo - self.y_min) / c - 0.5).ceil() as i32).max(0);
        let gy_hi = (((y_hi - self.y_min) / c - 0.5).floor() as i32).min(self.ny - 1);

        for gy in gy_lo..=gy_hi {
            for gx in gx_lo..=gx_hi {
                let (cx, cy) = self.cell_center((gx, gy));
                if cx >= x_lo && cx <= x_hi && cy >= y_lo && cy <= y_hi {
                    self.set_blocked((gx, gy));
                }
            }
        }
    }

    /// One line per row, top row (largest Y) first. `#` blocked, `.` open,
    /// and `*` for cells on `path`.
    pub fn to_ascii(&self, path: &[Cell]) -> String {
        let mut out = String::with_capacity((self.nx as usize + 1) * self.ny as usize);
        for gy in (0..self.ny).rev() {
            for gx in 0..self.nx {
                let ch = if path.contains(&(gx, gy)) {
                    '*'
                } else if self.is_walkable((gx, gy)) {
                    '.'
                } else {
                    '#'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

/// Rasterize the room floor with every placed item's agent-grown footprint
/// blocked. Deterministic: the same inputs always give the same grid.
pub fn build_grid(
    room: &Room,
    placed: &[PlacedItem],
    agent: &AgentSize,
    cell_size: f32,
) -> Result<WalkGrid> {
    let mut grid = WalkGrid::for_room(room, cell_size)?;
    let (hx, hy) = (agent.width / 2.0, agent.depth / 2.0);
    for p in placed {
        let (x_lo, x_hi, y_lo, y_hi) = p.aabb().expanded_footprint(hx, hy);
        grid.block_rect(x_lo, x_hi, y_lo, y_hi);
    }
    Ok(grid)
}
