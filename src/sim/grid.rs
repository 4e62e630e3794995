//! Uniform-grid broad-phase
//!
//! Rebuilt from the pools at the start of every collision pass. Cells hold
//! slot indices only; bodies are clamped onto the grid so anything partly
//! off-field still lands in an edge cell. A cell that is already full
//! silently drops further entries.

use super::pool::Pool;
use super::rect::Aabb;
use crate::consts::{CELL_CAPACITY, CELL_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Grid columns covering the playfield
pub const GRID_COLS: usize = (SCREEN_WIDTH / CELL_SIZE) as usize + 1;
/// Grid rows covering the playfield
pub const GRID_ROWS: usize = (SCREEN_HEIGHT / CELL_SIZE) as usize + 1;

/// Candidate sets are bitmasks, so indexed pools must fit in 64 slots
const MAX_INDEXED: usize = 64;

const _: () = assert!(crate::consts::MAX_ENEMIES <= MAX_INDEXED);
const _: () = assert!(crate::consts::MAX_ENEMY_BULLETS <= MAX_INDEXED);
const _: () = assert!(crate::consts::MAX_POWERUPS <= MAX_INDEXED);

#[derive(Debug, Clone, Copy)]
struct Cell {
    len: u8,
    items: [u8; CELL_CAPACITY],
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            len: 0,
            items: [0; CELL_CAPACITY],
        }
    }
}

/// Inclusive cell range covered by a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub col_min: usize,
    pub col_max: usize,
    pub row_min: usize,
    pub row_max: usize,
}

impl CellSpan {
    pub fn of(rect: &Aabb) -> Self {
        let (col_min, col_max) = axis_span(rect.left(), rect.right(), GRID_COLS);
        let (row_min, row_max) = axis_span(rect.top(), rect.bottom(), GRID_ROWS);
        Self {
            col_min,
            col_max,
            row_min,
            row_max,
        }
    }
}

fn axis_cell(v: f32, cells: usize) -> usize {
    let c = (v / CELL_SIZE).floor();
    if c.is_nan() || c < 0.0 {
        0
    } else {
        (c as usize).min(cells - 1)
    }
}

fn axis_span(lo: f32, hi: f32, cells: usize) -> (usize, usize) {
    let a = axis_cell(lo, cells);
    let b = axis_cell(hi, cells);
    (a.min(b), a.max(b))
}

/// Set of pool indices gathered from one or more cells (deduplicated)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Candidates(u64);

impl Candidates {
    pub fn insert(&mut self, index: usize) {
        self.0 |= 1u64 << index;
    }

    pub fn contains(&self, index: usize) -> bool {
        index < MAX_INDEXED && self.0 & (1u64 << index) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Indices in ascending order
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(index)
        })
    }
}

/// Uniform grid over the playfield holding slot indices
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cells: Vec<Cell>,
    /// Entries dropped because their cell was full during the last rebuild
    overflow: usize,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self {
            cells: vec![Cell::default(); GRID_COLS * GRID_ROWS],
            overflow: 0,
        }
    }
}

impl SpatialGrid {
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.len = 0;
        }
        self.overflow = 0;
    }

    /// Insert `index` into every cell the rectangle covers
    pub fn insert(&mut self, index: usize, rect: &Aabb) {
        debug_assert!(index < MAX_INDEXED);
        let span = CellSpan::of(rect);
        for row in span.row_min..=span.row_max {
            for col in span.col_min..=span.col_max {
                let cell = &mut self.cells[row * GRID_COLS + col];
                if (cell.len as usize) < CELL_CAPACITY {
                    cell.items[cell.len as usize] = index as u8;
                    cell.len += 1;
                } else {
                    self.overflow += 1;
                }
            }
        }
    }

    /// Clear and index every active slot of a pool
    pub fn rebuild<T>(&mut self, pool: &Pool<T>, rect_of: impl Fn(&T) -> Aabb)
    where
        T: super::pool::Slot,
    {
        self.clear();
        for (index, entity) in pool.iter_active() {
            self.insert(index, &rect_of(entity));
        }
    }

    /// Indices stored in any cell the rectangle covers. Each index appears
    /// once no matter how many cells it shares with the query.
    pub fn query(&self, rect: &Aabb) -> Candidates {
        let span = CellSpan::of(rect);
        let mut seen = Candidates::default();
        for row in span.row_min..=span.row_max {
            for col in span.col_min..=span.col_max {
                let cell = &self.cells[row * GRID_COLS + col];
                for &index in &cell.items[..cell.len as usize] {
                    seen.insert(index as usize);
                }
            }
        }
        seen
    }

    pub fn overflow(&self) -> usize {
        self.overflow
    }
}

/// Per-step broad-phase scratch owned by the collision resolver
#[derive(Debug, Clone, Default)]
pub struct CollisionScratch {
    pub enemies: SpatialGrid,
    pub enemy_bullets: SpatialGrid,
    pub powerups: SpatialGrid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions_cover_playfield() {
        assert!(GRID_COLS as f32 * CELL_SIZE >= SCREEN_WIDTH);
        assert!(GRID_ROWS as f32 * CELL_SIZE >= SCREEN_HEIGHT);
    }

    #[test]
    fn test_span_clamps_off_field_bodies() {
        let span = CellSpan::of(&Aabb::from_xywh(-40.0, -10.0, 16.0, 12.0));
        assert_eq!((span.col_min, span.col_max), (0, 0));
        assert_eq!((span.row_min, span.row_max), (0, 0));

        let span = CellSpan::of(&Aabb::from_xywh(500.0, 400.0, 64.0, 48.0));
        assert_eq!((span.col_min, span.col_max), (GRID_COLS - 1, GRID_COLS - 1));
        assert_eq!((span.row_min, span.row_max), (GRID_ROWS - 1, GRID_ROWS - 1));
    }

    #[test]
    fn test_body_spanning_cells_is_found_once() {
        let mut grid = SpatialGrid::default();
        // Straddles four cells around (64, 64)
        grid.insert(3, &Aabb::from_xywh(56.0, 56.0, 16.0, 16.0));
        let found = grid.query(&Aabb::from_xywh(0.0, 0.0, 128.0, 128.0));
        assert_eq!(found.len(), 1);
        assert!(found.contains(3));
    }

    #[test]
    fn test_query_misses_distant_cells() {
        let mut grid = SpatialGrid::default();
        grid.insert(1, &Aabb::from_xywh(10.0, 10.0, 8.0, 4.0));
        grid.insert(2, &Aabb::from_xywh(400.0, 280.0, 8.0, 4.0));
        let found = grid.query(&Aabb::from_xywh(12.0, 8.0, 8.0, 8.0));
        assert!(found.contains(1));
        assert!(!found.contains(2));
    }

    #[test]
    fn test_full_cell_drops_extra_entries() {
        let mut grid = SpatialGrid::default();
        let rect = Aabb::from_xywh(4.0, 4.0, 4.0, 4.0);
        for index in 0..CELL_CAPACITY + 3 {
            grid.insert(index, &rect);
        }
        assert_eq!(grid.query(&rect).len(), CELL_CAPACITY);
        assert_eq!(grid.overflow(), 3);
        grid.clear();
        assert!(grid.query(&rect).is_empty());
    }

    #[test]
    fn test_candidates_iterate_ascending() {
        let mut c = Candidates::default();
        for i in [29, 0, 7, 63] {
            c.insert(i);
        }
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![0, 7, 29, 63]);
    }
}
