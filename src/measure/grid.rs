//! Covering grids, tiles and occupancy masks for box counting.
use crate::geometry::Envelope;

/// Cap on cells per side of one tile.
pub const MAX_CELLS_PER_SIDE: usize = 40_000;
/// Grid origin is pulled back by `size * GRID_MARGIN` so features on the
/// envelope's near edge are never missed.
pub const GRID_MARGIN: f64 = 1e-9;

/// Axis-aligned grid of square cells covering an envelope.
///
/// Cell `(c, r)` covers `[x0 + c*s, x0 + (c+1)*s] x [y0 + r*s, y0 + (r+1)*s]`.
/// Coordinates map to cells by clamped floor, so the far envelope edge
/// belongs to the last column/row, and the last cell's envelope is
/// stretched to reach that edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGrid {
    origin_x: f64,
    origin_y: f64,
    size: f64,
    ncols: usize,
    nrows: usize,
    limit_x: f64,
    limit_y: f64,
}

impl BoxGrid {
    pub fn covering(envelope: &Envelope, size: f64, offset: f64) -> Self {
        let margin = size * GRID_MARGIN;
        let ncols = (((envelope.width() + offset) / size).ceil() as usize).max(1);
        let nrows = (((envelope.height() + offset) / size).ceil() as usize).max(1);
        Self {
            origin_x: envelope.min_x - margin - offset,
            origin_y: envelope.min_y - margin - offset,
            size,
            ncols,
            nrows,
            limit_x: envelope.max_x,
            limit_y: envelope.max_y,
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn cell_count(&self) -> u64 {
        (self.ncols as u64).saturating_mul(self.nrows as u64)
    }

    #[inline]
    fn clamp_floor(v: f64, origin: f64, size: f64, n: usize) -> usize {
        let k = ((v - origin) / size).floor();
        if k <= 0.0 { 0 } else { (k as usize).min(n - 1) }
    }

    #[inline]
    pub fn column_of(&self, x: f64) -> usize {
        Self::clamp_floor(x, self.origin_x, self.size, self.ncols)
    }

    #[inline]
    pub fn row_of(&self, y: f64) -> usize {
        Self::clamp_floor(y, self.origin_y, self.size, self.nrows)
    }

    /// Inclusive cell span `(c0, r0, c1, r1)` of an envelope.
    pub fn cell_span(&self, env: &Envelope) -> (usize, usize, usize, usize) {
        (self.column_of(env.min_x), self.row_of(env.min_y), self.column_of(env.max_x), self.row_of(env.max_y))
    }

    pub fn cell_envelope(&self, col: usize, row: usize) -> Envelope {
        let s = self.size;
        let x0 = self.origin_x + col as f64 * s;
        let y0 = self.origin_y + row as f64 * s;
        let mut x1 = x0 + s;
        let mut y1 = y0 + s;
        if col + 1 == self.ncols {
            x1 = x1.max(self.limit_x);
        }
        if row + 1 == self.nrows {
            y1 = y1.max(self.limit_y);
        }
        Envelope { min_x: x0, min_y: y0, max_x: x1, max_y: y1 }
    }

    /// Split into tiles of at most [`MAX_CELLS_PER_SIDE`] cells per side,
    /// row-major.
    pub fn tiles(&self) -> Vec<GridTile> {
        let mut tiles = Vec::new();
        for row0 in (0..self.nrows).step_by(MAX_CELLS_PER_SIDE) {
            for col0 in (0..self.ncols).step_by(MAX_CELLS_PER_SIDE) {
                tiles.push(GridTile {
                    col0,
                    row0,
                    col1: (col0 + MAX_CELLS_PER_SIDE).min(self.ncols),
                    row1: (row0 + MAX_CELLS_PER_SIDE).min(self.nrows),
                });
            }
        }
        tiles
    }
}

/// Half-open block of global cell indices `[col0, col1) x [row0, row1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTile {
    pub col0: usize,
    pub row0: usize,
    pub col1: usize,
    pub row1: usize,
}

impl GridTile {
    pub fn cols(&self) -> usize {
        self.col1 - self.col0
    }

    pub fn rows(&self) -> usize {
        self.row1 - self.row0
    }

    pub fn cell_count(&self) -> u64 {
        self.cols() as u64 * self.rows() as u64
    }

    /// Clip an inclusive global span to this tile; `None` when disjoint.
    pub fn clip(
        &self, (c0, r0, c1, r1): (usize, usize, usize, usize),
    ) -> Option<(usize, usize, usize, usize)> {
        let c0 = c0.max(self.col0);
        let r0 = r0.max(self.row0);
        let c1 = c1.min(self.col1 - 1);
        let r1 = r1.min(self.row1 - 1);
        (c0 <= c1 && r0 <= r1).then_some((c0, r0, c1, r1))
    }
}

/// Occupancy bitset over one tile, indexed by global cell coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMask {
    tile: GridTile,
    words: Vec<u64>,
}

impl TileMask {
    pub fn new(tile: GridTile) -> Self {
        let bits = tile.cols() * tile.rows();
        Self { tile, words: vec![0u64; bits.div_ceil(64)] }
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize) {
        let bit = (row - self.tile.row0) * self.tile.cols() + (col - self.tile.col0);
        self.words[bit / 64] |= 1u64 << (bit % 64);
    }

    /// Bitwise OR with a mask over the same tile.
    pub fn union(mut self, other: TileMask) -> Self {
        for (a, b) in self.words.iter_mut().zip(other.words) {
            *a |= b;
        }
        self
    }

    pub fn count(&self) -> u64 {
        self.words.iter().map(|w| u64::from(w.count_ones())).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The grid covers the envelope exactly with clamped edges.
    //
    // Given
    // -----
    // - Envelope [0, 64] x [0, 64], size 4, no offset.
    //
    // Expect
    // ------
    // - 16 x 16 cells; x = 0 maps to column 0, x = 64 to column 15; the last
    //   cell envelope reaches x = 64.
    fn box_grid_covering_clamps_far_edge() {
        // Arrange
        let env = Envelope::new(0.0, 0.0, 64.0, 64.0);

        // Act
        let grid = BoxGrid::covering(&env, 4.0, 0.0);

        // Assert
        assert_eq!((grid.ncols(), grid.nrows()), (16, 16));
        assert_eq!(grid.column_of(0.0), 0);
        assert_eq!(grid.column_of(64.0), 15);
        assert_eq!(grid.column_of(-10.0), 0);
        assert!(grid.cell_envelope(15, 15).max_x >= 64.0);
    }

    #[test]
    // Purpose
    // -------
    // A degenerate (zero-height) envelope still has one row, and an offset
    // adds a column when it pushes the data past the last cell.
    fn box_grid_handles_degenerate_and_offset() {
        let env = Envelope::new(0.0, 0.0, 128.0, 0.0);
        let grid = BoxGrid::covering(&env, 2.0, 0.0);
        assert_eq!((grid.ncols(), grid.nrows()), (64, 1));

        let shifted = BoxGrid::covering(&env, 2.0, 1.0);
        assert_eq!((shifted.ncols(), shifted.nrows()), (65, 1));
    }

    #[test]
    // Purpose
    // -------
    // Tiling partitions the grid without overlap.
    fn box_grid_tiles_partition_cells() {
        let env = Envelope::new(0.0, 0.0, 90_000.0, 10.0);
        let grid = BoxGrid::covering(&env, 1.0, 0.0);
        let tiles = grid.tiles();
        assert_eq!(tiles.len(), 3);
        let total: u64 = tiles.iter().map(GridTile::cell_count).sum();
        assert_eq!(total, grid.cell_count());
        assert_eq!(tiles[2].col1, grid.ncols());
    }

    #[test]
    // Purpose
    // -------
    // Mask union and count behave like set union on cells.
    fn tile_mask_union_counts_distinct_cells() {
        let tile = GridTile { col0: 10, row0: 5, col1: 20, row1: 15 };
        let mut a = TileMask::new(tile);
        let mut b = TileMask::new(tile);
        a.set(10, 5);
        a.set(19, 14);
        b.set(19, 14);
        b.set(12, 7);
        assert_eq!(a.union(b).count(), 3);
        assert_eq!(tile.clip((0, 0, 11, 6)), Some((10, 5, 11, 6)));
        assert_eq!(tile.clip((21, 0, 30, 4)), None);
    }
}
