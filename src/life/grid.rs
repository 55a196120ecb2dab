//! Toroidal cell grid.
//!
//! Cells are stored row-major, one byte per cell, using the same byte values
//! the raster snapshots use (`ALIVE` = 0xFF, `DEAD` = 0). Every coordinate
//! lookup that crosses an edge wraps around to the opposite side.

/// Byte value of a live cell.
pub const ALIVE: u8 = 0xFF;
/// Byte value of a dead cell.
pub const DEAD: u8 = 0;

/// A single grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// An all-dead grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![DEAD; width * height],
        }
    }

    /// Build a grid from a row-major raster. Any nonzero byte is alive.
    ///
    /// # Panics
    /// If `raster.len() != width * height`.
    pub fn from_raster(width: usize, height: usize, raster: &[u8]) -> Self {
        assert_eq!(
            raster.len(),
            width * height,
            "raster length does not match {width}x{height}"
        );
        let cells = raster
            .iter()
            .map(|&b| if b != DEAD { ALIVE } else { DEAD })
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build a grid with exactly the given cells alive.
    pub fn with_alive<I>(width: usize, height: usize, alive: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut grid = Self::new(width, height);
        for cell in alive {
            grid.set(cell.x, cell.y, true);
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x},{y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[self.index(x, y)] != DEAD
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        let idx = self.index(x, y);
        self.cells[idx] = if alive { ALIVE } else { DEAD };
    }

    /// Row `y` as raw bytes.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// The full raster, row-major.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    /// Row index above `y`, wrapping to the last row.
    #[inline(always)]
    pub fn row_above(&self, y: usize) -> usize {
        (y + self.height - 1) % self.height
    }

    /// Row index below `y`, wrapping to the first row.
    #[inline(always)]
    pub fn row_below(&self, y: usize) -> usize {
        (y + 1) % self.height
    }

    /// Number of live cells among the 8 wrapped neighbors of `(x, y)`.
    pub fn neighbor_count(&self, x: usize, y: usize) -> u8 {
        assert!(
            x < self.width && y < self.height,
            "cell ({x},{y}) outside {}x{} grid",
            self.width,
            self.height
        );
        neighbors_in_rows(
            self.row(self.row_above(y)),
            self.row(y),
            self.row(self.row_below(y)),
            x,
        )
    }

    pub fn count_alive(&self) -> usize {
        self.cells.iter().filter(|&&b| b != DEAD).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&b| b == DEAD)
    }

    /// Coordinates of every live cell, row-major.
    pub fn alive_cells(&self) -> Vec<Cell> {
        let mut out = Vec::new();
        for (y, row) in self.cells.chunks_exact(self.width.max(1)).enumerate() {
            for (x, &b) in row.iter().enumerate() {
                if b != DEAD {
                    out.push(Cell::new(x, y));
                }
            }
        }
        out
    }
}

/// Count live neighbors of column `x` given the three rows around it.
/// All rows must share the same width.
#[inline(always)]
pub(crate) fn neighbors_in_rows(above: &[u8], row: &[u8], below: &[u8], x: usize) -> u8 {
    let width = row.len();
    let left = (x + width - 1) % width;
    let right = (x + 1) % width;

    let live = |b: u8| (b != DEAD) as u8;
    live(above[left])
        + live(above[x])
        + live(above[right])
        + live(row[left])
        + live(row[right])
        + live(below[left])
        + live(below[x])
        + live(below[right])
}

#[cfg(test)]
mod tests {
    use super::{ALIVE, Cell, DEAD, Grid};

    #[test]
    fn lone_corner_cell_is_seen_across_both_edges() {
        let n = 5;
        let grid = Grid::with_alive(n, n, [Cell::new(0, 0)]);

        for (x, y) in [(n - 1, n - 1), (n - 1, 0), (0, n - 1), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(grid.neighbor_count(x, y), 1, "({x},{y}) should see (0,0)");
        }
        assert_eq!(grid.neighbor_count(0, 0), 0);
        assert_eq!(grid.neighbor_count(2, 2), 0);
    }

    #[test]
    fn full_grid_counts_eight_neighbors() {
        let grid = Grid::from_raster(4, 4, &[ALIVE; 16]);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(grid.neighbor_count(x, y), 8);
            }
        }
    }

    #[test]
    fn nonzero_raster_bytes_are_alive() {
        let grid = Grid::from_raster(3, 1, &[0, 1, 200]);
        assert_eq!(grid.as_bytes(), &[DEAD, ALIVE, ALIVE]);
        assert_eq!(grid.count_alive(), 2);
    }

    #[test]
    fn alive_cells_are_row_major() {
        let grid = Grid::with_alive(3, 3, [Cell::new(2, 2), Cell::new(1, 0), Cell::new(0, 1)]);
        assert_eq!(
            grid.alive_cells(),
            vec![Cell::new(1, 0), Cell::new(0, 1), Cell::new(2, 2)]
        );
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_range_get_panics() {
        let grid = Grid::new(4, 4);
        grid.get(4, 0);
    }

    #[test]
    fn one_by_one_grid_is_its_own_neighbor() {
        let grid = Grid::with_alive(1, 1, [Cell::new(0, 0)]);
        assert_eq!(grid.neighbor_count(0, 0), 8);
    }
}
