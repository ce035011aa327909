//! Dense row-major grid storage.

use std::ops::{Index, IndexMut};

/// A `width x height` matrix stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Boolean raster where `true` marks a cell inside the region.
pub type OccupancyGrid = Grid<bool>;

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Returns the number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if the grid has the given dimensions.
    #[inline]
    pub fn has_size(&self, width: usize, height: usize) -> bool {
        self.width == width && self.height == height
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    ///
    /// Signed coordinates make neighborhood scans at the border convenient.
    #[inline]
    pub fn get(&self, x: isize, y: isize) -> Option<&T> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    /// Returns all cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Iterates over `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, value)| (i % width, i / width, value))
    }

    /// Combines two grids of equal size cell by cell.
    ///
    /// Returns `None` when the sizes differ.
    pub fn zip_with<U, V>(&self, other: &Grid<U>, f: impl Fn(&T, &U) -> V) -> Option<Grid<V>> {
        if !other.has_size(self.width, self.height) {
            return None;
        }
        Some(Grid {
            width: self.width,
            height: self.height,
            cells: self
                .cells
                .iter()
                .zip(other.cells.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        })
    }
}

impl OccupancyGrid {
    /// Counts the occupied cells.
    pub fn count_occupied(&self) -> usize {
        self.cells.iter().filter(|&&inside| inside).count()
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &T {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) outside grid");
        &self.cells[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) outside grid");
        &mut self.cells[y * self.width + x]
    }
}
