//! Row-major 2D grid shared by every generation pass.

use std::ops::{Index, IndexMut};

use crate::error::GridError;

/// The eight neighbour offsets, column-major (`dx` outer, `dy` inner).
///
/// River tracing breaks elevation ties by taking the first neighbour in this
/// order, so the order is part of the output.
pub const NEIGHBORS_8: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A `width * height` buffer addressed by `(x, y)`; linear index `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Wrap an existing buffer.
    ///
    /// # Errors
    ///
    /// [`GridError::ZeroDimension`] if either dimension is zero,
    /// [`GridError::LengthMismatch`] if `cells.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Result<Self, GridError> {
        check_dimensions(width, height)?;
        let expected = width * height;
        if cells.len() != expected {
            return Err(GridError::LengthMismatch {
                width,
                height,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> Result<Self, GridError> {
        check_dimensions(width, height)?;
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: zero-sized grids cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Linear index of `(x, y)`.
    ///
    /// # Panics
    ///
    /// If the coordinate lies off the grid.
    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "({x}, {y}) is outside a {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Coordinate of a linear index.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Returns `true` if the signed coordinate lies on the grid.
    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    /// `(x + dx, y + dy)` if it lies on the grid.
    #[inline]
    pub fn offset(&self, x: usize, y: usize, dx: i64, dy: i64) -> Option<(usize, usize)> {
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        self.in_bounds(nx, ny).then_some((nx as usize, ny as usize))
    }

    /// In-bounds 8-neighbours of `(x, y)` together with their offsets.
    pub fn neighbors(
        &self,
        x: usize,
        y: usize,
    ) -> impl Iterator<Item = ((usize, usize), (i64, i64))> + '_ {
        NEIGHBORS_8
            .iter()
            .filter_map(move |&(dx, dy)| self.offset(x, y, dx, dy).map(|pos| (pos, (dx, dy))))
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.width && y < self.height {
            self.cells.get_mut(y * self.width + x)
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    /// Cells paired with their coordinates, in row-major order.
    pub fn enumerate(&self) -> impl Iterator<Item = ((usize, usize), &T)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i % width, i / width), cell))
    }

    /// A grid of the same shape with every cell transformed by `f(x, y, cell)`.
    pub fn map<U>(&self, mut f: impl FnMut(usize, usize, &T) -> U) -> Grid<U> {
        let width = self.width;
        Grid {
            width,
            height: self.height,
            cells: self
                .cells
                .iter()
                .enumerate()
                .map(|(i, cell)| f(i % width, i / width, cell))
                .collect(),
        }
    }

    /// Returns `true` if both grids have the same dimensions.
    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl<T: Clone> Grid<T> {
    /// A grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, GridError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![value; width * height],
        })
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.cells[self.index_of(x, y)]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        let i = self.index_of(x, y);
        &mut self.cells[i]
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::ZeroDimension { width, height });
    }
    Ok(())
}
