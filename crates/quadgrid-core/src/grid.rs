//! A dense, fixed-size 2D container of optional values.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use thiserror::Error;

use crate::geom::{Position, Rectangle};

/// West, east, north, south.
const CARDINAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Cell a float position falls into: fractional coordinates floor toward
/// negative infinity.
#[inline]
fn cell_at(p: &impl Position) -> (i32, i32) {
    (p.x().floor() as i32, p.y().floor() as i32)
}

// ---------------------------------------------------------------------------
// GridError
// ---------------------------------------------------------------------------

/// Error building a [`Grid`] from nested rows.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("rows are empty; a grid needs at least one row")]
    EmptyRows,
    #[error("row {row} is empty; every row needs at least one cell")]
    EmptyRow { row: usize },
    #[error("row {row} has {len} cells, expected {expected}")]
    UnevenRows {
        row: usize,
        len: usize,
        expected: usize,
    },
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A dense `width x height` grid where every cell holds an optional value.
///
/// Cells are addressed by integer coordinates with `(0, 0)` in the top-left
/// corner. Reads outside the bounds return `None` and writes outside the
/// bounds are ignored, so callers can probe freely without guarding.
/// Storage is column-major: [`iter_xy`](Grid::iter_xy) walks it linearly.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid<T> {
    cells: Vec<Option<T>>,
    width: i32,
    height: i32,
}

impl<T> Grid<T> {
    /// Create a grid with every cell empty. Negative dimensions clamp to
    /// zero.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut cells = Vec::new();
        cells.resize_with((width as usize) * (height as usize), || None);
        Self {
            cells,
            width,
            height,
        }
    }

    /// Create a grid whose cells are produced by `f(x, y)`.
    pub fn from_fn(width: i32, height: i32, mut f: impl FnMut(i32, i32) -> Option<T>) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut cells = Vec::with_capacity((width as usize) * (height as usize));
        for x in 0..width {
            for y in 0..height {
                cells.push(f(x, y));
            }
        }
        Self {
            cells,
            width,
            height,
        }
    }

    /// Build a grid from nested rows, `rows[y][x]`, so a literal reads like
    /// the map it describes.
    pub fn from_rows(rows: Vec<Vec<Option<T>>>) -> Result<Self, GridError> {
        if rows.is_empty() {
            return Err(GridError::EmptyRows);
        }
        let expected = rows[0].len();
        for (row, cells) in rows.iter().enumerate() {
            if cells.is_empty() {
                return Err(GridError::EmptyRow { row });
            }
            if cells.len() != expected {
                return Err(GridError::UnevenRows {
                    row,
                    len: cells.len(),
                    expected,
                });
            }
        }
        let mut grid = Grid::new(expected as i32, rows.len() as i32);
        for (y, cells) in rows.into_iter().enumerate() {
            for (x, value) in cells.into_iter().enumerate() {
                if let Some(i) = grid.index(x as i32, y as i32) {
                    grid.cells[i] = value;
                }
            }
        }
        Ok(grid)
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The grid's bounding rectangle, anchored at the origin.
    #[inline]
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    /// Whether integer coordinates fall inside the grid.
    #[inline]
    pub fn inside(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Whether a float position falls inside the grid.
    #[inline]
    pub fn inside_at(&self, p: &impl Position) -> bool {
        let (x, y) = cell_at(p);
        self.inside(x, y)
    }

    /// Column-major storage index, or `None` out of bounds.
    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.inside(x, y) {
            Some((x as usize) * (self.height as usize) + (y as usize))
        } else {
            None
        }
    }

    /// Value at `(x, y)`, or `None` for empty or out-of-bounds cells.
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        let i = self.index(x, y)?;
        self.cells[i].as_ref()
    }

    /// Mutable value at `(x, y)`.
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        let i = self.index(x, y)?;
        self.cells[i].as_mut()
    }

    /// Value at a float position, flooring into a cell.
    pub fn get_at(&self, p: &impl Position) -> Option<&T> {
        let (x, y) = cell_at(p);
        self.get(x, y)
    }

    /// Store `value` at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Some(value);
        }
    }

    /// Store `value` at a float position, flooring into a cell.
    pub fn set_at(&mut self, p: &impl Position, value: T) {
        let (x, y) = cell_at(p);
        self.set(x, y, value);
    }

    /// Take the value at `(x, y)` out of the grid.
    pub fn remove(&mut self, x: i32, y: i32) -> Option<T> {
        let i = self.index(x, y)?;
        self.cells[i].take()
    }

    /// Empty every cell, keeping the dimensions.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Clamped integer extents of a float region, or `None` when the
    /// intersection with the grid is empty.
    fn region_extents(&self, x: f32, y: f32, w: f32, h: f32) -> Option<(i32, i32, i32, i32)> {
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        let x0 = (x.floor() as i32).max(0);
        let y0 = (y.floor() as i32).max(0);
        let x1 = ((x + w).floor() as i32).min(self.width);
        let y1 = ((y + h).floor() as i32).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }

    /// Present values in the intersection of a float region and the grid,
    /// in column-major order. A region with non-positive extents yields
    /// nothing.
    pub fn get_region(&self, x: f32, y: f32, w: f32, h: f32) -> Vec<&T> {
        let Some((x0, y0, x1, y1)) = self.region_extents(x, y, w, h) else {
            return Vec::new();
        };
        let mut values = Vec::new();
        for cx in x0..x1 {
            for cy in y0..y1 {
                if let Some(v) = self.get(cx, cy) {
                    values.push(v);
                }
            }
        }
        values
    }

    /// Present values inside a rectangle.
    pub fn get_rect(&self, r: &Rectangle) -> Vec<&T> {
        self.get_region(r.x, r.y, r.w, r.h)
    }

    /// Store clones of `value` across the intersection of a float region and
    /// the grid. A region with non-positive extents is ignored.
    pub fn set_region(&mut self, x: f32, y: f32, w: f32, h: f32, value: T)
    where
        T: Clone,
    {
        let Some((x0, y0, x1, y1)) = self.region_extents(x, y, w, h) else {
            return;
        };
        for cx in x0..x1 {
            for cy in y0..y1 {
                if let Some(i) = self.index(cx, cy) {
                    self.cells[i] = Some(value.clone());
                }
            }
        }
    }

    /// Store clones of `value` inside a rectangle.
    pub fn set_rect(&mut self, r: &Rectangle, value: T)
    where
        T: Clone,
    {
        self.set_region(r.x, r.y, r.w, r.h, value);
    }

    /// Present values in the four cardinal neighbour cells, in west, east,
    /// north, south order.
    pub fn neighbors_cardinal(&self, x: i32, y: i32) -> Vec<&T> {
        CARDINAL
            .iter()
            .filter_map(|&(dx, dy)| self.get(x + dx, y + dy))
            .collect()
    }

    /// Cardinal neighbours paired with their cell coordinates.
    pub fn neighbors_cardinal_with_positions(&self, x: i32, y: i32) -> Vec<(&T, (i32, i32))> {
        CARDINAL
            .iter()
            .filter_map(|&(dx, dy)| {
                let cell = (x + dx, y + dy);
                self.get(cell.0, cell.1).map(|v| (v, cell))
            })
            .collect()
    }

    /// Present values in the eight surrounding cells. Columns advance in the
    /// outer loop, so the order is west column, centre column (skipping the
    /// cell itself), east column.
    pub fn neighbors_square(&self, x: i32, y: i32) -> Vec<&T> {
        let mut values = Vec::new();
        for nx in (x - 1)..=(x + 1) {
            for ny in (y - 1)..=(y + 1) {
                if (nx, ny) == (x, y) {
                    continue;
                }
                if let Some(v) = self.get(nx, ny) {
                    values.push(v);
                }
            }
        }
        values
    }

    /// Square neighbours paired with their cell coordinates.
    pub fn neighbors_square_with_positions(&self, x: i32, y: i32) -> Vec<(&T, (i32, i32))> {
        let mut values = Vec::new();
        for nx in (x - 1)..=(x + 1) {
            for ny in (y - 1)..=(y + 1) {
                if (nx, ny) == (x, y) {
                    continue;
                }
                if let Some(v) = self.get(nx, ny) {
                    values.push((v, (nx, ny)));
                }
            }
        }
        values
    }

    /// Column-major traversal: `x` advances in the outer loop. Yields every
    /// cell, present or not.
    pub fn iter_xy(&self) -> IterXY<'_, T> {
        IterXY {
            grid: self,
            x: 0,
            y: 0,
        }
    }

    /// Row-major traversal: `y` advances in the outer loop.
    pub fn iter_yx(&self) -> IterYX<'_, T> {
        IterYX {
            grid: self,
            x: 0,
            y: 0,
        }
    }
}

impl<T: Eq + Hash> Grid<T> {
    /// Breadth-first region growth from `(x, y)` across cardinal neighbours.
    ///
    /// Collects every value reachable from the start through cells whose
    /// value satisfies `predicate`, the start included. An absent start cell
    /// or one failing the predicate yields an empty set.
    pub fn flood_fill(&self, x: i32, y: i32, predicate: impl Fn(&T) -> bool) -> HashSet<&T> {
        let mut values = HashSet::new();
        let Some(start) = self.get(x, y) else {
            return values;
        };
        if !predicate(start) {
            return values;
        }
        let mut visited: HashSet<(i32, i32)> = HashSet::new();
        let mut frontier: VecDeque<(i32, i32)> = VecDeque::new();
        values.insert(start);
        visited.insert((x, y));
        frontier.push_back((x, y));
        while let Some((cx, cy)) = frontier.pop_front() {
            for (value, cell) in self.neighbors_cardinal_with_positions(cx, cy) {
                if visited.contains(&cell) || !predicate(value) {
                    continue;
                }
                values.insert(value);
                visited.insert(cell);
                frontier.push_back(cell);
            }
        }
        values
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// Column-major iterator over the cells of a [`Grid`].
#[derive(Clone, Debug)]
pub struct IterXY<'a, T> {
    grid: &'a Grid<T>,
    x: i32,
    y: i32,
}

impl<'a, T> Iterator for IterXY<'a, T> {
    type Item = ((i32, i32), Option<&'a T>);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.grid.inside(self.x, self.y) {
            return None;
        }
        let item = ((self.x, self.y), self.grid.get(self.x, self.y));
        self.y += 1;
        if self.y >= self.grid.height {
            self.y = 0;
            self.x += 1;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = (self.grid.width as usize) * (self.grid.height as usize);
        let consumed = (self.x as usize) * (self.grid.height as usize) + (self.y as usize);
        let remaining = total.saturating_sub(consumed);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for IterXY<'_, T> {}

/// Row-major iterator over the cells of a [`Grid`].
#[derive(Clone, Debug)]
pub struct IterYX<'a, T> {
    grid: &'a Grid<T>,
    x: i32,
    y: i32,
}

impl<'a, T> Iterator for IterYX<'a, T> {
    type Item = ((i32, i32), Option<&'a T>);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.grid.inside(self.x, self.y) {
            return None;
        }
        let item = ((self.x, self.y), self.grid.get(self.x, self.y));
        self.x += 1;
        if self.x >= self.grid.width {
            self.x = 0;
            self.y += 1;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = (self.grid.width as usize) * (self.grid.height as usize);
        let consumed = (self.y as usize) * (self.grid.width as usize) + (self.x as usize);
        let remaining = total.saturating_sub(consumed);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for IterYX<'_, T> {}
