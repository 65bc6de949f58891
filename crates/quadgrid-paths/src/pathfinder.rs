//! Best-first search over a grid of solid/passable tiles.
//!
//! A [`PathFinder`] borrows a [`Grid`] and shadows it with a parallel grid
//! of per-cell search state. One search runs per [`find_path`] call; state
//! is reset on entry, so a finder can be reused for many searches against
//! the same grid without reallocating.
//!
//! [`find_path`]: PathFinder::find_path

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::rc::Rc;

use quadgrid_core::{Grid, Heap};

use crate::distance::DistanceMetric;
use crate::traits::SolidTile;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Movement and cost knobs for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathOptions {
    /// Allow the eight moves of the full ring around a cell instead of the
    /// four cardinal ones.
    pub diagonal: bool,
    /// Metric used both as the per-step cost and as the goal heuristic.
    pub metric: DistanceMetric,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            diagonal: true,
            metric: DistanceMetric::Euclidean,
        }
    }
}

impl PathOptions {
    /// Same options with diagonal movement switched.
    #[must_use]
    pub const fn with_diagonal(mut self, diagonal: bool) -> Self {
        self.diagonal = diagonal;
        self
    }

    /// Same options with another distance metric.
    #[must_use]
    pub const fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }
}

// ---------------------------------------------------------------------------
// Per-cell search state
// ---------------------------------------------------------------------------

/// Search state for one grid cell.
///
/// Compares equal to another tile on the same cell, and orders by the live
/// [`heuristic`](PathTile::heuristic), so the open set re-ranks a tile that
/// was improved in place.
#[derive(Debug, Clone)]
pub struct PathTile {
    x: i32,
    y: i32,
    steps: Option<f32>,
    target_distance: Option<f32>,
}

impl PathTile {
    fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            steps: None,
            target_distance: None,
        }
    }

    /// The cell this state belongs to.
    #[inline]
    pub fn cell(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Accumulated cost from the search start, `None` while unvisited.
    #[inline]
    pub fn steps(&self) -> Option<f32> {
        self.steps
    }

    /// Estimated remaining distance to the goal, `None` while unset.
    #[inline]
    pub fn target_distance(&self) -> Option<f32> {
        self.target_distance
    }

    /// Ordering key: `steps + target_distance`, infinite while either half
    /// is unset so unvisited tiles never outrank visited ones.
    pub fn heuristic(&self) -> f32 {
        match (self.steps, self.target_distance) {
            (Some(steps), Some(target)) => steps + target,
            _ => f32::INFINITY,
        }
    }

    fn set_heuristic(&mut self, steps: f32, target_distance: f32) {
        self.steps = Some(steps);
        self.target_distance = Some(target_distance);
    }

    fn reset(&mut self) {
        self.steps = None;
        self.target_distance = None;
    }

    fn steps_or_infinity(&self) -> f32 {
        self.steps.unwrap_or(f32::INFINITY)
    }
}

impl PartialEq for PathTile {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl PartialOrd for PathTile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.heuristic().partial_cmp(&other.heuristic())
    }
}

type TileHandle = Rc<RefCell<PathTile>>;

// ---------------------------------------------------------------------------
// PathFinder
// ---------------------------------------------------------------------------

/// Reusable route search bound to one grid.
pub struct PathFinder<'g, T> {
    grid: &'g Grid<T>,
    tiles: Grid<TileHandle>,
    options: PathOptions,
}

impl<'g, T: SolidTile> PathFinder<'g, T> {
    /// Build a finder over `grid` with default options (diagonal movement,
    /// Euclidean distance).
    pub fn new(grid: &'g Grid<T>) -> Self {
        Self::with_options(grid, PathOptions::default())
    }

    /// Build a finder over `grid`.
    pub fn with_options(grid: &'g Grid<T>, options: PathOptions) -> Self {
        let tiles = Grid::from_fn(grid.width(), grid.height(), |x, y| {
            Some(Rc::new(RefCell::new(PathTile::new(x, y))))
        });
        Self {
            grid,
            tiles,
            options,
        }
    }

    /// The options this finder searches with.
    #[inline]
    pub fn options(&self) -> PathOptions {
        self.options
    }

    /// Cost-so-far the most recent search left at `(x, y)`.
    ///
    /// `None` for out-of-bounds cells and for cells the search never
    /// reached. The goal cell of a successful search also reads `None`,
    /// since reconstruction clears it.
    pub fn steps_at(&self, x: i32, y: i32) -> Option<f32> {
        self.tiles.get(x, y)?.borrow().steps()
    }

    /// Route from `start` to `goal` as grid values, start first.
    ///
    /// Empty when either endpoint is out of bounds, absent, or solid, and
    /// when no route exists. `start == goal` yields the single-cell route.
    pub fn find_path(&mut self, start: (i32, i32), goal: (i32, i32)) -> Vec<&'g T> {
        for (_, handle) in self.tiles.iter_xy() {
            if let Some(handle) = handle {
                handle.borrow_mut().reset();
            }
        }

        let grid = self.grid;
        let (Some(start_value), Some(goal_value)) =
            (grid.get(start.0, start.1), grid.get(goal.0, goal.1))
        else {
            return Vec::new();
        };
        if start_value.solid() || goal_value.solid() {
            return Vec::new();
        }
        if start == goal {
            return vec![start_value];
        }

        let metric = self.options.metric;
        let Some(first) = self.tiles.get(start.0, start.1) else {
            return Vec::new();
        };
        first.borrow_mut().set_heuristic(
            0.0,
            metric.between(
                start.0 as f32,
                start.1 as f32,
                goal.0 as f32,
                goal.1 as f32,
            ),
        );

        let mut open: Heap<TileHandle> = Heap::new();
        let mut closed: HashSet<(i32, i32)> = HashSet::new();
        open.push(Rc::clone(first));

        while let Some(current) = open.pop() {
            let (cx, cy) = current.borrow().cell();
            closed.insert((cx, cy));

            if (cx, cy) == goal {
                log::trace!(
                    "path {start:?} -> {goal:?} found after closing {} tiles",
                    closed.len()
                );
                return self.backtrack(start, goal);
            }

            let Some(current_steps) = current.borrow().steps() else {
                continue;
            };

            for (neighbor, (nx, ny)) in self.neighbors_of(cx, cy) {
                let Some(value) = grid.get(nx, ny) else {
                    continue;
                };
                if value.solid() || closed.contains(&(nx, ny)) {
                    continue;
                }

                let steps = current_steps
                    + metric.between(cx as f32, cy as f32, nx as f32, ny as f32);
                let target =
                    metric.between(nx as f32, ny as f32, goal.0 as f32, goal.1 as f32);
                if open.contains(neighbor) {
                    // Improve in place; the heap re-ranks on its next
                    // mutation.
                    if steps + target < neighbor.borrow().heuristic() {
                        neighbor.borrow_mut().set_heuristic(steps, target);
                    }
                } else {
                    neighbor.borrow_mut().set_heuristic(steps, target);
                    open.push(Rc::clone(neighbor));
                }
            }
        }

        log::debug!("no path {start:?} -> {goal:?}: open set exhausted");
        Vec::new()
    }

    /// Walk the cost gradient from the goal back to the start and return
    /// the route the right way round.
    fn backtrack(&self, start: (i32, i32), goal: (i32, i32)) -> Vec<&'g T> {
        // Clearing the goal makes every visited neighbor strictly smaller.
        if let Some(handle) = self.tiles.get(goal.0, goal.1) {
            handle.borrow_mut().reset();
        }

        let mut cells = Vec::new();
        let mut current = goal;
        loop {
            cells.push(current);
            if current == start {
                break;
            }
            let mut next = current;
            let mut best = self
                .tiles
                .get(current.0, current.1)
                .map_or(f32::INFINITY, |handle| {
                    handle.borrow().steps_or_infinity()
                });
            for (neighbor, cell) in self.neighbors_of(current.0, current.1) {
                let steps = neighbor.borrow().steps_or_infinity();
                if steps < best {
                    best = steps;
                    next = cell;
                }
            }
            if next == current {
                return Vec::new();
            }
            current = next;
        }

        cells.reverse();
        cells
            .into_iter()
            .filter_map(|(x, y)| self.grid.get(x, y))
            .collect()
    }

    fn neighbors_of(&self, x: i32, y: i32) -> Vec<(&TileHandle, (i32, i32))> {
        if self.options.diagonal {
            self.tiles.neighbors_square_with_positions(x, y)
        } else {
            self.tiles.neighbors_cardinal_with_positions(x, y)
        }
    }
}

/// One-shot search: build a transient finder over `grid` and run a single
/// query.
pub fn find_path<T: SolidTile>(
    grid: &Grid<T>,
    start: (i32, i32),
    goal: (i32, i32),
    options: PathOptions,
) -> Vec<&T> {
    PathFinder::with_options(grid, options).find_path(start, goal)
}
