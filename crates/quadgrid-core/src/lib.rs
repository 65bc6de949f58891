//! **quadgrid-core** — Containers and geometry for in-memory spatial queries.
//!
//! This crate provides the foundational types used across the *quadgrid*
//! ecosystem: the [`Rectangle`] primitive with its collision rules, a dense
//! [`Grid`] of optional values, a priority [`Heap`] tolerant of in-place key
//! mutation, merged 1D intervals, and a concurrent object [`Pool`].

pub mod geom;
pub mod grid;
pub mod heap;
pub mod interval;
pub mod pool;

pub use geom::{Position, Rectangle};
pub use grid::{Grid, GridError};
pub use heap::{Heap, HeapOrder};
pub use interval::{IntervalSet, Span};
pub use pool::Pool;
