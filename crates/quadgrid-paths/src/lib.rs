//! Route search over [`quadgrid_core`] grids.
//!
//! Any grid whose cells expose a [`SolidTile`] flag can be searched:
//! build a [`PathFinder`] against it (or call the one-shot [`find_path`])
//! and get back the route as a list of borrowed grid values, start first.
//! Movement and cost are configured through [`PathOptions`].

mod distance;
mod pathfinder;
mod traits;

pub use distance::DistanceMetric;
pub use pathfinder::{find_path, PathFinder, PathOptions, PathTile};
pub use traits::SolidTile;
