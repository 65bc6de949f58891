//! Broad-phase spatial indexing over [`quadgrid_core`] rectangles.
//!
//! The only public type is [`QuadTree`]: insert objects under rectangles,
//! then ask for the candidate set at a point or against a rectangle. The
//! tree splits overcrowded leaves on its own and recycles retired nodes
//! through an internal pool, so resetting it every frame is cheap.

mod node;
mod quadtree;

pub use quadtree::QuadTree;
