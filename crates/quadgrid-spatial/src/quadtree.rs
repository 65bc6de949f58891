//! An auto-splitting quadtree over rectangles.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use quadgrid_core::Rectangle;

use crate::node::{InsertCtx, NodePool, QuadNode};

/// A region index for broad-phase spatial queries.
///
/// Objects are registered once and spread by their rectangle across every
/// leaf it collides with; a leaf that exceeds its object budget splits into
/// four quadrants, down to a minimum side length. Queries walk only the
/// touching leaves and return the deduplicated candidate set, which may be
/// a superset of the exact colliders. Retired nodes are recycled through a
/// per-tree pool, so a tree that is [`reset`](QuadTree::reset) every tick
/// stops allocating nodes once it has seen its worst frame.
#[derive(Debug)]
pub struct QuadTree<T> {
    max_objects_per_node: usize,
    min_node_side_length: f32,
    objects: HashMap<u32, T>,
    indices: HashMap<T, u32>,
    rectangles: HashMap<u32, Rectangle>,
    counter: u32,
    root: QuadNode,
    pool: NodePool,
}

impl<T> QuadTree<T>
where
    T: Eq + Hash + Clone,
{
    /// Create a tree over `bound`.
    ///
    /// A leaf splits once it holds more than `max_objects_per_node` objects,
    /// unless half its width would drop below `min_node_side_length`.
    ///
    /// # Panics
    ///
    /// Panics if `bound` has no area, `max_objects_per_node` is zero, or
    /// `min_node_side_length` is not positive.
    pub fn new(bound: Rectangle, max_objects_per_node: usize, min_node_side_length: f32) -> Self {
        assert!(!bound.is_empty(), "quadtree bound must have positive area");
        assert!(
            max_objects_per_node >= 1,
            "max_objects_per_node must be at least 1"
        );
        assert!(
            min_node_side_length > 0.0,
            "min_node_side_length must be positive"
        );
        Self {
            max_objects_per_node,
            min_node_side_length,
            objects: HashMap::new(),
            indices: HashMap::new(),
            rectangles: HashMap::new(),
            counter: 0,
            root: QuadNode::new(bound),
            pool: NodePool::default(),
        }
    }

    /// Create a tree spanning `width x height` at the origin.
    pub fn sized(
        width: f32,
        height: f32,
        max_objects_per_node: usize,
        min_node_side_length: f32,
    ) -> Self {
        Self::new(
            Rectangle::new(0.0, 0.0, width, height),
            max_objects_per_node,
            min_node_side_length,
        )
    }

    /// The rectangle the whole tree covers.
    #[inline]
    pub fn bound(&self) -> Rectangle {
        self.root.bound()
    }

    /// Number of distinct objects registered.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no objects are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Register `object` under `rect` and spread it across every colliding
    /// leaf.
    ///
    /// An object seen before keeps its original index and rectangle, so
    /// re-inserting widens its leaf coverage but never re-registers it. A
    /// rectangle that has no area or misses the tree bound entirely is
    /// ignored.
    pub fn insert(&mut self, object: T, rect: Rectangle) {
        if !rect.collides(&self.root.bound()) {
            return;
        }
        let index = self.index_for(object, rect);
        let mut ctx = InsertCtx {
            rects: &self.rectangles,
            pool: &mut self.pool,
            max_objects: self.max_objects_per_node,
            min_side: self.min_node_side_length,
        };
        self.root.insert(index, &rect, &mut ctx);
    }

    /// Existing index for `object`, or a freshly assigned one.
    fn index_for(&mut self, object: T, rect: Rectangle) -> u32 {
        if let Some(&index) = self.indices.get(&object) {
            return index;
        }
        let index = self.counter;
        self.counter += 1;
        self.indices.insert(object.clone(), index);
        self.objects.insert(index, object);
        // The rectangle is stored once; later inserts keep the original.
        self.rectangles.insert(index, rect);
        index
    }

    /// Candidate objects at a point: everything registered in the leaf the
    /// point falls into.
    pub fn query_point(&self, px: f32, py: f32) -> HashSet<T> {
        let mut found = HashSet::new();
        self.root.query_point(px, py, &mut found);
        self.resolve(&found)
    }

    /// Candidate objects for a rectangle: everything registered in any leaf
    /// the rectangle collides with. A superset of the exact colliders.
    pub fn query_rect(&self, rect: &Rectangle) -> HashSet<T> {
        let mut found = HashSet::new();
        self.root.query_rect(rect, &mut found);
        self.resolve(&found)
    }

    fn resolve(&self, found: &HashSet<u32>) -> HashSet<T> {
        let mut objects = HashSet::with_capacity(found.len());
        for index in found {
            if let Some(object) = self.objects.get(index) {
                objects.insert(object.clone());
            }
        }
        objects
    }

    /// The rectangle `object` was first registered under.
    pub fn get_rectangle(&self, object: &T) -> Option<Rectangle> {
        let index = self.indices.get(object)?;
        self.rectangles.get(index).copied()
    }

    /// Registration rectangles of every object, in no particular order.
    pub fn rectangles(&self) -> Vec<Rectangle> {
        self.rectangles.values().copied().collect()
    }

    /// Bounds of every node in the tree, parents before children. The
    /// first entry is the tree bound itself.
    pub fn node_bounds(&self) -> Vec<Rectangle> {
        let mut bounds = Vec::new();
        self.root.collect_bounds(&mut bounds);
        bounds
    }

    /// Drop every object and collapse the tree back to a single leaf,
    /// keeping the bound. Retired nodes go to the pool for reuse by future
    /// splits.
    pub fn reset(&mut self) {
        let bound = self.root.bound();
        let fresh = self.pool.acquire(bound);
        let retired = std::mem::replace(&mut self.root, fresh);
        self.pool.release(retired);
        self.objects.clear();
        self.indices.clear();
        self.rectangles.clear();
        self.counter = 0;
        log::trace!(
            "quadtree reset: {} nodes idle in the pool",
            self.pool.len()
        );
    }

    /// Number of idle nodes available for reuse.
    #[cfg(test)]
    fn pooled_nodes(&self) -> usize {
        self.pool.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    fn set_of<const N: usize>(values: [u32; N]) -> HashSet<u32> {
        HashSet::from(values)
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn sized_tree_spans_origin() {
        let tree: QuadTree<u32> = QuadTree::sized(100.0, 50.0, 4, 5.0);
        assert_eq!(tree.bound(), Rectangle::new(0.0, 0.0, 100.0, 50.0));
        assert!(tree.is_empty());
        assert_eq!(tree.node_bounds().len(), 1);
    }

    #[test]
    #[should_panic(expected = "positive area")]
    fn empty_bound_panics() {
        let _: QuadTree<u32> = QuadTree::new(Rectangle::new(0.0, 0.0, 0.0, 10.0), 1, 1.0);
    }

    #[test]
    #[should_panic(expected = "at least 1")]
    fn zero_object_budget_panics() {
        let _: QuadTree<u32> = QuadTree::sized(10.0, 10.0, 0, 1.0);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn zero_min_side_panics() {
        let _: QuadTree<u32> = QuadTree::sized(10.0, 10.0, 1, 0.0);
    }

    // -----------------------------------------------------------------------
    // Insertion and registry
    // -----------------------------------------------------------------------

    #[test]
    fn insert_and_query_point() {
        let mut tree = QuadTree::sized(100.0, 100.0, 4, 5.0);
        tree.insert(1u32, Rectangle::new(10.0, 10.0, 5.0, 5.0));
        tree.insert(2u32, Rectangle::new(60.0, 60.0, 5.0, 5.0));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.query_point(12.0, 12.0), set_of([1, 2]));

        // One overflow later the objects live in separate quadrants. Object
        // 5 shares the north-west leaf with 1, so it rides along as a
        // candidate there even though its rectangle misses the point.
        tree.insert(3u32, Rectangle::new(70.0, 10.0, 5.0, 5.0));
        tree.insert(4u32, Rectangle::new(10.0, 70.0, 5.0, 5.0));
        tree.insert(5u32, Rectangle::new(40.0, 40.0, 5.0, 5.0));
        assert_eq!(tree.query_point(12.0, 12.0), set_of([1, 5]));
        assert_eq!(tree.query_point(62.0, 62.0), set_of([2]));
        assert_eq!(tree.query_point(72.0, 12.0), set_of([3]));
    }

    #[test]
    fn spanning_object_gets_one_index_and_queries_dedup() {
        let mut tree = QuadTree::sized(80.0, 80.0, 1, 5.0);
        // Force a split first.
        tree.insert(1u32, Rectangle::new(5.0, 5.0, 2.0, 2.0));
        tree.insert(2u32, Rectangle::new(50.0, 50.0, 2.0, 2.0));
        assert!(tree.node_bounds().len() > 1);

        // This rectangle touches every quadrant.
        tree.insert(3u32, Rectangle::new(30.0, 30.0, 20.0, 20.0));
        assert_eq!(tree.len(), 3);
        let found = tree.query_rect(&Rectangle::new(0.0, 0.0, 80.0, 80.0));
        assert_eq!(found, set_of([1, 2, 3]));
    }

    #[test]
    fn reinserting_keeps_the_original_rectangle() {
        let mut tree = QuadTree::sized(100.0, 100.0, 4, 5.0);
        let first = Rectangle::new(10.0, 10.0, 5.0, 5.0);
        tree.insert(7u32, first);
        tree.insert(7u32, Rectangle::new(60.0, 60.0, 5.0, 5.0));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get_rectangle(&7), Some(first));
        assert_eq!(tree.rectangles(), vec![first]);
        // The second insert still widened the leaf coverage.
        assert_eq!(tree.query_point(62.0, 62.0), set_of([7]));
    }

    #[test]
    fn inserts_outside_the_bound_are_ignored() {
        let mut tree = QuadTree::sized(50.0, 50.0, 4, 5.0);
        tree.insert(1u32, Rectangle::new(100.0, 100.0, 5.0, 5.0));
        // Zero-area rectangles never collide, so they never register.
        tree.insert(2u32, Rectangle::new(10.0, 10.0, 0.0, 0.0));
        assert!(tree.is_empty());
        assert_eq!(tree.get_rectangle(&1), None);
    }

    // -----------------------------------------------------------------------
    // Splitting
    // -----------------------------------------------------------------------

    #[test]
    fn overflow_splits_into_quadrants() {
        let mut tree = QuadTree::sized(80.0, 80.0, 2, 5.0);
        tree.insert(1u32, Rectangle::new(5.0, 5.0, 2.0, 2.0));
        tree.insert(2u32, Rectangle::new(45.0, 5.0, 2.0, 2.0));
        assert_eq!(tree.node_bounds().len(), 1);

        tree.insert(3u32, Rectangle::new(5.0, 45.0, 2.0, 2.0));
        let bounds = tree.node_bounds();
        assert_eq!(bounds.len(), 5);
        assert_eq!(bounds[0], tree.bound());
        for quadrant in [
            Rectangle::new(0.0, 0.0, 40.0, 40.0),
            Rectangle::new(40.0, 0.0, 40.0, 40.0),
            Rectangle::new(0.0, 40.0, 40.0, 40.0),
            Rectangle::new(40.0, 40.0, 40.0, 40.0),
        ] {
            assert!(bounds.contains(&quadrant), "missing {quadrant}");
        }
    }

    #[test]
    fn query_rect_enveloping_a_subtree_returns_everything_in_it() {
        let mut tree = QuadTree::sized(80.0, 80.0, 1, 5.0);
        tree.insert(1u32, Rectangle::new(5.0, 5.0, 2.0, 2.0));
        tree.insert(2u32, Rectangle::new(25.0, 25.0, 2.0, 2.0));
        tree.insert(3u32, Rectangle::new(65.0, 65.0, 2.0, 2.0));
        // Strictly contains the north-west quadrant and misses nothing in it.
        let found = tree.query_rect(&Rectangle::new(-1.0, -1.0, 45.0, 45.0));
        assert!(found.contains(&1));
        assert!(found.contains(&2));
    }

    // -----------------------------------------------------------------------
    // Reset and pooling
    // -----------------------------------------------------------------------

    #[test]
    fn reset_clears_objects_and_pools_nodes() {
        let mut tree = QuadTree::sized(80.0, 80.0, 1, 5.0);
        tree.insert(1u32, Rectangle::new(5.0, 5.0, 2.0, 2.0));
        tree.insert(2u32, Rectangle::new(45.0, 45.0, 2.0, 2.0));
        let nodes_before = tree.node_bounds().len();
        assert!(nodes_before > 1);

        tree.reset();
        assert!(tree.is_empty());
        assert_eq!(tree.node_bounds().len(), 1);
        assert_eq!(tree.bound(), Rectangle::new(0.0, 0.0, 80.0, 80.0));
        assert!(tree.query_point(6.0, 6.0).is_empty());
        assert_eq!(tree.pooled_nodes(), nodes_before);
    }

    #[test]
    fn splits_after_reset_drain_the_pool() {
        let mut tree = QuadTree::sized(80.0, 80.0, 1, 5.0);
        tree.insert(1u32, Rectangle::new(5.0, 5.0, 2.0, 2.0));
        tree.insert(2u32, Rectangle::new(45.0, 45.0, 2.0, 2.0));
        tree.reset();
        let idle = tree.pooled_nodes();
        assert!(idle >= 4);

        tree.insert(1u32, Rectangle::new(5.0, 5.0, 2.0, 2.0));
        tree.insert(2u32, Rectangle::new(45.0, 45.0, 2.0, 2.0));
        assert!(tree.pooled_nodes() < idle);
        assert_eq!(tree.query_point(6.0, 6.0), set_of([1]));
    }

    #[test]
    fn indices_restart_after_reset() {
        let mut tree = QuadTree::sized(50.0, 50.0, 4, 5.0);
        tree.insert(10u32, Rectangle::new(5.0, 5.0, 2.0, 2.0));
        tree.reset();
        tree.insert(20u32, Rectangle::new(5.0, 5.0, 2.0, 2.0));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.query_point(6.0, 6.0), set_of([20]));
        assert_eq!(tree.get_rectangle(&10), None);
    }

    // -----------------------------------------------------------------------
    // Query edges
    // -----------------------------------------------------------------------

    #[test]
    fn point_queries_are_half_open() {
        let mut tree = QuadTree::sized(10.0, 10.0, 4, 1.0);
        tree.insert(1u32, Rectangle::new(2.0, 2.0, 3.0, 3.0));
        assert_eq!(tree.query_point(0.0, 0.0), set_of([1]));
        // The high edges belong to no leaf.
        assert!(tree.query_point(10.0, 5.0).is_empty());
        assert!(tree.query_point(5.0, 10.0).is_empty());
        assert!(tree.query_point(-0.1, 5.0).is_empty());
    }

    #[test]
    fn zero_area_query_rect_finds_nothing() {
        let mut tree = QuadTree::sized(10.0, 10.0, 4, 1.0);
        tree.insert(1u32, Rectangle::new(2.0, 2.0, 3.0, 3.0));
        assert!(tree.query_rect(&Rectangle::new(2.0, 2.0, 0.0, 0.0)).is_empty());
    }

    // -----------------------------------------------------------------------
    // Randomized cross-check
    // -----------------------------------------------------------------------

    #[test]
    fn query_rect_never_misses_a_collider() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut tree = QuadTree::sized(100.0, 100.0, 4, 2.0);
        let mut rects = Vec::new();
        for id in 0..100u32 {
            let rect = Rectangle::new(
                rng.random_range(0.0..95.0),
                rng.random_range(0.0..95.0),
                rng.random_range(0.5..5.0),
                rng.random_range(0.5..5.0),
            );
            tree.insert(id, rect);
            rects.push(rect);
        }

        for _ in 0..20 {
            let probe = Rectangle::new(
                rng.random_range(0.0..90.0),
                rng.random_range(0.0..90.0),
                rng.random_range(1.0..10.0),
                rng.random_range(1.0..10.0),
            );
            let found = tree.query_rect(&probe);
            for (id, rect) in rects.iter().enumerate() {
                if rect.collides(&probe) {
                    assert!(
                        found.contains(&(id as u32)),
                        "{rect} collides {probe} but was not returned",
                    );
                }
            }
            // Candidates are real registered objects.
            assert!(found.iter().all(|id| (*id as usize) < rects.len()));
        }
    }
}
