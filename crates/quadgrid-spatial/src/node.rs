//! Quadtree nodes and the free list that recycles them.

use std::collections::{HashMap, HashSet};

use quadgrid_core::Rectangle;

/// Tree-wide state threaded through a subtree insertion.
pub(crate) struct InsertCtx<'a> {
    /// Registry rectangles, keyed by object index.
    pub rects: &'a HashMap<u32, Rectangle>,
    pub pool: &'a mut NodePool,
    pub max_objects: usize,
    pub min_side: f32,
}

// ---------------------------------------------------------------------------
// QuadNode
// ---------------------------------------------------------------------------

/// One node of the tree: a leaf holding object indices, or an interior node
/// with exactly four children covering its quadrants.
#[derive(Debug)]
pub(crate) struct QuadNode {
    bound: Rectangle,
    indices: HashSet<u32>,
    children: Option<Box<[QuadNode; 4]>>,
}

impl QuadNode {
    pub(crate) fn new(bound: Rectangle) -> Self {
        Self {
            bound,
            indices: HashSet::new(),
            children: None,
        }
    }

    #[inline]
    pub(crate) fn bound(&self) -> Rectangle {
        self.bound
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Reset a recycled node to a fresh leaf over `bound`.
    fn reinit(&mut self, bound: Rectangle) {
        self.bound = bound;
        self.indices.clear();
        self.children = None;
    }

    /// Insert `index` into every leaf of this subtree whose bound its
    /// rectangle collides with, splitting overflowing leaves on the way.
    pub(crate) fn insert(&mut self, index: u32, rect: &Rectangle, ctx: &mut InsertCtx<'_>) {
        if !rect.collides(&self.bound) {
            return;
        }
        if let Some(children) = &mut self.children {
            for child in children.iter_mut() {
                child.insert(index, rect, ctx);
            }
            return;
        }
        self.indices.insert(index);
        if self.indices.len() > ctx.max_objects && self.bound.w / 2.0 >= ctx.min_side {
            self.split(ctx);
        }
    }

    /// Replace this leaf with four equal quadrants and push every held
    /// index down into the children it collides with. A child receiving
    /// more than `max_objects` indices splits again immediately.
    fn split(&mut self, ctx: &mut InsertCtx<'_>) {
        let Rectangle { x, y, w, h } = self.bound;
        let (w2, h2) = (w / 2.0, h / 2.0);
        log::trace!(
            "splitting node ({x}, {y}) {w}x{h} holding {} objects",
            self.indices.len()
        );
        let mut children = Box::new([
            ctx.pool.acquire(Rectangle::new(x, y, w2, h2)),
            ctx.pool.acquire(Rectangle::new(x + w2, y, w2, h2)),
            ctx.pool.acquire(Rectangle::new(x, y + h2, w2, h2)),
            ctx.pool.acquire(Rectangle::new(x + w2, y + h2, w2, h2)),
        ]);
        for &index in &self.indices {
            let Some(&rect) = ctx.rects.get(&index) else {
                continue;
            };
            for child in children.iter_mut() {
                child.insert(index, &rect, ctx);
            }
        }
        self.indices.clear();
        self.children = Some(children);
    }

    /// Indices of every leaf the point reaches. With half-open bounds a
    /// point reaches exactly one leaf.
    pub(crate) fn query_point(&self, px: f32, py: f32, out: &mut HashSet<u32>) {
        if !self.bound.contains(px, py) {
            return;
        }
        match &self.children {
            None => out.extend(self.indices.iter().copied()),
            Some(children) => {
                for child in children.iter() {
                    child.query_point(px, py, out);
                }
            }
        }
    }

    /// Indices of every leaf whose bound collides the query rectangle. A
    /// node strictly inside the query contributes its whole subtree without
    /// further bound checks.
    pub(crate) fn query_rect(&self, rect: &Rectangle, out: &mut HashSet<u32>) {
        if !self.bound.collides(rect) {
            return;
        }
        if self.is_leaf() {
            out.extend(self.indices.iter().copied());
        } else if self.bound.inside(rect) {
            self.collect_indices(out);
        } else if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_rect(rect, out);
            }
        }
    }

    /// Every index in this subtree.
    pub(crate) fn collect_indices(&self, out: &mut HashSet<u32>) {
        match &self.children {
            None => out.extend(self.indices.iter().copied()),
            Some(children) => {
                for child in children.iter() {
                    child.collect_indices(out);
                }
            }
        }
    }

    /// Bounds of this node and every descendant, parents before children.
    pub(crate) fn collect_bounds(&self, out: &mut Vec<Rectangle>) {
        out.push(self.bound);
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_bounds(out);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// NodePool
// ---------------------------------------------------------------------------

/// Free list of retired nodes, drawn from by later splits.
#[derive(Debug, Default)]
pub(crate) struct NodePool {
    nodes: Vec<QuadNode>,
}

impl NodePool {
    /// Draw a node over `bound`, recycling an idle one when available.
    pub(crate) fn acquire(&mut self, bound: Rectangle) -> QuadNode {
        match self.nodes.pop() {
            Some(mut node) => {
                node.reinit(bound);
                node
            }
            None => QuadNode::new(bound),
        }
    }

    /// Retire a node and its whole subtree, children first.
    pub(crate) fn release(&mut self, mut node: QuadNode) {
        if let Some(children) = node.children.take() {
            for child in *children {
                self.release(child);
            }
        }
        node.indices.clear();
        self.nodes.push(node);
    }

    /// Number of idle nodes.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}
