//! Geometry primitives: [`Rectangle`], the [`Position`] capability and
//! distance helpers.

use std::fmt;

// ---------------------------------------------------------------------------
// Rectangle
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle in float coordinates, anchored at its top-left
/// corner.
///
/// Point containment is half-open: the low edges belong to the rectangle,
/// the high edges do not. Rectangle-rectangle collision is inclusive instead,
/// so rectangles that merely touch along an edge still collide. A rectangle
/// with zero or negative area collides with nothing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rectangle {
    /// The zero rectangle at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 0.0,
    };

    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Width times height.
    #[inline]
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Whether the rectangle has zero or negative area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Whether the point `(px, py)` falls inside the rectangle.
    ///
    /// Half-open: points on the low edges are inside, points on the high
    /// edges are not.
    #[inline]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.w && py < self.y + self.h
    }

    /// Whether two rectangles overlap or touch.
    ///
    /// Inclusive on all edges, so sharing a single edge or corner counts as
    /// a collision. Empty rectangles never collide.
    #[inline]
    pub fn collides(&self, other: &Rectangle) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x + self.w >= other.x
            && self.y + self.h >= other.y
            && self.x <= other.x + other.w
            && self.y <= other.y + other.h
    }

    /// Whether `self` lies strictly inside `other`.
    ///
    /// The low edges may coincide, the high edges may not.
    #[inline]
    pub fn inside(&self, other: &Rectangle) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.x + self.w < other.x + other.w
            && self.y + self.h < other.y + other.h
    }

    /// Whether the rectangle collides with any rectangle in the iterator.
    pub fn collides_any<'a>(&self, others: impl IntoIterator<Item = &'a Rectangle>) -> bool {
        others.into_iter().any(|r| self.collides(r))
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}x{}", self.x, self.y, self.w, self.h)
    }
}

/// Whether any rectangle in `a` collides with any rectangle in `b`.
pub fn any_collide(a: &[Rectangle], b: &[Rectangle]) -> bool {
    a.iter().any(|r| r.collides_any(b))
}

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    (x1 - x2).abs() + (y1 - y2).abs()
}

/// Euclidean (L2) distance between two points.
#[inline]
pub fn euclidean(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    euclidean_squared(x1, y1, x2, y2).sqrt()
}

/// Squared Euclidean distance. Cheaper than [`euclidean`] and orders the
/// same, which is all a nearest-neighbour scan needs.
#[inline]
pub fn euclidean_squared(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    dx * dx + dy * dy
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Capability trait for anything with a 2D position.
pub trait Position {
    /// Horizontal coordinate.
    fn x(&self) -> f32;
    /// Vertical coordinate.
    fn y(&self) -> f32;

    /// Squared Euclidean distance to another position.
    #[inline]
    fn distance_squared<P: Position>(&self, other: &P) -> f32 {
        euclidean_squared(self.x(), self.y(), other.x(), other.y())
    }

    /// Euclidean distance to another position.
    #[inline]
    fn distance<P: Position>(&self, other: &P) -> f32 {
        euclidean(self.x(), self.y(), other.x(), other.y())
    }
}

impl Position for (f32, f32) {
    #[inline]
    fn x(&self) -> f32 {
        self.0
    }

    #[inline]
    fn y(&self) -> f32 {
        self.1
    }
}

impl Position for (i32, i32) {
    #[inline]
    fn x(&self) -> f32 {
        self.0 as f32
    }

    #[inline]
    fn y(&self) -> f32 {
        self.1 as f32
    }
}

/// The item closest to `target` by Euclidean distance, or `None` for an
/// empty iterator. Ties go to the earliest item.
pub fn nearest_to<'a, T, P>(items: impl IntoIterator<Item = &'a T>, target: &P) -> Option<&'a T>
where
    T: Position,
    P: Position,
{
    let mut best: Option<(&'a T, f32)> = None;
    for item in items {
        let d = item.distance_squared(target);
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((item, d)),
        }
    }
    best.map(|(item, _)| item)
}
