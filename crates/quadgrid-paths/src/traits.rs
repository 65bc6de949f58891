//! What a grid cell must expose to be pathfound over.

/// A tile that may block movement.
///
/// The pathfinder treats solid tiles as walls: it never steps onto one,
/// and a path starting or ending on one is empty.
pub trait SolidTile {
    /// Whether this tile blocks movement.
    fn solid(&self) -> bool;
}

impl<T: SolidTile> SolidTile for &T {
    fn solid(&self) -> bool {
        (**self).solid()
    }
}

/// `bool` reads as the tile itself: `true` is a wall.
impl SolidTile for bool {
    fn solid(&self) -> bool {
        *self
    }
}
