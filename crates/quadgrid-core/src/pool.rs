//! A thread-safe pool of reusable objects.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// A concurrent object pool.
///
/// [`get`](Pool::get) hands out an idle object or builds a fresh one with
/// the generator; [`put`](Pool::put) returns objects for reuse, up to an
/// optional capacity. Both take `&self`, so a shared pool can be used from
/// several threads at once. Objects are not cleaned on return; the caller
/// decides what state a recycled object carries.
pub struct Pool<T> {
    idle: Mutex<Vec<T>>,
    generator: Box<dyn Fn() -> T + Send + Sync>,
    capacity: Option<usize>,
}

impl<T> Pool<T> {
    /// Create a pool with unbounded capacity.
    pub fn new(generator: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            generator: Box::new(generator),
            capacity: None,
        }
    }

    /// Create a pool that keeps at most `capacity` idle objects.
    pub fn with_capacity(
        generator: impl Fn() -> T + Send + Sync + 'static,
        capacity: usize,
    ) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(capacity)),
            generator: Box::new(generator),
            capacity: Some(capacity),
        }
    }

    /// Take an object from the pool, generating a new one when none are
    /// idle. The generator runs outside the lock.
    pub fn get(&self) -> T {
        let pooled = self.idle.lock().unwrap_or_else(PoisonError::into_inner).pop();
        pooled.unwrap_or_else(|| (self.generator)())
    }

    /// Return an object to the pool. Dropped instead when the pool is at
    /// capacity.
    pub fn put(&self, object: T) {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if self.capacity.is_none_or(|cap| idle.len() < cap) {
            idle.push(object);
        }
    }

    /// Maximum number of idle objects kept, if bounded.
    #[inline]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let idle = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Pool")
            .field("idle", &idle)
            .field("capacity", &self.capacity)
            .finish()
    }
}
