//! An array-backed priority queue ordered by a single backward fix pass.
//!
//! [`Heap`] is not a strict binary heap: after every mutation it runs one
//! sweep from the last element down to the root, swapping each element with
//! its structural parent when the pair is out of order. The sweep always
//! leaves the true top element at index 0, but makes no promise about the
//! rest of the array between operations. The payoff is that elements only
//! need [`PartialOrd`], and elements whose ordering key changes while queued
//! (shared `Rc<RefCell<..>>` handles, say) are re-ranked by whichever
//! mutation comes next.

use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// HeapOrder
// ---------------------------------------------------------------------------

/// Ordering direction for a [`Heap`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeapOrder {
    /// Smallest element on top (the default).
    #[default]
    Min,
    /// Largest element on top.
    Max,
}

// ---------------------------------------------------------------------------
// Heap
// ---------------------------------------------------------------------------

/// An array-backed min- or max-queue over partially ordered elements.
#[derive(Clone, Debug)]
pub struct Heap<T> {
    order: HeapOrder,
    elements: Vec<T>,
}

impl<T> Heap<T> {
    /// Create an empty min-queue.
    pub fn new() -> Self {
        Self::with_order(HeapOrder::Min)
    }

    /// Create an empty queue with the given ordering direction.
    pub fn with_order(order: HeapOrder) -> Self {
        Self {
            order,
            elements: Vec::new(),
        }
    }

    /// The element currently at the top, without removing it.
    ///
    /// Reliable only immediately after a mutation; an element whose key
    /// changed in place since then is not re-ranked until the next one.
    #[inline]
    pub fn top(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Ordering direction.
    #[inline]
    pub fn order(&self) -> HeapOrder {
        self.order
    }

    /// Number of queued elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the queue holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Drop all elements, keeping the ordering direction.
    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

impl<T: PartialEq> Heap<T> {
    /// Whether an equal element is queued. Linear scan.
    pub fn contains(&self, element: &T) -> bool {
        self.elements.contains(element)
    }
}

impl<T: PartialOrd> Heap<T> {
    /// Add an element and re-order.
    pub fn push(&mut self, element: T) {
        self.elements.push(element);
        self.fix();
    }

    /// Remove and return the top element, or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        Some(self.delete_at(0))
    }

    /// Remove and return the element at `index`.
    ///
    /// The last element is swapped into the hole, then the fix pass runs.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn delete_at(&mut self, index: usize) -> T {
        let element = self.elements.swap_remove(index);
        self.fix();
        element
    }

    /// One backward sweep from the tail to the root.
    ///
    /// Every element is compared against its structural parent at
    /// `(i + 1) / 2 - 1` exactly once, so the top element is correct after
    /// the pass even though deeper levels may stay unordered.
    fn fix(&mut self) {
        for i in (1..self.elements.len()).rev() {
            let parent = (i + 1) / 2 - 1;
            if self.out_of_order(parent, i) {
                self.elements.swap(parent, i);
            }
        }
    }

    #[inline]
    fn out_of_order(&self, parent: usize, child: usize) -> bool {
        match self.elements[parent].partial_cmp(&self.elements[child]) {
            Some(ordering) => match self.order {
                HeapOrder::Min => ordering == Ordering::Greater,
                HeapOrder::Max => ordering == Ordering::Less,
            },
            // Incomparable pairs stay where they are.
            None => false,
        }
    }
}

impl<T> Default for Heap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialOrd> Extend<T> for Heap<T> {
    /// Append every element, then run a single fix pass.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.elements.extend(iter);
        self.fix();
    }
}

impl<T: PartialOrd> FromIterator<T> for Heap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Heap::new();
        heap.extend(iter);
        heap
    }
}

impl<T: fmt::Display> fmt::Display for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for element in &self.elements {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{element}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn drain<T: PartialOrd>(heap: &mut Heap<T>) -> Vec<T> {
        let mut out = Vec::new();
        while let Some(element) = heap.pop() {
            out.push(element);
        }
        out
    }

    // -----------------------------------------------------------------------
    // Basic queue behaviour
    // -----------------------------------------------------------------------

    #[test]
    fn min_order_pops_ascending() {
        let mut heap = Heap::new();
        for v in [5, 1, 4, 2, 8, 0, 3] {
            heap.push(v);
        }
        assert_eq!(drain(&mut heap), vec![0, 1, 2, 3, 4, 5, 8]);
    }

    #[test]
    fn max_order_pops_descending() {
        let mut heap = Heap::with_order(HeapOrder::Max);
        for v in [5, 1, 4, 2, 8, 0, 3] {
            heap.push(v);
        }
        assert_eq!(drain(&mut heap), vec![8, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn pop_empty_is_none() {
        let mut heap: Heap<i32> = Heap::new();
        assert_eq!(heap.pop(), None);
        heap.push(7);
        assert_eq!(heap.pop(), Some(7));
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn top_peeks_without_removing() {
        let mut heap = Heap::new();
        heap.push(3);
        heap.push(1);
        heap.push(2);
        assert_eq!(heap.top(), Some(&1));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn len_is_empty_clear() {
        let mut heap = Heap::new();
        assert!(heap.is_empty());
        heap.push(1);
        heap.push(2);
        assert_eq!(heap.len(), 2);
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.order(), HeapOrder::Min);
    }

    #[test]
    fn default_is_an_empty_min_queue() {
        let mut heap: Heap<i32> = Heap::default();
        assert!(heap.is_empty());
        assert_eq!(heap.order(), HeapOrder::Min);
        heap.extend([3, 1, 2]);
        assert_eq!(format!("{heap}"), "1 2 3");
    }

    #[test]
    fn contains_scans_elements() {
        let mut heap = Heap::new();
        heap.push(4);
        heap.push(9);
        assert!(heap.contains(&4));
        assert!(heap.contains(&9));
        assert!(!heap.contains(&5));
    }

    #[test]
    fn duplicates_are_kept() {
        let mut heap = Heap::new();
        for v in [2, 1, 2, 1] {
            heap.push(v);
        }
        assert_eq!(drain(&mut heap), vec![1, 1, 2, 2]);
    }

    // -----------------------------------------------------------------------
    // Batch insertion
    // -----------------------------------------------------------------------

    #[test]
    fn extend_fixes_once_and_drains_sorted() {
        let mut heap = Heap::new();
        heap.push(6);
        heap.extend([3, 9, 1, 7]);
        assert_eq!(heap.top(), Some(&1));
        assert_eq!(drain(&mut heap), vec![1, 3, 6, 7, 9]);
    }

    #[test]
    fn from_iterator_builds_min_queue() {
        let mut heap: Heap<i32> = [4, 2, 7].into_iter().collect();
        assert_eq!(heap.pop(), Some(2));
    }

    // -----------------------------------------------------------------------
    // delete_at
    // -----------------------------------------------------------------------

    #[test]
    fn delete_at_removes_arbitrary_index() {
        let mut heap = Heap::new();
        for v in [5, 1, 4, 2] {
            heap.push(v);
        }
        // Remove something that is not the top, then drain the rest.
        let top = *heap.top().unwrap();
        assert_eq!(top, 1);
        let mut seen = vec![heap.delete_at(heap.len() - 1)];
        seen.extend(drain(&mut heap));
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 4, 5]);
    }

    #[test]
    #[should_panic]
    fn delete_at_out_of_bounds_panics() {
        let mut heap: Heap<i32> = Heap::new();
        heap.delete_at(0);
    }

    // -----------------------------------------------------------------------
    // Partial orderings
    // -----------------------------------------------------------------------

    #[test]
    fn float_elements_need_only_partial_ord() {
        let mut heap = Heap::new();
        for v in [2.5f32, 0.5, 1.5] {
            heap.push(v);
        }
        assert_eq!(drain(&mut heap), vec![0.5, 1.5, 2.5]);
    }

    #[test]
    fn incomparable_elements_do_not_swap() {
        let mut heap = Heap::new();
        heap.push(f32::NAN);
        heap.push(1.0);
        // NaN compares with nothing, so the sweep leaves it on top.
        assert!(heap.pop().unwrap().is_nan());
        assert_eq!(heap.pop(), Some(1.0));
    }

    // -----------------------------------------------------------------------
    // In-place key mutation through shared handles
    // -----------------------------------------------------------------------

    #[test]
    fn mutated_keys_rerank_on_next_operation() {
        let a = Rc::new(RefCell::new(3));
        let b = Rc::new(RefCell::new(5));
        let c = Rc::new(RefCell::new(8));
        let mut heap = Heap::new();
        heap.push(Rc::clone(&a));
        heap.push(Rc::clone(&b));
        heap.push(Rc::clone(&c));

        // Shrink c's key behind the queue's back: the top is stale until the
        // next mutation runs a fix pass.
        *c.borrow_mut() = 1;
        assert_eq!(*heap.top().unwrap().borrow(), 3);

        heap.push(Rc::new(RefCell::new(4)));
        assert_eq!(*heap.top().unwrap().borrow(), 1);

        let order: Vec<i32> = drain(&mut heap).iter().map(|h| *h.borrow()).collect();
        assert_eq!(order, vec![1, 3, 4, 5]);
    }
}
