//! Merged 1D intervals on the number line.

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A closed span with `start <= end`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    start: f32,
    end: f32,
}

impl Span {
    /// Create a span; the endpoints are reordered so `start <= end`.
    pub fn new(a: f32, b: f32) -> Self {
        if a > b {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    /// Low endpoint.
    #[inline]
    pub fn start(&self) -> f32 {
        self.start
    }

    /// High endpoint.
    #[inline]
    pub fn end(&self) -> f32 {
        self.end
    }

    /// Whether the span is degenerate. Zero-length spans overlap nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Strict overlap: spans that merely touch at an endpoint do not
    /// overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        if self.start < other.start {
            self.end > other.start
        } else {
            self.start < other.end
        }
    }
}

// ---------------------------------------------------------------------------
// IntervalSet
// ---------------------------------------------------------------------------

/// A set of disjoint spans that coalesces on every insertion.
///
/// Spans that overlap or touch end-to-start merge into one, so repeatedly
/// claiming adjacent stretches grows a single span instead of accumulating
/// fragments. Collision checks are strict: touching an endpoint alone is
/// not a collision.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalSet {
    spans: Vec<Span>,
}

impl IntervalSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `[start, start + length]`, merging with anything it overlaps
    /// or touches. Non-positive lengths are ignored.
    pub fn add(&mut self, start: f32, length: f32) {
        if length <= 0.0 {
            return;
        }
        self.spans.push(Span::new(start, start + length));
        self.coalesce();
    }

    /// Whether `[start, start + length]` strictly overlaps any claimed
    /// span. Non-positive lengths never collide.
    pub fn collides(&self, start: f32, length: f32) -> bool {
        if length <= 0.0 {
            return false;
        }
        let probe = Span::new(start, start + length);
        self.spans.iter().any(|s| s.overlaps(&probe))
    }

    /// The merged spans, sorted by start.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Number of disjoint spans.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether nothing has been claimed yet.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Sort by start, then merge every neighbouring pair that overlaps or
    /// touches end-to-start. Re-checks the same slot after a merge so chains
    /// collapse in one pass.
    fn coalesce(&mut self) {
        self.spans.sort_by(|a, b| a.start.total_cmp(&b.start));
        let mut i = 0;
        while i + 1 < self.spans.len() {
            let (a, b) = (self.spans[i], self.spans[i + 1]);
            if a.overlaps(&b) || a.end == b.start {
                self.spans[i] = Span::new(a.start.min(b.start), a.end.max(b.end));
                self.spans.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }
}
