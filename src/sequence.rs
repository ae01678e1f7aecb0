//! Candidate identifier sequencing.
//!
//! Produces a random ordering of distinct identifiers drawn from a half-open range. Each run
//! builds a fresh sequence; nothing is persisted between runs.

use std::collections::HashMap;

/// Largest accepted range span.
pub const MAX_SPAN: u32 = 1 << 20;

/// Half-open identifier interval `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierRange {
    /// Inclusive lower bound.
    pub lower: u32,
    /// Exclusive upper bound.
    pub upper: u32,
}

impl IdentifierRange {
    /// What: Build a range, rejecting empty, inverted, or oversized bounds.
    ///
    /// Inputs:
    /// - `lower`: Inclusive lower bound
    /// - `upper`: Exclusive upper bound
    ///
    /// Output:
    /// - `Some(range)` when `lower < upper` and `upper - lower <= MAX_SPAN`; `None` otherwise.
    #[must_use]
    pub const fn new(lower: u32, upper: u32) -> Option<Self> {
        if lower < upper && upper - lower <= MAX_SPAN {
            Some(Self { lower, upper })
        } else {
            None
        }
    }

    /// Number of identifiers in the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.upper.saturating_sub(self.lower) as usize
    }

    /// Always `false` for ranges built through [`IdentifierRange::new`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.upper <= self.lower
    }

    /// Whether `id` falls inside the range.
    #[must_use]
    pub const fn contains(&self, id: u32) -> bool {
        id >= self.lower && id < self.upper
    }
}

/// What: Generate `count` distinct identifiers from `[lower, upper)` in random order.
///
/// Inputs:
/// - `lower`, `upper`: Range bounds (upper exclusive)
/// - `count`: Number of identifiers wanted
///
/// Output:
/// - Exactly `count` distinct values within the range, or an empty vector when the range cannot
///   supply that many.
///
/// Details:
/// - Partial Fisher–Yates using the thread-local RNG: each of the first `count` slots is swapped
///   with a uniformly chosen slot at or after it.
/// - The range is never materialised; only displaced slots are tracked, so memory grows with
///   `count` rather than with the range.
#[must_use]
pub fn unique_sequence(lower: u32, upper: u32, count: usize) -> Vec<u32> {
    let Some(span) = upper.checked_sub(lower) else {
        return Vec::new();
    };
    if usize::try_from(span).is_ok_and(|span| count > span) {
        return Vec::new();
    }

    let mut displaced: HashMap<u32, u32> = HashMap::new();
    let mut out = Vec::with_capacity(count);
    for i in (0..span).take(count) {
        let j = rand::random_range(i..span);
        let at_i = displaced.get(&i).copied().unwrap_or(lower + i);
        let at_j = displaced.get(&j).copied().unwrap_or(lower + j);
        out.push(at_j);
        displaced.insert(j, at_i);
    }
    out
}
