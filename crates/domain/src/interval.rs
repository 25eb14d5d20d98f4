// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Closed date-interval arithmetic.
//!
//! Every interval in the card engine is a closed `[start, end]` pair of
//! calendar dates: bonus-condition windows, historical-record validity
//! ranges, and card windows all share the same shape.
//!
//! ## Invariants
//!
//! - Overlap is symmetric: `intervals_overlap(a, b) == intervals_overlap(b, a)`.
//! - Touching endpoints overlap: `[a, x]` and `[x, b]` intersect on `x`.
//! - `clip_intersection` returns `Some` exactly when the inputs overlap, and
//!   the result is contained in both inputs.

use chrono::NaiveDate;

/// A closed calendar-date interval `[start, end]`.
pub type DateInterval = (NaiveDate, NaiveDate);

/// Returns whether two closed date intervals share at least one day.
#[must_use]
pub fn intervals_overlap(a: DateInterval, b: DateInterval) -> bool {
    (a.0 <= b.0 && b.0 <= a.1) || (b.0 <= a.0 && a.0 <= b.1)
}

/// Clips interval `a` to interval `b`, returning their intersection.
///
/// Returns `None` when the intervals do not overlap.
#[must_use]
pub fn clip_intersection(a: DateInterval, b: DateInterval) -> Option<DateInterval> {
    if !intervals_overlap(a, b) {
        return None;
    }
    Some((a.0.max(b.0), a.1.min(b.1)))
}
