//! # Intervals
//!
//! A rounded, half-open numeric range. Every value an interval stores or returns is
//! rounded to its `decimal_places`, so containment checks on grid coordinates never
//! suffer from float drift.

use serde::{Deserialize, Serialize};

/// Rounds `value` to the given number of decimal places.
pub fn round_to(value: f64, decimal_places: i32) -> f64 {
    let scale = 10f64.powi(decimal_places);
    (value * scale).round() / scale
}

/// A half-open range `[start, end)` where `end` is one epsilon past the last
/// representable value.
///
/// The stored range is always non-negative and the stored center is rounded. When the
/// range spans an odd number of steps the center cannot sit exactly halfway, so it is
/// kept as given and `start` rounds up to the next representable value.
///
/// # Examples
///
/// ```
/// use arenagen::Interval;
///
/// // The columns of a 10-wide grid.
/// let columns = Interval::new(0.0, 10.0, true, false, 0);
/// assert_eq!(columns.start(), 0.0);
/// assert_eq!(columns.end(), 10.0);
/// assert_eq!(columns.wrap(-1.0), 9.0);
/// assert_eq!(columns.wrap(12.0), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    center: f64,
    range: f64,
    decimal_places: i32,
}

impl Interval {
    /// Creates an interval from its bounds.
    ///
    /// An exclusive bound is moved one epsilon inward. Bounds that cross after that
    /// adjustment collapse into an empty-range interval at `start`.
    pub fn new(
        start: f64,
        end: f64,
        start_inclusive: bool,
        end_inclusive: bool,
        decimal_places: i32,
    ) -> Self {
        let epsilon = 10f64.powi(-decimal_places);
        let first = if start_inclusive { start } else { start + epsilon };
        let last = if end_inclusive { end } else { end - epsilon };
        let first = round_to(first, decimal_places);
        let range = round_to((last - first).max(0.0), decimal_places);
        // Odd step counts put the center on the lower of the two middle values.
        let steps = (range / epsilon).round();
        let center = round_to(first + (steps / 2.0).floor() * epsilon, decimal_places);
        Self {
            center,
            range,
            decimal_places,
        }
    }

    /// Creates an interval from its width and center.
    pub fn from_range(range: f64, center: f64, decimal_places: i32) -> Self {
        Self {
            center: round_to(center, decimal_places),
            range: round_to(range.abs(), decimal_places),
            decimal_places,
        }
    }

    /// Returns a copy re-rounded to a different precision.
    pub fn with_decimal_places(self, decimal_places: i32) -> Self {
        Self::from_range(self.range, self.center, decimal_places)
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn decimal_places(&self) -> i32 {
        self.decimal_places
    }

    /// The smallest step this interval distinguishes.
    pub fn epsilon(&self) -> f64 {
        10f64.powi(-self.decimal_places)
    }

    pub fn start(&self) -> f64 {
        // `center - range / 2` is a whole number of half steps.
        let half_steps = ((self.center - self.range / 2.0) / self.epsilon() * 2.0).round();
        self.round((half_steps / 2.0).ceil() * self.epsilon()) + 0.0
    }

    /// The last value inside the interval.
    pub fn last(&self) -> f64 {
        self.round(self.start() + self.range)
    }

    /// The exclusive upper bound.
    pub fn end(&self) -> f64 {
        self.round(self.last() + self.epsilon())
    }

    /// Rounds a value to this interval's precision.
    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.decimal_places)
    }

    pub fn inside(&self, value: f64) -> bool {
        let value = self.round(value);
        value >= self.start() && value < self.end()
    }

    pub fn clamp(&self, value: f64) -> f64 {
        self.round(self.round(value).max(self.start()).min(self.last()))
    }

    /// Folds a value into `[start, end)` modulo the interval's span.
    pub fn wrap(&self, value: f64) -> f64 {
        let start = self.start();
        let span = self.end() - start;
        self.round(start + (self.round(value) - start).rem_euclid(span))
    }

    /// Remaps `value` from this interval into `destination`.
    ///
    /// The center maps to the destination's center, `start` to its start and `last`
    /// to its last value. Each half is scaled separately so all three hold even when
    /// a center sits off the exact middle. An empty-range source maps every value to
    /// the destination center.
    pub fn map(&self, destination: &Interval, value: f64) -> f64 {
        if self.range == 0.0 {
            return destination.center();
        }
        let value = self.round(value);
        let lower = (
            self.center - self.start(),
            destination.center() - destination.start(),
        );
        let upper = (
            self.last() - self.center,
            destination.last() - destination.center(),
        );
        let (from, to) = match (value < self.center, lower.0 > 0.0, upper.0 > 0.0) {
            (true, true, _) | (false, true, false) => lower,
            _ => upper,
        };
        destination.round(destination.center() + (value - self.center) * to / from)
    }

    pub fn reflect_around_center(&self, value: f64) -> f64 {
        self.round(2.0 * self.center - value)
    }

    pub fn contains(&self, other: &Interval) -> bool {
        other.start() >= self.start() && other.end() <= self.end()
    }

    pub fn intersects(&self, other: &Interval) -> bool {
        other.start() < self.end() && self.start() < other.end()
    }

    /// True when the intervals overlap or share a boundary.
    pub fn touches(&self, other: &Interval) -> bool {
        let tolerance = self.epsilon().min(other.epsilon()) / 2.0;
        self.intersects(other)
            || (other.start() - self.end()).abs() < tolerance
            || (self.start() - other.end()).abs() < tolerance
    }

    /// Scales the range around the same center.
    pub fn inflate(&self, scale: f64) -> Self {
        Self::from_range(self.range * scale, self.center, self.decimal_places)
    }
}
