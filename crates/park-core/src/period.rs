//! Hour-granular time periods and their algebra.
//!
//! A [`Period`] is a closed pair of hour timestamps with `begin <= end`. All
//! operations are pure: they return new periods (or `None`) and never mutate.
//!
//! The boundary rules matter to the matcher:
//!
//! | Predicate | Touching at one point | Overlapping interiors |
//! |-----------|-----------------------|-----------------------|
//! | [`Period::intersects`] | `false` | `true` |
//! | [`Period::adjacent`] | `true` | `false` (unless an endpoint also coincides) |
//! | [`Period::gluable`] | `true` | `true` |
//! | [`Period::intersection`] | `None` | `Some` |

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::time::{floor_to_hour, format_hour, parse_hour};

/// An immutable, hour-granular time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "PeriodRepr")]
pub struct Period {
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Wire shape of a period; normalized through [`Period::new`] on the way in.
#[derive(Deserialize)]
struct PeriodRepr {
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl From<PeriodRepr> for Period {
    fn from(repr: PeriodRepr) -> Self {
        Self::new(repr.begin, repr.end)
    }
}

impl Period {
    /// Creates a period, truncating both bounds to the hour and ordering them
    /// so the earlier one becomes `begin`.
    #[must_use]
    pub fn new(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        let a = floor_to_hour(a);
        let b = floor_to_hour(b);
        Self {
            begin: a.min(b),
            end: a.max(b),
        }
    }

    /// Creates a period from two `YYYY-MM-DDTHH` strings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ParkError::InvalidArgument`] if either bound fails to
    /// parse.
    pub fn parse(a: &str, b: &str) -> Result<Self> {
        Ok(Self::new(parse_hour(a)?, parse_hour(b)?))
    }

    /// Creates a period spanning `from..to` hours after `origin`.
    #[must_use]
    pub fn hours(origin: DateTime<Utc>, from: i64, to: i64) -> Self {
        Self::new(
            origin + TimeDelta::hours(from),
            origin + TimeDelta::hours(to),
        )
    }

    /// Start of the period.
    #[must_use]
    pub const fn begin(&self) -> DateTime<Utc> {
        self.begin
    }

    /// End of the period.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Number of whole hours between the bounds.
    #[must_use]
    pub fn length(&self) -> i64 {
        (self.end - self.begin).num_hours()
    }

    /// Returns true if `other` lies entirely within this period (bounds
    /// inclusive).
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.begin >= self.begin && other.end <= self.end
    }

    /// Returns true if the open interiors overlap. Touching at an endpoint is
    /// not an intersection.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        other.end > self.begin && other.begin < self.end
    }

    /// Returns true if the periods share a boundary point.
    #[must_use]
    pub fn adjacent(&self, other: &Self) -> bool {
        self.end == other.begin || self.begin == other.end
    }

    /// Returns true if the periods overlap or touch, so they can be merged
    /// into one contiguous period.
    #[must_use]
    pub fn gluable(&self, other: &Self) -> bool {
        self.adjacent(other) || self.intersects(other)
    }

    /// The overlapping sub-period, or `None` when the periods are disjoint or
    /// only touch.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if other.end <= self.begin || other.begin >= self.end {
            return None;
        }
        Some(Self::new(
            self.begin.max(other.begin),
            self.end.min(other.end),
        ))
    }

    /// The part of this period that lies before `other` begins.
    #[must_use]
    pub fn before(&self, other: &Self) -> Option<Self> {
        if other.begin <= self.begin {
            return None;
        }
        Some(Self::new(self.begin, self.end.min(other.begin)))
    }

    /// The part of this period that lies after `other` ends.
    #[must_use]
    pub fn after(&self, other: &Self) -> Option<Self> {
        if other.end >= self.end {
            return None;
        }
        Some(Self::new(other.end.max(self.begin), self.end))
    }

    /// The convex union of two gluable periods, or `None` if they neither
    /// overlap nor touch.
    #[must_use]
    pub fn glue(&self, other: &Self) -> Option<Self> {
        self.gluable(other).then(|| {
            Self::new(self.begin.min(other.begin), self.end.max(other.end))
        })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} - {}>", format_hour(self.begin), format_hour(self.end))
    }
}
