//! Time-of-day buckets for the hourly CRE pivot.
//!
//! An [`IntervalScheme`] partitions the 24-hour clock into contiguous buckets:
//! one bucket absorbing the early hours before the first cutoff, one bucket per
//! hour up to the last cutoff, and a catch-all bucket for the late hours. Calls
//! without a usable start hour land in [`IntervalBucket::Unknown`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::core::error::{DialerError, DialerResult};

/// A named, totally ordered time-of-day segment.
///
/// Variant order is the column order of the pivot: early hours, single hours
/// ascending, late hours, then unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntervalBucket {
    /// Hours `0..until`.
    Early { until: u32 },
    /// The single hour `h..h+1`.
    Hour(u32),
    /// Hours `from..24`.
    Late { from: u32 },
    /// No start hour could be derived.
    Unknown,
}

impl IntervalBucket {
    /// Column label used by the pivot export, e.g. `"0-8"`, `"9-10"`, `"17+"`.
    pub fn label(&self) -> String {
        match self {
            IntervalBucket::Early { until } => format!("0-{}", until),
            IntervalBucket::Hour(h) => format!("{}-{}", h, h + 1),
            IntervalBucket::Late { from } => format!("{}+", from),
            IntervalBucket::Unknown => "Unknown".to_string(),
        }
    }

    /// Hours covered by this bucket, `None` for [`IntervalBucket::Unknown`].
    pub fn hours(&self) -> Option<Range<u32>> {
        match self {
            IntervalBucket::Early { until } => Some(0..*until),
            IntervalBucket::Hour(h) => Some(*h..h + 1),
            IntervalBucket::Late { from } => Some(*from..24),
            IntervalBucket::Unknown => None,
        }
    }
}

impl fmt::Display for IntervalBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Boundary configuration of the day partition.
///
/// # Examples
///
/// ```
/// use cre_dialer::time::intervals::{IntervalBucket, IntervalScheme};
///
/// let scheme = IntervalScheme::default();
/// assert_eq!(scheme.bucket(3), IntervalBucket::Early { until: 8 });
/// assert_eq!(scheme.bucket(9), IntervalBucket::Hour(9));
/// assert_eq!(scheme.bucket(22), IntervalBucket::Late { from: 17 });
/// assert_eq!(scheme.bucket_for(None), IntervalBucket::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalScheme {
    first_cutoff: u32,
    last_cutoff: u32,
}

impl IntervalScheme {
    pub const DEFAULT_FIRST_CUTOFF: u32 = 8;
    pub const DEFAULT_LAST_CUTOFF: u32 = 17;

    /// Creates a scheme; requires `first_cutoff <= last_cutoff <= 24`.
    ///
    /// `first_cutoff == 0` drops the early bucket and `last_cutoff == 24` drops
    /// the late bucket, so `(0, 24)` yields one bucket per hour.
    pub fn new(first_cutoff: u32, last_cutoff: u32) -> DialerResult<Self> {
        if first_cutoff > last_cutoff || last_cutoff > 24 {
            return Err(DialerError::ConfigurationError(format!(
                "Invalid interval cutoffs {}..{}: expected first <= last <= 24",
                first_cutoff, last_cutoff
            )));
        }
        Ok(Self {
            first_cutoff,
            last_cutoff,
        })
    }

    pub fn first_cutoff(&self) -> u32 {
        self.first_cutoff
    }

    pub fn last_cutoff(&self) -> u32 {
        self.last_cutoff
    }

    /// Maps an hour of day to its bucket. Hours outside 0..=23 are unknown.
    pub fn bucket(&self, hour: u32) -> IntervalBucket {
        if hour >= 24 {
            IntervalBucket::Unknown
        } else if hour < self.first_cutoff {
            IntervalBucket::Early {
                until: self.first_cutoff,
            }
        } else if hour < self.last_cutoff {
            IntervalBucket::Hour(hour)
        } else {
            IntervalBucket::Late {
                from: self.last_cutoff,
            }
        }
    }

    pub fn bucket_for(&self, hour: Option<u32>) -> IntervalBucket {
        hour.map_or(IntervalBucket::Unknown, |h| self.bucket(h))
    }

    /// Every bucket of the scheme in column order, `Unknown` last.
    pub fn buckets(&self) -> Vec<IntervalBucket> {
        let mut buckets = Vec::with_capacity((self.last_cutoff - self.first_cutoff) as usize + 3);
        if self.first_cutoff > 0 {
            buckets.push(IntervalBucket::Early {
                until: self.first_cutoff,
            });
        }
        buckets.extend((self.first_cutoff..self.last_cutoff).map(IntervalBucket::Hour));
        if self.last_cutoff < 24 {
            buckets.push(IntervalBucket::Late {
                from: self.last_cutoff,
            });
        }
        buckets.push(IntervalBucket::Unknown);
        buckets
    }
}

impl Default for IntervalScheme {
    fn default() -> Self {
        Self {
            first_cutoff: Self::DEFAULT_FIRST_CUTOFF,
            last_cutoff: Self::DEFAULT_LAST_CUTOFF,
        }
    }
}
