//! Duration codec for dialer export time fields.
//!
//! Dialer exports carry elapsed times in three shapes: a digit string of total
//! seconds (`"125"`), a clock string whose components are not necessarily
//! zero-padded (`"0:2:5"`), or a spreadsheet duration cell. All of them decode
//! to an [`HmsDuration`], whose canonical rendering is a zero-padded
//! `"HH:MM:SS"` string. Decoding never fails: malformed or missing input
//! degrades to `"00:00:00"`.

use chrono::TimeDelta;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::core::domain::RawDuration;

static SECONDS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("SECONDS_PATTERN should compile"));

static CLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d+):(\d+)$").expect("CLOCK_PATTERN should compile")
});

static CANONICAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):([0-5]\d):([0-5]\d)$").expect("CANONICAL_PATTERN should compile")
});

/// A non-negative elapsed time with whole-second resolution.
///
/// # Examples
///
/// ```
/// use cre_dialer::time::duration::HmsDuration;
///
/// let d = HmsDuration::from_seconds(3725);
/// assert_eq!(d.to_string(), "01:02:05");
/// assert_eq!("01:02:05".parse::<HmsDuration>().unwrap(), d);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct HmsDuration {
    seconds: u64,
}

impl HmsDuration {
    pub const ZERO: HmsDuration = HmsDuration { seconds: 0 };

    pub const fn from_seconds(seconds: u64) -> Self {
        Self { seconds }
    }

    /// Converts a chrono delta, clamping negative values to zero and
    /// truncating sub-second precision.
    pub fn from_time_delta(delta: TimeDelta) -> Self {
        Self::from_seconds(u64::try_from(delta.num_seconds()).unwrap_or(0))
    }

    pub const fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn to_time_delta(&self) -> TimeDelta {
        i64::try_from(self.seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    /// Parses a strictly canonical `HH:MM:SS` string (minutes and seconds below 60).
    pub fn parse_canonical(value: &str) -> Option<Self> {
        let caps = CANONICAL_PATTERN.captures(value)?;
        let h: u64 = caps[1].parse().ok()?;
        let m: u64 = caps[2].parse().ok()?;
        let s: u64 = caps[3].parse().ok()?;
        Some(Self::from_seconds(h.checked_mul(3600)?.checked_add(m * 60 + s)?))
    }
}

impl fmt::Display for HmsDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.seconds / 3600;
        let m = (self.seconds % 3600) / 60;
        let s = self.seconds % 60;
        write!(f, "{:02}:{:02}:{:02}", h, m, s)
    }
}

impl FromStr for HmsDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HmsDuration::parse_canonical(s.trim())
            .ok_or_else(|| format!("Invalid HH:MM:SS duration: {}", s))
    }
}

impl From<HmsDuration> for String {
    fn from(value: HmsDuration) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for HmsDuration {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Add for HmsDuration {
    type Output = HmsDuration;

    fn add(self, rhs: HmsDuration) -> HmsDuration {
        HmsDuration::from_seconds(self.seconds.saturating_add(rhs.seconds))
    }
}

impl AddAssign for HmsDuration {
    fn add_assign(&mut self, rhs: HmsDuration) {
        *self = *self + rhs;
    }
}

impl Sum for HmsDuration {
    fn sum<I: Iterator<Item = HmsDuration>>(iter: I) -> Self {
        iter.fold(HmsDuration::ZERO, Add::add)
    }
}

/// Decodes a textual duration field.
///
/// Returns `None` when the text matches neither the digit-seconds nor the
/// clock shape.
///
/// # Examples
///
/// ```
/// use cre_dialer::time::duration::decode_duration_str;
///
/// assert_eq!(decode_duration_str("125").unwrap().to_string(), "00:02:05");
/// assert_eq!(decode_duration_str("1:2:3").unwrap().to_string(), "01:02:03");
/// assert!(decode_duration_str("n/a").is_none());
/// ```
pub fn decode_duration_str(value: &str) -> Option<HmsDuration> {
    let value = value.trim();
    if SECONDS_PATTERN.is_match(value) {
        return value.parse::<u64>().ok().map(HmsDuration::from_seconds);
    }

    let caps = CLOCK_PATTERN.captures(value)?;
    let h: u64 = caps[1].parse().ok()?;
    let m: u64 = caps[2].parse().ok()?;
    let s: u64 = caps[3].parse().ok()?;
    let total = h
        .checked_mul(3600)?
        .checked_add(m.checked_mul(60)?)?
        .checked_add(s)?;
    Some(HmsDuration::from_seconds(total))
}

/// Decodes any raw duration shape, `None` when missing or malformed.
pub fn try_decode_duration(raw: &RawDuration) -> Option<HmsDuration> {
    match raw {
        RawDuration::Missing => None,
        RawDuration::Text(text) => decode_duration_str(text),
        RawDuration::Elapsed(delta) => Some(HmsDuration::from_time_delta(*delta)),
    }
}

/// Decodes any raw duration shape, degrading to zero.
pub fn decode_duration(raw: &RawDuration) -> HmsDuration {
    try_decode_duration(raw).unwrap_or(HmsDuration::ZERO)
}

/// Canonical `HH:MM:SS` rendering of a raw duration field.
pub fn normalize_duration(raw: &RawDuration) -> String {
    decode_duration(raw).to_string()
}

/// Total seconds of a duration string, zero when it cannot be decoded.
///
/// Accepts the canonical form as well as the other textual shapes.
pub fn to_seconds(value: &str) -> u64 {
    decode_duration_str(value).map_or(0, |d| d.seconds())
}

/// Queue duration plus talk duration.
pub fn total_call_duration(queue: &RawDuration, talk: &RawDuration) -> HmsDuration {
    decode_duration(queue) + decode_duration(talk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_digit_string_is_seconds() {
        let raw = RawDuration::Text("125".to_string());
        assert_eq!(normalize_duration(&raw), "00:02:05");
        assert_eq!(normalize_duration(&RawDuration::Text("0".into())), "00:00:00");
        assert_eq!(normalize_duration(&RawDuration::Text("86400".into())), "24:00:00");
    }

    #[test]
    fn test_clock_string_is_padded() {
        assert_eq!(normalize_duration(&RawDuration::Text("0:2:5".into())), "00:02:05");
        assert_eq!(normalize_duration(&RawDuration::Text(" 1:02:03 ".into())), "01:02:03");
    }

    #[test]
    fn test_clock_string_carries_overflowing_minutes() {
        assert_eq!(normalize_duration(&RawDuration::Text("0:75:00".into())), "01:15:00");
    }

    #[test]
    fn test_elapsed_object() {
        let raw = RawDuration::Elapsed(TimeDelta::seconds(3725));
        assert_eq!(normalize_duration(&raw), "01:02:05");

        let negative = RawDuration::Elapsed(TimeDelta::seconds(-5));
        assert_eq!(normalize_duration(&negative), "00:00:00");
    }

    #[test]
    fn test_malformed_and_missing_degrade_to_zero() {
        for raw in [
            RawDuration::Missing,
            RawDuration::Text(String::new()),
            RawDuration::Text("abc".into()),
            RawDuration::Text("1:2".into()),
            RawDuration::Text("-5".into()),
            RawDuration::Text("99999999999999999999999".into()),
        ] {
            assert_eq!(normalize_duration(&raw), "00:00:00", "input {:?}", raw);
        }
        assert!(try_decode_duration(&RawDuration::Text("abc".into())).is_none());
    }

    #[test]
    fn test_to_seconds() {
        assert_eq!(to_seconds("00:02:05"), 125);
        assert_eq!(to_seconds("125"), 125);
        assert_eq!(to_seconds("garbage"), 0);
    }

    #[test]
    fn test_total_call_duration() {
        let queue = RawDuration::Text("00:00:20".into());
        let talk = RawDuration::Text("100".into());
        assert_eq!(total_call_duration(&queue, &talk).to_string(), "00:02:00");
        assert_eq!(
            total_call_duration(&RawDuration::Missing, &talk).to_string(),
            "00:01:40"
        );
    }

    #[test]
    fn test_parse_canonical_is_strict() {
        assert!(HmsDuration::parse_canonical("00:60:00").is_none());
        assert!(HmsDuration::parse_canonical("0:00:00").is_none());
        assert_eq!(
            HmsDuration::parse_canonical("100:00:01").map(|d| d.seconds()),
            Some(360_001)
        );
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let json = serde_json::to_string(&HmsDuration::from_seconds(90)).unwrap();
        assert_eq!(json, "\"00:01:30\"");
        let back: HmsDuration = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seconds(), 90);
    }

    proptest! {
        #[test]
        fn prop_canonical_round_trip(h in 0u64..100, m in 0u64..60, s in 0u64..60) {
            let canonical = format!("{:02}:{:02}:{:02}", h, m, s);
            let seconds = to_seconds(&canonical);
            prop_assert_eq!(HmsDuration::from_seconds(seconds).to_string(), canonical);
        }

        #[test]
        fn prop_digit_strings_decode_to_themselves(secs in 0u64..10_000_000) {
            let decoded = decode_duration_str(&secs.to_string()).unwrap();
            prop_assert_eq!(decoded.seconds(), secs);
        }
    }
}
