//! Time handling for dialer exports.
//!
//! - [`duration`]: decode raw talk/hold/queue fields into canonical `HH:MM:SS`
//! - [`intervals`]: assign call start hours to time-of-day buckets

pub mod duration;
pub mod intervals;

pub use duration::{
    decode_duration, decode_duration_str, normalize_duration, to_seconds, total_call_duration,
    try_decode_duration, HmsDuration,
};
pub use intervals::{IntervalBucket, IntervalScheme};
