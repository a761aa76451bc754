//! Time-related utilities.
//!
//! All timestamps in the signaling protocol are Unix epoch milliseconds (UTC).
//! Clients may supply their own timestamps on chat messages; everything the
//! server stamps itself goes through [`now_millis`].

use chrono::{TimeZone, Utc};

/// Current Unix timestamp in milliseconds (UTC).
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to an RFC 3339 string.
///
/// Used by the HTTP observability endpoints; the WebSocket protocol itself
/// only carries raw millisecond values.
pub fn millis_to_rfc3339(timestamp_millis: i64) -> String {
    let seconds = timestamp_millis.div_euclid(1000);
    let nanos = (timestamp_millis.rem_euclid(1000) * 1_000_000) as u32;
    match Utc.timestamp_opt(seconds, nanos) {
        chrono::LocalResult::Single(dt) => dt.to_rfc3339(),
        _ => String::new(),
    }
}
