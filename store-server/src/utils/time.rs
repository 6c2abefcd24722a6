//! Time helpers

use chrono::{SecondsFormat, Utc};

/// Current UTC time as RFC 3339 with millisecond precision.
/// Timestamps sort lexicographically, so the first ten characters are
/// the UTC date.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
