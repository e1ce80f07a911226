//! TAI64N external-format timestamps, as written by multilog/svlogd.
//!
//! A label looks like `@4000000065a51e4b1a2b3c4d`: `@`, 16 hex digits of
//! TAI64 seconds, then 8 hex digits of nanoseconds. Only the seconds part is
//! decoded.

use chrono::{DateTime, SecondsFormat, Utc};

/// TAI64 label of the Unix epoch: 2^62 + 10 leap seconds.
pub const TAI64_UNIX_OFFSET: u64 = (1 << 62) + 10;

/// Every label in the external format starts with this.
pub const LABEL_PREFIX: &str = "@4";

const SECONDS_HEX_LEN: usize = 16;
const NANOS_HEX_LEN: usize = 8;

/// Decode a single `@…` label into a UTC instant.
///
/// Accepts the 16-digit TAI64 and the 24-digit TAI64N widths. Anything else
/// returns `None`.
pub fn decode_label(token: &str) -> Option<DateTime<Utc>> {
    if !token.starts_with(LABEL_PREFIX) {
        return None;
    }
    let hex = &token[1..];
    if hex.len() != SECONDS_HEX_LEN && hex.len() != SECONDS_HEX_LEN + NANOS_HEX_LEN {
        return None;
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let label = u64::from_str_radix(&hex[..SECONDS_HEX_LEN], 16).ok()?;
    let unix = i64::try_from(i128::from(label) - i128::from(TAI64_UNIX_OFFSET)).ok()?;
    DateTime::from_timestamp(unix, 0)
}

/// Find a leading TAI64N label in `line`.
///
/// Returns the byte length of the label token and the decoded instant.
pub fn split_line(line: &str) -> Option<(usize, DateTime<Utc>)> {
    if !line.starts_with(LABEL_PREFIX) {
        return None;
    }
    let token_len = line
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(line.len());
    decode_label(&line[..token_len]).map(|dt| (token_len, dt))
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn format_instant(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
