pub mod http_date;

use std::{borrow::Cow, cmp::Ordering};

use chrono::TimeDelta;

const HALF_SECOND_NANOS: i32 = 500_000_000;

/// Percent-encodes every UTF-8 byte outside `A-Z a-z 0-9 - _ . ~`.
pub fn url_encode(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Percent-decodes raw bytes. Malformed escapes such as `%zz` or a trailing
/// `%` are kept as-is.
pub fn url_decode(bytes: &[u8]) -> Cow<'_, [u8]> {
    urlencoding::decode_binary(bytes)
}

/// Whole seconds for `max-age=`: negative durations clamp to zero and the
/// fractional part rounds half to even.
pub fn max_age_seconds(duration: TimeDelta) -> i64 {
    if duration <= TimeDelta::zero() {
        return 0;
    }

    let secs = duration.num_seconds();
    match duration.subsec_nanos().cmp(&HALF_SECOND_NANOS) {
        Ordering::Less => secs,
        Ordering::Greater => secs + 1,
        Ordering::Equal => secs + secs % 2,
    }
}
