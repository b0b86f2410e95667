use chrono::{DateTime, TimeDelta, Utc};

use crate::utils::{http_date::format_http_date, max_age_seconds, url_encode};

use super::settings::{CookieEol, CookieSettings};

/// Builds the value of a `Set-Cookie` header.
///
/// Segments are joined with `"; "` in a fixed order: `name=value`,
/// `domain=`, `path=`, `max-age=`, `expires=`, `HttpOnly`, `Secure`. Only
/// the value is percent-encoded; `name`, `path` and `domain` are written
/// verbatim, so rejecting control characters or separators in them is up to
/// the caller.
///
/// `now` is the reference instant for relative expiration. The function never
/// reads the clock and never fails.
pub fn generate_cookie_header_string(
    name: &str,
    value: &str,
    settings: &CookieSettings,
    now: DateTime<Utc>,
) -> String {
    let mut segments = vec![format!("{}={}", name, url_encode(value))];

    if let Some(domain) = &settings.domain {
        segments.push(format!("domain={}", domain));
    }
    segments.push(format!("path={}", settings.path));

    if let Some((max_age, expires)) = expiration(&settings.eol, now) {
        segments.push(format!("max-age={}", max_age));
        segments.push(format!("expires={}", format_http_date(&expires)));
    }

    if settings.http_only {
        segments.push("HttpOnly".to_string());
    }
    if settings.secure {
        segments.push("Secure".to_string());
    }

    log::trace!(
        "generated set-cookie header for {} (domain: {}, expires: {}, http_only: {}, secure: {})",
        name,
        settings.domain.is_some(),
        settings.eol != CookieEol::ValidForSession,
        settings.http_only,
        settings.secure,
    );
    segments.join("; ")
}

/// Header that makes the browser drop `name`: empty value, expired at the
/// Unix epoch. The other attributes come from `settings` and must match the
/// ones the cookie was set with.
pub fn expire_cookie_header_string(
    name: &str,
    settings: &CookieSettings,
    now: DateTime<Utc>,
) -> String {
    let settings = settings
        .clone()
        .with_eol(CookieEol::ValidUntil(DateTime::<Utc>::UNIX_EPOCH));
    generate_cookie_header_string(name, "", &settings, now)
}

// (max-age seconds, expires instant), or None for session cookies.
fn expiration(eol: &CookieEol, now: DateTime<Utc>) -> Option<(i64, DateTime<Utc>)> {
    match *eol {
        CookieEol::ValidForSession => None,
        CookieEol::ValidFor(duration) => {
            Some((max_age_seconds(duration), saturating_add(now, duration)))
        }
        CookieEol::ValidUntil(until) => {
            Some((max_age_seconds(until.signed_duration_since(now)), until))
        }
    }
}

fn saturating_add(now: DateTime<Utc>, duration: TimeDelta) -> DateTime<Utc> {
    now.checked_add_signed(duration).unwrap_or(if duration < TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}
