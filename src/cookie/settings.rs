use anyhow::anyhow;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// When a cookie stops being valid.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CookieEol {
    /// Invalid after this instant.
    ValidUntil(DateTime<Utc>),
    /// Valid for this long, counted from the `now` given at generation time.
    ValidFor(#[serde(with = "duration_secs")] TimeDelta),
    /// Dies with the browser session; no expiration attributes are emitted.
    ValidForSession,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CookieSettings {
    pub eol: CookieEol,
    pub path: String,
    pub domain: Option<String>,
    pub http_only: bool,
    pub secure: bool,
}

/// Session cookie on `/`, no domain, no flags.
pub fn default_cookie_settings() -> CookieSettings {
    CookieSettings {
        eol: CookieEol::ValidForSession,
        path: "/".to_string(),
        domain: None,
        http_only: false,
        secure: false,
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        default_cookie_settings()
    }
}

impl CookieSettings {
    pub fn new(eol: CookieEol) -> Self {
        default_cookie_settings().with_eol(eol)
    }

    /// Reads settings from a JSON config fragment. Missing fields take their
    /// default values.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| anyhow!("Failed to parse cookie settings: {}", e))
    }

    pub fn with_eol(mut self, eol: CookieEol) -> Self {
        self.eol = eol;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
}

// `valid_for` travels as seconds in config files: an integer when whole,
// fractional otherwise, so sub-second precision survives a round trip.
mod duration_secs {
    use chrono::TimeDelta;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const NANOS_PER_SEC: f64 = 1_000_000_000.0;

    pub fn serialize<S: Serializer>(
        duration: &TimeDelta,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let secs = duration.num_seconds();
        match duration.subsec_nanos() {
            0 => serializer.serialize_i64(secs),
            nanos => serializer.serialize_f64(secs as f64 + nanos as f64 / NANOS_PER_SEC),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        let out_of_range =
            || D::Error::custom(format!("duration of {} seconds is out of range", secs));
        if !secs.is_finite() {
            return Err(out_of_range());
        }

        let whole = secs.trunc();
        let nanos = ((secs - whole) * NANOS_PER_SEC).round() as i64;
        TimeDelta::try_seconds(whole as i64)
            .and_then(|d| d.checked_add(&TimeDelta::nanoseconds(nanos)))
            .ok_or_else(out_of_range)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::utils::max_age_seconds;

    use super::*;

    #[test]
    fn default_is_session_cookie_on_root() {
        let settings = CookieSettings::default();
        assert_eq!(settings.eol, CookieEol::ValidForSession);
        assert_eq!(settings.path, "/");
        assert_eq!(settings.domain, None);
        assert!(!settings.http_only);
        assert!(!settings.secure);
        assert_eq!(settings, default_cookie_settings());
    }

    #[test]
    fn builders_set_fields() {
        let settings = CookieSettings::new(CookieEol::ValidFor(TimeDelta::hours(1)))
            .with_path("/app")
            .with_domain("example.com")
            .with_http_only(true)
            .with_secure(true);

        assert_eq!(settings.eol, CookieEol::ValidFor(TimeDelta::hours(1)));
        assert_eq!(settings.path, "/app");
        assert_eq!(settings.domain.as_deref(), Some("example.com"));
        assert!(settings.http_only);
        assert!(settings.secure);
    }

    #[test]
    fn from_json_fills_missing_fields_with_defaults() {
        let settings = CookieSettings::from_json(r#"{"secure": true}"#).unwrap();
        assert!(settings.secure);
        assert_eq!(settings.path, "/");
        assert_eq!(settings.eol, CookieEol::ValidForSession);
    }

    #[test]
    fn from_json_reads_eol_variants() {
        let json = r#"{"eol": {"valid_for": 3600}, "domain": "example.com"}"#;
        let settings = CookieSettings::from_json(json).unwrap();
        assert_eq!(settings.eol, CookieEol::ValidFor(TimeDelta::seconds(3600)));
        assert_eq!(settings.domain.as_deref(), Some("example.com"));

        let json = r#"{"eol": {"valid_until": "2021-06-09T10:18:14Z"}}"#;
        let settings = CookieSettings::from_json(json).unwrap();
        let until = Utc.with_ymd_and_hms(2021, 6, 9, 10, 18, 14).unwrap();
        assert_eq!(settings.eol, CookieEol::ValidUntil(until));

        let settings = CookieSettings::from_json(r#"{"eol": "valid_for_session"}"#).unwrap();
        assert_eq!(settings.eol, CookieEol::ValidForSession);

        let settings = CookieSettings::from_json(r#"{"eol": {"valid_for": 1.5}}"#).unwrap();
        assert_eq!(settings.eol, CookieEol::ValidFor(TimeDelta::milliseconds(1500)));
    }

    #[test]
    fn from_json_rejects_bad_input() {
        assert!(CookieSettings::from_json("not json").is_err());
        let too_long = r#"{"eol": {"valid_for": 9223372036854775807}}"#;
        assert!(CookieSettings::from_json(too_long).is_err());
        assert!(CookieSettings::from_json(r#"{"eol": "forever"}"#).is_err());
    }

    #[test]
    fn json_round_trips() {
        let settings = CookieSettings::new(CookieEol::ValidFor(TimeDelta::days(7)))
            .with_secure(true);
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""valid_for":604800}"#), "{}", json);
        assert_eq!(CookieSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn json_round_trip_keeps_subsecond_durations() {
        for millis in [1500, 2500, 250, -1500] {
            let duration = TimeDelta::milliseconds(millis);
            let settings = CookieSettings::new(CookieEol::ValidFor(duration));
            let json = serde_json::to_string(&settings).unwrap();
            let restored = CookieSettings::from_json(&json).unwrap();

            assert_eq!(restored, settings, "{}", json);
            let CookieEol::ValidFor(restored_duration) = restored.eol else {
                panic!("expected valid_for, got {:?}", restored.eol);
            };
            assert_eq!(max_age_seconds(restored_duration), max_age_seconds(duration));
        }
        assert_eq!(max_age_seconds(TimeDelta::milliseconds(1500)), 2);
    }
}
