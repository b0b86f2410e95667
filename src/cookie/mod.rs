pub mod header;
pub mod parser;
pub mod settings;

use chrono::{DateTime, Utc};

use self::{
    header::{expire_cookie_header_string, generate_cookie_header_string},
    parser::{lookup_cookie, parse_cookies},
    settings::CookieSettings,
};

pub struct CnctdCookie;

impl CnctdCookie {
    pub fn set(name: &str, value: &str, settings: &CookieSettings, now: DateTime<Utc>) -> String {
        generate_cookie_header_string(name, value, settings, now)
    }

    pub fn delete(name: &str, settings: &CookieSettings, now: DateTime<Utc>) -> String {
        expire_cookie_header_string(name, settings, now)
    }

    pub fn all(header: impl AsRef<[u8]>) -> Vec<(String, String)> {
        parse_cookies(header)
    }

    pub fn get(header: impl AsRef<[u8]>, name: &str) -> Option<String> {
        lookup_cookie(header, name)
    }
}
