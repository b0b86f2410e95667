pub mod cookie;
pub mod utils;

pub use cookie::{
    header::{expire_cookie_header_string, generate_cookie_header_string},
    parser::{lookup_cookie, parse_cookies},
    settings::{default_cookie_settings, CookieEol, CookieSettings},
    CnctdCookie,
};
