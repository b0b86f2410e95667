use std::borrow::Cow;

use crate::utils::url_decode;

/// Splits a raw `Cookie` request header into `(name, value)` pairs, in order.
///
/// The header is split on every `;` and nothing is trimmed, so with the
/// usual `"; "` separator every name after the first keeps a leading space:
/// `a=1; b=2` parses to `[("a", "1"), (" b", "2")]`.
///
/// An empty header means no cookies and parses to an empty list.
///
/// Values are percent-decoded. Bad escapes and invalid UTF-8 are decoded
/// best-effort instead of failing, since the header comes straight from the
/// client.
pub fn parse_cookies(header: impl AsRef<[u8]>) -> Vec<(String, String)> {
    let header = header.as_ref();
    if header.is_empty() {
        return Vec::new();
    }
    header.split(|&b| b == b';').map(parse_pair).collect()
}

/// Value of the first cookie whose name is exactly `name`.
pub fn lookup_cookie(header: impl AsRef<[u8]>, name: &str) -> Option<String> {
    parse_cookies(header)
        .into_iter()
        .find(|(cookie_name, _)| cookie_name == name)
        .map(|(_, value)| value)
}

fn parse_pair(segment: &[u8]) -> (String, String) {
    match segment.iter().position(|&b| b == b'=') {
        Some(eq) => {
            let name = lossy(&segment[..eq]);
            let value = lossy(&url_decode(&segment[eq + 1..]));
            (name, value)
        }
        None => {
            log::trace!("cookie segment without '=' ({} bytes)", segment.len());
            (lossy(segment), String::new())
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = text {
        log::debug!("cookie header contained invalid UTF-8, decoded lossily");
    }
    text.into_owned()
}
