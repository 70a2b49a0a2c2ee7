//! Validation and sanitization of short URLs returned by providers.
//!
//! Implements `UrlSanitizer` with escaping suitable for embedding the link in
//! HTML attributes and admin screens.

use crate::ports::UrlSanitizer;
use url::Url;

/// Schemes a short link may carry once sanitized. Anything else is dropped.
pub const ALLOWED_SCHEMES: &[&str] = &[
    "http", "https", "ftp", "ftps", "mailto", "news", "irc", "irc6", "ircs", "gopher", "nntp",
    "feed", "telnet", "mms", "rtsp", "sms", "svn", "tel", "fax", "xmpp", "webcal", "urn",
];

/// Schemes that are valid without a host.
const HOSTLESS_SCHEMES: &[&str] = &["mailto", "news", "file"];

/// True if `candidate` is an absolute URL.
///
/// The raw string must be printable ASCII without whitespace; unencoded
/// spaces and IDN hosts are rejected rather than normalized. `mailto:`,
/// `news:` and `file:` need no host, every other scheme needs a non-empty one.
pub fn is_absolute_url(candidate: &str) -> bool {
    if candidate.is_empty() || !candidate.chars().all(|c| c.is_ascii_graphic()) {
        return false;
    }
    match Url::parse(candidate) {
        Ok(url) => {
            HOSTLESS_SCHEMES.contains(&url.scheme())
                || url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

/// Remove backslash escaping: `\/` becomes `/`, `\\` becomes `\`.
/// A lone trailing backslash is dropped.
pub fn unslash(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn is_safe_url_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || !c.is_ascii()
        || matches!(
            c,
            '-' | '~'
                | '+'
                | '_'
                | '.'
                | '?'
                | '#'
                | '='
                | '!'
                | '&'
                | ';'
                | ','
                | '/'
                | ':'
                | '%'
                | '@'
                | '$'
                | '|'
                | '*'
                | '\''
                | '('
                | ')'
                | '['
                | ']'
        )
}

/// Default sanitizer: un-slash, strip characters that are unsafe in a URL,
/// reject schemes outside [`ALLOWED_SCHEMES`], then entity-encode `&` and `'`
/// for HTML embedding.
#[derive(Debug, Default, Clone, Copy)]
pub struct EscUrlSanitizer;

impl UrlSanitizer for EscUrlSanitizer {
    fn sanitize(&self, url: &str) -> Option<String> {
        let unslashed = unslash(url);
        let spaced = unslashed.trim().replace(' ', "%20");
        let filtered: String = spaced.chars().filter(|c| is_safe_url_char(*c)).collect();
        let allowed = Url::parse(&filtered).is_ok_and(|u| ALLOWED_SCHEMES.contains(&u.scheme()));
        if !allowed {
            return None;
        }
        Some(filtered.replace('&', "&#038;").replace('\'', "&#039;"))
    }
}
