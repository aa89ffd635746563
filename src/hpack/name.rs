//! Header names.
//!
//! Every name in the HPACK static table, plus the HTTP/2 pseudo-headers and
//! the connection-specific names HTTP/2 forbids, is registered once in a
//! process-wide immutable registry. Parsing a registered name, in any case,
//! yields the registered constant; any other name must be a valid RFC 7230
//! token and is stored lowercased.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use super::error::HpackError;

/// A canonical, lowercase HTTP header name.
#[derive(Clone)]
pub struct HeaderName(Repr);

#[derive(Clone)]
enum Repr {
    Registered(&'static str),
    Custom(Box<str>),
}

macro_rules! registered {
    ($($konst:ident => $name:literal,)+) => {
        impl HeaderName {
            $(
                #[doc = concat!("`", $name, "`")]
                pub const $konst: HeaderName = HeaderName(Repr::Registered($name));
            )+
        }

        const REGISTERED: &[&str] = &[$($name),+];
    };
}

registered! {
    AUTHORITY => ":authority",
    METHOD => ":method",
    PATH => ":path",
    PROTOCOL => ":protocol",
    SCHEME => ":scheme",
    STATUS => ":status",
    ACCEPT => "accept",
    ACCEPT_CHARSET => "accept-charset",
    ACCEPT_ENCODING => "accept-encoding",
    ACCEPT_LANGUAGE => "accept-language",
    ACCEPT_RANGES => "accept-ranges",
    ACCESS_CONTROL_ALLOW_ORIGIN => "access-control-allow-origin",
    AGE => "age",
    ALLOW => "allow",
    AUTHORIZATION => "authorization",
    CACHE_CONTROL => "cache-control",
    CONNECTION => "connection",
    CONTENT_DISPOSITION => "content-disposition",
    CONTENT_ENCODING => "content-encoding",
    CONTENT_LANGUAGE => "content-language",
    CONTENT_LENGTH => "content-length",
    CONTENT_LOCATION => "content-location",
    CONTENT_RANGE => "content-range",
    CONTENT_TYPE => "content-type",
    COOKIE => "cookie",
    DATE => "date",
    ETAG => "etag",
    EXPECT => "expect",
    EXPIRES => "expires",
    FROM => "from",
    HOST => "host",
    IF_MATCH => "if-match",
    IF_MODIFIED_SINCE => "if-modified-since",
    IF_NONE_MATCH => "if-none-match",
    IF_RANGE => "if-range",
    IF_UNMODIFIED_SINCE => "if-unmodified-since",
    KEEP_ALIVE => "keep-alive",
    LAST_MODIFIED => "last-modified",
    LINK => "link",
    LOCATION => "location",
    MAX_FORWARDS => "max-forwards",
    PROXY_AUTHENTICATE => "proxy-authenticate",
    PROXY_AUTHORIZATION => "proxy-authorization",
    PROXY_CONNECTION => "proxy-connection",
    RANGE => "range",
    REFERER => "referer",
    REFRESH => "refresh",
    RETRY_AFTER => "retry-after",
    SERVER => "server",
    SET_COOKIE => "set-cookie",
    STRICT_TRANSPORT_SECURITY => "strict-transport-security",
    TE => "te",
    TRAILER => "trailer",
    TRANSFER_ENCODING => "transfer-encoding",
    UPGRADE => "upgrade",
    USER_AGENT => "user-agent",
    VARY => "vary",
    VIA => "via",
    WWW_AUTHENTICATE => "www-authenticate",
}

static REGISTRY: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| REGISTERED.iter().copied().collect());

/// RFC 7230 `tchar`, restricted to lowercase letters.
fn is_token_char(b: u8) -> bool {
    matches!(b,
        b'a'..=b'z'
        | b'0'..=b'9'
        | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*'
        | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}

impl HeaderName {
    /// Parse a header name, case-insensitively.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HpackError> {
        let invalid = || HpackError::InvalidHeaderName(String::from_utf8_lossy(bytes).into_owned());

        let lower = bytes.to_ascii_lowercase();
        let lower = String::from_utf8(lower).map_err(|_| invalid())?;

        if let Some(&name) = REGISTRY.get(lower.as_str()) {
            return Ok(HeaderName(Repr::Registered(name)));
        }

        if lower.is_empty() || !lower.bytes().all(is_token_char) {
            return Err(invalid());
        }

        Ok(HeaderName(Repr::Custom(lower.into_boxed_str())))
    }

    pub fn as_str(&self) -> &str {
        match &self.0 {
            Repr::Registered(name) => name,
            Repr::Custom(name) => name,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.as_str().as_bytes()
    }

    /// Whether this name is one of the registered constants.
    pub fn is_registered(&self) -> bool {
        matches!(self.0, Repr::Registered(_))
    }

    /// Whether this is an HTTP/2 pseudo-header (`:method`, `:path`, ...).
    pub fn is_pseudo(&self) -> bool {
        self.as_str().starts_with(':')
    }

    /// Whether HTTP/2 forbids this connection-specific name (RFC 7540 Section 8.1.2.2).
    pub fn is_connection_specific(&self) -> bool {
        [
            Self::CONNECTION,
            Self::KEEP_ALIVE,
            Self::PROXY_CONNECTION,
            Self::TRANSFER_ENCODING,
            Self::UPGRADE,
        ]
        .contains(self)
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for HeaderName {}

impl Hash for HeaderName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl FromStr for HeaderName {
    type Err = HpackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

impl AsRef<str> for HeaderName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<[u8]> for HeaderName {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<HeaderName> for Vec<u8> {
    fn from(name: HeaderName) -> Self {
        name.as_bytes().to_vec()
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registered() {
        let name: HeaderName = "Content-Type".parse().unwrap();
        assert_eq!(name, HeaderName::CONTENT_TYPE);
        assert!(name.is_registered());
        assert_eq!(name.as_str(), "content-type");
    }

    #[test]
    fn test_parse_pseudo() {
        let name = HeaderName::from_bytes(b":PATH").unwrap();
        assert_eq!(name, HeaderName::PATH);
        assert!(name.is_pseudo());
        assert!(!HeaderName::HOST.is_pseudo());
    }

    #[test]
    fn test_parse_custom() {
        let name: HeaderName = "X-Request-Id".parse().unwrap();
        assert!(!name.is_registered());
        assert_eq!(name.to_string(), "x-request-id");
        assert_eq!(name, "x-request-id".parse().unwrap());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            "".parse::<HeaderName>(),
            Err(HpackError::InvalidHeaderName(_))
        ));
        assert!("bad name".parse::<HeaderName>().is_err());
        assert!(":custom".parse::<HeaderName>().is_err());
        assert!("x-\u{e9}".parse::<HeaderName>().is_err());
        assert!(HeaderName::from_bytes(&[0xff]).is_err());
    }

    #[test]
    fn test_connection_specific() {
        assert!(HeaderName::CONNECTION.is_connection_specific());
        assert!(HeaderName::TRANSFER_ENCODING.is_connection_specific());
        assert!(!HeaderName::TE.is_connection_specific());
    }

    #[test]
    fn test_registry_has_no_duplicates() {
        assert_eq!(REGISTRY.len(), REGISTERED.len());
    }

    #[test]
    fn test_hash_matches_eq() {
        let mut set = HashSet::new();
        set.insert(HeaderName::ACCEPT);
        assert!(set.contains(&"ACCEPT".parse::<HeaderName>().unwrap()));
    }
}
