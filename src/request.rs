//! URL parsing and HTTP request construction.
//!
//! Splits the configured benchmark URL into host and path components and
//! pre-builds the raw HTTP/1.1 request text once at startup. The resulting
//! [`HttpRequest`] is an immutable context object shared by reference with
//! every probe — there is no ambient process-wide buffer state.
//!
//! Host and path live in fixed-capacity `heapless` strings. Oversized
//! components are truncated to a `capacity - 1` prefix, but unlike a silent
//! `strncpy` the truncation is signalled via [`HttpRequest::truncated`] and
//! a warning at parse time.

use core::fmt;

use log::warn;

/// Host buffer capacity in bytes.
pub const MAX_HOST_LEN: usize = 128;
/// Path buffer capacity in bytes.
pub const MAX_PATH_LEN: usize = 256;
/// Prebuilt request text capacity in bytes.
pub const MAX_REQUEST_LEN: usize = 512;

/// HTTPS port used for every probe connection.
pub const HTTPS_PORT: u16 = 443;

// ───────────────────────────────────────────────────────────────
// Error type
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The URL contains no `://` separator.
    MissingScheme,
    /// Host is empty after the scheme separator.
    EmptyHost,
    /// The formatted request text exceeds [`MAX_REQUEST_LEN`].
    RequestTooLong,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingScheme => write!(f, "no '://' separator in URL"),
            Self::EmptyHost => write!(f, "URL has an empty host"),
            Self::RequestTooLong => {
                write!(f, "request text exceeds {} bytes", MAX_REQUEST_LEN)
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// HttpRequest
// ───────────────────────────────────────────────────────────────

/// Parsed URL plus the prebuilt request text.
///
/// Computed once at startup; every probe reuses the same request bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    host: heapless::String<MAX_HOST_LEN>,
    path: heapless::String<MAX_PATH_LEN>,
    text: heapless::String<MAX_REQUEST_LEN>,
    truncated: bool,
}

impl HttpRequest {
    /// Parse `url` (`scheme://host[/path]`) and build the request text.
    ///
    /// A missing `://` is an error — the caller treats it as startup-fatal.
    /// Oversized host/path components are stored as a `capacity - 1` prefix
    /// with [`truncated`](Self::truncated) set.
    pub fn parse(url: &str, user_agent: &str) -> Result<Self, ParseError> {
        let sep = url.find("://").ok_or(ParseError::MissingScheme)?;
        let rest = &url[sep + 3..];

        let (raw_host, raw_path) = match rest.find('/') {
            Some(slash) => (&rest[..slash], &rest[slash..]),
            None => (rest, "/"),
        };
        if raw_host.is_empty() {
            return Err(ParseError::EmptyHost);
        }

        let (host, host_cut) = bounded_copy::<MAX_HOST_LEN>(raw_host);
        let (path, path_cut) = bounded_copy::<MAX_PATH_LEN>(raw_path);
        let truncated = host_cut || path_cut;
        if truncated {
            warn!(
                "URL component truncated (host {} -> {}, path {} -> {})",
                raw_host.len(),
                host.len(),
                raw_path.len(),
                path.len()
            );
        }

        let mut text = heapless::String::new();
        use core::fmt::Write;
        write!(
            text,
            "GET {path} HTTP/1.1\r\nHost: {host}\r\nUser-Agent: {user_agent}\r\nConnection: close\r\n\r\n"
        )
        .map_err(|_| ParseError::RequestTooLong)?;

        Ok(Self {
            host,
            path,
            text,
            truncated,
        })
    }

    /// Remote host name (TLS SNI / certificate common name).
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Request path, always beginning with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Remote TCP port.
    pub fn port(&self) -> u16 {
        HTTPS_PORT
    }

    /// The full prebuilt request bytes.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether host or path lost bytes to buffer capacity.
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

/// Copy `src` into a bounded string, truncating to a `CAP - 1` prefix at a
/// char boundary when it does not fit. Returns the string and whether it
/// was cut.
fn bounded_copy<const CAP: usize>(src: &str) -> (heapless::String<CAP>, bool) {
    let mut out = heapless::String::new();
    if src.len() < CAP {
        // Infallible: checked against capacity above.
        let _ = out.push_str(src);
        return (out, false);
    }
    let mut end = CAP - 1;
    while !src.is_char_boundary(end) {
        end -= 1;
    }
    let _ = out.push_str(&src[..end]);
    (out, true)
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
