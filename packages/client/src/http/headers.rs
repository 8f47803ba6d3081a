//! Restricted request header filtering

use http::HeaderMap;
use http::header::HeaderName;
use tracing::debug;

/// Headers the transport owns unless restricted headers are allowed
pub const RESTRICTED_HEADERS: [&str; 12] = [
    "access-control-request-headers",
    "access-control-request-method",
    "connection",
    "content-length",
    "content-transfer-encoding",
    "host",
    "keep-alive",
    "origin",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "via",
];

/// Membership in [`RESTRICTED_HEADERS`]; header names are already lowercase
pub fn is_restricted(name: &HeaderName) -> bool {
    RESTRICTED_HEADERS.contains(&name.as_str())
}

/// Strips restricted headers from outgoing requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFilter {
    allow_restricted: bool,
}

impl HeaderFilter {
    pub const fn new(allow_restricted: bool) -> Self {
        Self { allow_restricted }
    }

    pub const fn allows_restricted(&self) -> bool {
        self.allow_restricted
    }

    /// Remove every restricted header unless they are allowed.
    ///
    /// Returns how many header names were dropped.
    pub fn apply(&self, headers: &mut HeaderMap) -> usize {
        if self.allow_restricted {
            return 0;
        }

        let dropped: Vec<HeaderName> = headers
            .keys()
            .filter(|name| is_restricted(name))
            .cloned()
            .collect();

        for name in &dropped {
            debug!("Dropping restricted request header {}", name);
            headers.remove(name);
        }
        dropped.len()
    }
}
