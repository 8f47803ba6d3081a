//! Header adjustments between redirect hops

use http::header::{AUTHORIZATION, COOKIE, PROXY_AUTHORIZATION, REFERER, WWW_AUTHENTICATE};
use http::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::Url;

/// Drop credentials when the next hop leaves the previous host or port
pub(crate) fn remove_sensitive_headers(headers: &mut HeaderMap, next: &Url, previous: &[Url]) {
    let Some(previous) = previous.last() else {
        return;
    };
    let cross_host = next.host_str() != previous.host_str()
        || next.port_or_known_default() != previous.port_or_known_default();
    if cross_host {
        debug!(
            "Redirect to {:?} leaves {:?}, stripping credentials",
            next.host_str(),
            previous.host_str()
        );
        for name in [AUTHORIZATION, COOKIE, PROXY_AUTHORIZATION, WWW_AUTHENTICATE] {
            headers.remove(name);
        }
        headers.remove("cookie2");
    }
}

/// Referer for the next hop, `None` on an https to http downgrade
pub(crate) fn make_referer(next: &Url, previous: &Url) -> Option<HeaderValue> {
    if next.scheme() == "http" && previous.scheme() == "https" {
        return None;
    }

    let mut referer = previous.clone();
    let _ = referer.set_username("");
    let _ = referer.set_password(None);
    referer.set_fragment(None);
    referer.as_str().parse().ok()
}

pub(crate) fn set_referer(headers: &mut HeaderMap, next: &Url, previous: &[Url]) {
    match previous.last().and_then(|prev| make_referer(next, prev)) {
        Some(value) => {
            headers.insert(REFERER, value);
        }
        None => {
            headers.remove(REFERER);
        }
    }
}
