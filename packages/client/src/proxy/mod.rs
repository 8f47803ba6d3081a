//! Proxy resolution
//!
//! URI, username and password are resolved as three independent tunables and
//! combined into a [`ProxyDescriptor`] only afterwards, so a request can swap
//! the proxy host while keeping client-level credentials.

mod descriptor;

pub use descriptor::{ProxyCredentials, ProxyDescriptor, ProxyScheme, encode_basic_auth};

use tracing::warn;

use crate::config::tunables;
use crate::error::Result;
use crate::resolver::ResolutionContext;

/// Effective proxy for one request, `None` to connect directly.
///
/// A URI that cannot be used is logged and treated as no proxy.
///
/// # Errors
///
/// Propagates type mismatches from the request property store.
pub fn resolve_proxy(ctx: &ResolutionContext<'_>) -> Result<Option<ProxyDescriptor>> {
    let Some(uri) = ctx.resolve(&tunables::PROXY_URI)? else {
        return Ok(None);
    };
    let username = ctx.resolve(&tunables::PROXY_USERNAME)?;
    let password = ctx.resolve(&tunables::PROXY_PASSWORD)?;

    match ProxyDescriptor::parse(&uri, username.as_deref(), password.as_deref()) {
        Ok(proxy) => Ok(proxy),
        Err(reason) => {
            warn!(target: "trellis::proxy", uri = %uri, "Ignoring proxy: {}", reason);
            Ok(None)
        }
    }
}
