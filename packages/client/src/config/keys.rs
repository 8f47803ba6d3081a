//! Property keys recognised by connectors
//!
//! Each tunable has a canonical string id. Ids may be prefixed per
//! configuration instance so several isolated clients can share one store.

use std::fmt;

/// Reserved key carrying an override configuration object.
pub const CONNECTOR_CONFIGURATION: &str = "trellis.client.connectorConfiguration";

/// Environment variable consulted for the restricted-headers default.
pub const ALLOW_RESTRICTED_HEADERS_ENV: &str = "trellis.allowRestrictedHeaders";

/// Finite domain of connector tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    ConnectTimeout,
    ReadTimeout,
    ProxyUri,
    ProxyUsername,
    ProxyPassword,
    FollowRedirects,
    MaxRedirects,
    SslContextSupplier,
    ChunkSize,
    HeaderSizeLimits,
    EntityProcessing,
    ExpectContinueThreshold,
    AllowRestrictedHeaders,
    ConnectionController,
    RedirectController,
    MaxConnectionsTotal,
    MaxConnectionsPerDestination,
    IdlePruneTimeout,
    Http2Upgrade,
}

impl PropertyKey {
    pub const ALL: [PropertyKey; 19] = [
        PropertyKey::ConnectTimeout,
        PropertyKey::ReadTimeout,
        PropertyKey::ProxyUri,
        PropertyKey::ProxyUsername,
        PropertyKey::ProxyPassword,
        PropertyKey::FollowRedirects,
        PropertyKey::MaxRedirects,
        PropertyKey::SslContextSupplier,
        PropertyKey::ChunkSize,
        PropertyKey::HeaderSizeLimits,
        PropertyKey::EntityProcessing,
        PropertyKey::ExpectContinueThreshold,
        PropertyKey::AllowRestrictedHeaders,
        PropertyKey::ConnectionController,
        PropertyKey::RedirectController,
        PropertyKey::MaxConnectionsTotal,
        PropertyKey::MaxConnectionsPerDestination,
        PropertyKey::IdlePruneTimeout,
        PropertyKey::Http2Upgrade,
    ];

    /// Canonical, unprefixed id
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PropertyKey::ConnectTimeout => "trellis.client.connectTimeout",
            PropertyKey::ReadTimeout => "trellis.client.readTimeout",
            PropertyKey::ProxyUri => "trellis.client.proxy.uri",
            PropertyKey::ProxyUsername => "trellis.client.proxy.username",
            PropertyKey::ProxyPassword => "trellis.client.proxy.password",
            PropertyKey::FollowRedirects => "trellis.client.followRedirects",
            PropertyKey::MaxRedirects => "trellis.client.maxRedirects",
            PropertyKey::SslContextSupplier => "trellis.client.ssl.contextSupplier",
            PropertyKey::ChunkSize => "trellis.client.chunkSize",
            PropertyKey::HeaderSizeLimits => "trellis.client.headerSizeLimits",
            PropertyKey::EntityProcessing => "trellis.client.entityProcessing",
            PropertyKey::ExpectContinueThreshold => "trellis.client.expect100Continue.threshold",
            PropertyKey::AllowRestrictedHeaders => "trellis.client.allowRestrictedHeaders",
            PropertyKey::ConnectionController => "trellis.client.connectionController",
            PropertyKey::RedirectController => "trellis.client.redirectController",
            PropertyKey::MaxConnectionsTotal => "trellis.client.pool.maxTotal",
            PropertyKey::MaxConnectionsPerDestination => "trellis.client.pool.maxPerDestination",
            PropertyKey::IdlePruneTimeout => "trellis.client.pool.idlePruneTimeout",
            PropertyKey::Http2Upgrade => "trellis.client.http2.upgrade",
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PropertyKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
