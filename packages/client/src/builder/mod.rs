//! `ConnectorBuilder` for client-level connector defaults
//!
//! The builder owns one configuration snapshot and fills it through fluent
//! setters. Arguments are validated at the call site; a rejected argument is a
//! programming error and fails the chain with a builder error.

mod layering;

use std::time::Duration;

use crate::config::keys::PropertyKey;
use crate::config::pool::{NetConnectorConfiguration, PoolSettings};
use crate::config::snapshot::Configuration;
use crate::config::validation::{ConfigValidator, ConfigurationError};
use crate::config::value::{
    EntityProcessing, HeaderLimits, Http2Upgrade, SharedConnectionController,
    SharedRedirectController,
};
use crate::error::{self, Result};
use crate::proxy::ProxyDescriptor;
use crate::tls::SslContextSupplier;

/// Fluent builder over a connector configuration variant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectorBuilder<C: Configuration = NetConnectorConfiguration> {
    config: C,
}

impl<C: Configuration> ConnectorBuilder<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: C::new_empty(),
        }
    }

    /// Start from an existing snapshot
    #[must_use]
    pub fn from_configuration(config: C) -> Self {
        Self { config }
    }

    /// The snapshot as configured so far
    pub fn configuration(&self) -> &C {
        &self.config
    }

    /// Independent working copy of the builder's snapshot
    #[must_use]
    pub fn rw(&self) -> C {
        self.config.copy()
    }

    /// Namespace every property lookup of the built configuration.
    ///
    /// Two clients with different prefixes can share one property store
    /// without seeing each other's values.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.settings_mut().set_prefix(prefix);
        self
    }

    /// Set the connect timeout
    ///
    /// # Arguments
    /// * `timeout` - Maximum time to establish a connection, zero for the
    ///   platform default
    ///
    /// # Returns
    /// `Self` for method chaining
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.settings_mut().connect_timeout.set(timeout);
        self
    }

    /// Set the read timeout, zero for the platform default
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.settings_mut().read_timeout.set(timeout);
        self
    }

    /// Route connections through a proxy.
    ///
    /// `DIRECT` is accepted and means no proxy.
    ///
    /// # Errors
    ///
    /// Returns a builder error for URIs that do not parse or use a scheme
    /// other than http, https, socks5 or socks5h.
    pub fn proxy_uri(mut self, uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        ProxyDescriptor::parse(&uri, None, None)
            .map_err(|e| error::builder(e).with_key(PropertyKey::ProxyUri.as_str()))?;
        self.config.settings_mut().proxy_uri.set(uri);
        Ok(self)
    }

    /// Credentials presented to the proxy
    ///
    /// # Errors
    ///
    /// Returns a builder error if `username` is empty.
    pub fn proxy_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let username = username.into();
        if username.is_empty() {
            return Err(error::builder(ConfigurationError::Missing("proxy username"))
                .with_key(PropertyKey::ProxyUsername.as_str()));
        }
        let settings = self.config.settings_mut();
        settings.proxy_username.set(username);
        settings.proxy_password.set(password.into());
        Ok(self)
    }

    #[must_use]
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.config.settings_mut().follow_redirects.set(follow);
        self
    }

    /// Upper bound on redirect hops followed for one request
    ///
    /// # Errors
    ///
    /// Returns a builder error if `max` is zero.
    pub fn max_redirects(mut self, max: u32) -> Result<Self> {
        ConfigValidator::positive(&max)
            .map_err(|e| error::builder(e).with_key(PropertyKey::MaxRedirects.as_str()))?;
        self.config.settings_mut().max_redirects.set(max);
        Ok(self)
    }

    /// Supplier of the TLS context, invoked lazily per connection
    #[must_use]
    pub fn ssl_context_supplier(mut self, supplier: SslContextSupplier) -> Self {
        self.config.settings_mut().ssl_context_supplier.set(supplier);
        self
    }

    /// Set the chunk size used for chunked request entities
    ///
    /// # Errors
    ///
    /// Returns a builder error for negative sizes.
    pub fn chunk_size(mut self, size: i64) -> Result<Self> {
        let size = ConfigValidator::chunk_size(size)
            .map_err(|e| error::builder(e).with_key(PropertyKey::ChunkSize.as_str()))?;
        self.config.settings_mut().chunk_size.set(size);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns a builder error if any limit is zero.
    pub fn header_limits(mut self, limits: HeaderLimits) -> Result<Self> {
        ConfigValidator::header_limits(&limits)
            .map_err(|e| error::builder(e).with_key(PropertyKey::HeaderSizeLimits.as_str()))?;
        self.config.settings_mut().header_limits.set(limits);
        Ok(self)
    }

    #[must_use]
    pub fn entity_processing(mut self, processing: EntityProcessing) -> Self {
        self.config.settings_mut().entity_processing.set(processing);
        self
    }

    /// Entity size above which `Expect: 100-continue` is sent
    #[must_use]
    pub fn expect_continue_threshold(mut self, bytes: u64) -> Self {
        self.config
            .settings_mut()
            .expect_continue_threshold
            .set(bytes);
        self
    }

    #[must_use]
    pub fn allow_restricted_headers(mut self, allow: bool) -> Self {
        self.config
            .settings_mut()
            .allow_restricted_headers
            .set(allow);
        self
    }

    #[must_use]
    pub fn connection_controller(mut self, controller: SharedConnectionController) -> Self {
        self.config
            .settings_mut()
            .connection_controller
            .set(controller);
        self
    }

    #[must_use]
    pub fn redirect_controller(mut self, controller: SharedRedirectController) -> Self {
        self.config.settings_mut().redirect_controller.set(controller);
        self
    }
}

impl ConnectorBuilder<NetConnectorConfiguration> {
    /// # Errors
    ///
    /// Returns a builder error if `max` is zero.
    pub fn max_connections_total(mut self, max: usize) -> Result<Self> {
        ConfigValidator::positive(&max)
            .map_err(|e| error::builder(e).with_key(PropertyKey::MaxConnectionsTotal.as_str()))?;
        self.pool_mut().max_connections_total.set(max);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns a builder error if `max` is zero.
    pub fn max_connections_per_destination(mut self, max: usize) -> Result<Self> {
        ConfigValidator::positive(&max).map_err(|e| {
            error::builder(e).with_key(PropertyKey::MaxConnectionsPerDestination.as_str())
        })?;
        self.pool_mut().max_connections_per_destination.set(max);
        Ok(self)
    }

    /// How long an idle pooled connection lives before it is pruned
    #[must_use]
    pub fn idle_prune_timeout(mut self, timeout: Duration) -> Self {
        self.pool_mut().idle_prune_timeout.set(timeout);
        self
    }

    #[must_use]
    pub fn http2_upgrade(mut self, upgrade: Http2Upgrade) -> Self {
        self.pool_mut().http2_upgrade.set(upgrade);
        self
    }

    fn pool_mut(&mut self) -> &mut PoolSettings {
        self.config.pool_settings_mut()
    }
}
