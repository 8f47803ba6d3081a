//! Configuration snapshots and the layering primitive
//!
//! A snapshot is a bag of [`Slot`]s plus an optional key prefix. Snapshots are
//! layered with `set_non_empty`, which copies only the slots a source actually
//! configured. Once a snapshot is handed to a resolver or stored in a property
//! store it is only ever read.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::defaults::ConfigDefaults;
use super::environment::EnvironmentProvider;
use super::keys::ALLOW_RESTRICTED_HEADERS_ENV;
use super::pool::PoolSettings;
use super::slot::Slot;
use super::value::{
    EntityProcessing, HeaderLimits, SharedConnectionController, SharedRedirectController,
};
use crate::tls::SslContextSupplier;

/// Slots shared by every connector configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    prefix: Option<String>,

    pub connect_timeout: Slot<Duration>,
    pub read_timeout: Slot<Duration>,
    pub proxy_uri: Slot<String>,
    pub proxy_username: Slot<String>,
    pub proxy_password: Slot<String>,
    pub follow_redirects: Slot<bool>,
    pub max_redirects: Slot<u32>,
    pub ssl_context_supplier: Slot<SslContextSupplier>,
    pub chunk_size: Slot<usize>,
    pub header_limits: Slot<HeaderLimits>,
    pub entity_processing: Slot<EntityProcessing>,
    pub expect_continue_threshold: Slot<u64>,
    pub allow_restricted_headers: Slot<bool>,
    pub connection_controller: Slot<SharedConnectionController>,
    pub redirect_controller: Slot<SharedRedirectController>,
}

impl Settings {
    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    #[inline]
    pub fn is_prefixed(&self) -> bool {
        self.prefix.is_some()
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = Some(prefix.into());
    }

    /// `prefix + key` when a prefix is set, else `key`
    pub fn prefixed_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{key}"),
            None => key.to_string(),
        }
    }

    /// Copy every configured slot of `other` into `self`.
    ///
    /// The source prefix is adopted only when the source has one.
    pub fn set_non_empty(&mut self, other: &Settings) {
        if let Some(prefix) = &other.prefix {
            self.prefix = Some(prefix.clone());
        }
        self.connect_timeout.set_non_empty(&other.connect_timeout);
        self.read_timeout.set_non_empty(&other.read_timeout);
        self.proxy_uri.set_non_empty(&other.proxy_uri);
        self.proxy_username.set_non_empty(&other.proxy_username);
        self.proxy_password.set_non_empty(&other.proxy_password);
        self.follow_redirects.set_non_empty(&other.follow_redirects);
        self.max_redirects.set_non_empty(&other.max_redirects);
        self.ssl_context_supplier
            .set_non_empty(&other.ssl_context_supplier);
        self.chunk_size.set_non_empty(&other.chunk_size);
        self.header_limits.set_non_empty(&other.header_limits);
        self.entity_processing.set_non_empty(&other.entity_processing);
        self.expect_continue_threshold
            .set_non_empty(&other.expect_continue_threshold);
        self.allow_restricted_headers
            .set_non_empty(&other.allow_restricted_headers);
        self.connection_controller
            .set_non_empty(&other.connection_controller);
        self.redirect_controller.set_non_empty(&other.redirect_controller);
    }

    /// Fill still-empty slots with library defaults
    pub fn init(&mut self, env: &dyn EnvironmentProvider) {
        self.connect_timeout.set_if_empty(ConfigDefaults::CONNECT_TIMEOUT);
        self.read_timeout.set_if_empty(ConfigDefaults::READ_TIMEOUT);
        self.follow_redirects.set_if_empty(ConfigDefaults::FOLLOW_REDIRECTS);
        self.max_redirects.set_if_empty(ConfigDefaults::MAX_REDIRECTS);
        self.chunk_size.set_if_empty(ConfigDefaults::CHUNK_SIZE);
        self.header_limits.set_if_empty(ConfigDefaults::HEADER_LIMITS);
        self.expect_continue_threshold
            .set_if_empty(ConfigDefaults::EXPECT_CONTINUE_THRESHOLD);
        self.allow_restricted_headers.set_if_empty(
            env.flag(ALLOW_RESTRICTED_HEADERS_ENV)
                .unwrap_or(ConfigDefaults::ALLOW_RESTRICTED_HEADERS),
        );
    }
}

/// Type-erased view of a configuration snapshot.
///
/// This is what a property store carries under the reserved key and what the
/// resolver reads.
pub trait ConfigurationObject: fmt::Debug + Send + Sync + 'static {
    fn settings(&self) -> &Settings;

    /// Pool slots, present only on pooled connector variants
    fn pool(&self) -> Option<&PoolSettings> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn prefix(&self) -> Option<&str> {
        self.settings().prefix()
    }

    fn prefixed_key(&self, key: &str) -> String {
        self.settings().prefixed_key(key)
    }
}

/// A concrete configuration variant.
///
/// `new_empty` is the virtual constructor: every variant returns a fresh
/// instance of its own type, so `copy` never loses variant-specific slots.
pub trait Configuration: ConfigurationObject + Clone + PartialEq + Sized {
    fn new_empty() -> Self;

    fn settings_mut(&mut self) -> &mut Settings;

    fn pool_mut(&mut self) -> Option<&mut PoolSettings> {
        None
    }

    /// Layer `other` over `self`; variants merge their own slots after the
    /// base ones.
    fn set_non_empty(&mut self, other: &Self);

    /// Layer a type-erased snapshot, merging whatever slot groups both sides
    /// have in common.
    fn merge_object(&mut self, other: &dyn ConfigurationObject) {
        self.settings_mut().set_non_empty(other.settings());
        if let (Some(mine), Some(theirs)) = (self.pool_mut(), other.pool()) {
            mine.set_non_empty(theirs);
        }
    }

    /// Independent working copy
    #[must_use]
    fn copy(&self) -> Self {
        let mut copy = Self::new_empty();
        copy.set_non_empty(self);
        copy
    }

    #[must_use]
    fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.settings_mut().set_prefix(prefix);
        self
    }

    /// Apply hard-coded defaults to every empty slot
    fn init(&mut self, env: &dyn EnvironmentProvider) {
        self.settings_mut().init(env);
        if let Some(pool) = self.pool_mut() {
            pool.init();
        }
    }

    /// Freeze into a shareable override object
    fn into_object(self) -> Arc<dyn ConfigurationObject> {
        Arc::new(self)
    }
}

/// Base connector configuration with no variant-specific slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorConfiguration {
    settings: Settings,
}

impl ConnectorConfiguration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigurationObject for ConnectorConfiguration {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Configuration for ConnectorConfiguration {
    fn new_empty() -> Self {
        Self::default()
    }

    fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    fn set_non_empty(&mut self, other: &Self) {
        self.settings.set_non_empty(&other.settings);
    }
}
