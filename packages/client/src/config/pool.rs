//! Pooled connector variant
//!
//! Adds connection-pool sizing, idle pruning and HTTP/2 negotiation slots on
//! top of the base [`Settings`].

use std::any::Any;
use std::time::Duration;

use super::defaults::ConfigDefaults;
use super::slot::Slot;
use super::snapshot::{Configuration, ConfigurationObject, Settings};
use super::value::Http2Upgrade;

/// Connection pool and protocol negotiation slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections_total: Slot<usize>,
    pub max_connections_per_destination: Slot<usize>,
    pub idle_prune_timeout: Slot<Duration>,
    pub http2_upgrade: Slot<Http2Upgrade>,
}

impl PoolSettings {
    pub fn set_non_empty(&mut self, other: &PoolSettings) {
        self.max_connections_total
            .set_non_empty(&other.max_connections_total);
        self.max_connections_per_destination
            .set_non_empty(&other.max_connections_per_destination);
        self.idle_prune_timeout.set_non_empty(&other.idle_prune_timeout);
        self.http2_upgrade.set_non_empty(&other.http2_upgrade);
    }

    pub fn init(&mut self) {
        self.max_connections_total
            .set_if_empty(ConfigDefaults::MAX_CONNECTIONS_TOTAL);
        self.max_connections_per_destination
            .set_if_empty(ConfigDefaults::MAX_CONNECTIONS_PER_DESTINATION);
        self.idle_prune_timeout
            .set_if_empty(ConfigDefaults::IDLE_PRUNE_TIMEOUT);
        self.http2_upgrade.set_if_empty(ConfigDefaults::HTTP2_UPGRADE);
    }
}

/// Connector configuration for pooled network transports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetConnectorConfiguration {
    settings: Settings,
    pool: PoolSettings,
}

impl NetConnectorConfiguration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool_settings(&self) -> &PoolSettings {
        &self.pool
    }

    pub fn pool_settings_mut(&mut self) -> &mut PoolSettings {
        &mut self.pool
    }
}

impl ConfigurationObject for NetConnectorConfiguration {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn pool(&self) -> Option<&PoolSettings> {
        Some(&self.pool)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Configuration for NetConnectorConfiguration {
    fn new_empty() -> Self {
        Self::default()
    }

    fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    fn pool_mut(&mut self) -> Option<&mut PoolSettings> {
        Some(&mut self.pool)
    }

    fn set_non_empty(&mut self, other: &Self) {
        self.settings.set_non_empty(&other.settings);
        self.pool.set_non_empty(&other.pool);
    }
}
