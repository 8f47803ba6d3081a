//! Tagged accessors for every tunable
//!
//! Each [`Tunable`] pairs a [`PropertyKey`] with the slot it lives in and the
//! check applied to values that arrive through a property store. The resolver
//! and the client-level layering walk these instead of reflecting over fields.

use std::time::Duration;

use super::keys::PropertyKey;
use super::pool::PoolSettings;
use super::slot::Slot;
use super::snapshot::{Configuration, ConfigurationObject, Settings};
use super::validation::{ConfigResult, ConfigValidator};
use super::value::{
    EntityProcessing, HeaderLimits, Http2Upgrade, SharedConnectionController,
    SharedRedirectController,
};
use crate::tls::SslContextSupplier;

/// Where a tunable's slot lives
pub enum Field<T> {
    Base {
        get: fn(&Settings) -> &Slot<T>,
        get_mut: fn(&mut Settings) -> &mut Slot<T>,
    },
    Pool {
        get: fn(&PoolSettings) -> &Slot<T>,
        get_mut: fn(&mut PoolSettings) -> &mut Slot<T>,
    },
}

pub struct Tunable<T> {
    pub key: PropertyKey,
    pub field: Field<T>,
    pub validate: fn(&T) -> ConfigResult<()>,
}

impl<T> Tunable<T> {
    /// The slot inside `config`, `None` if that variant does not carry it
    pub fn slot<'a>(&self, config: &'a dyn ConfigurationObject) -> Option<&'a Slot<T>> {
        match self.field {
            Field::Base { get, .. } => Some(get(config.settings())),
            Field::Pool { get, .. } => config.pool().map(get),
        }
    }

    pub fn slot_mut<'a, C: Configuration>(&self, config: &'a mut C) -> Option<&'a mut Slot<T>> {
        match self.field {
            Field::Base { get_mut, .. } => Some(get_mut(config.settings_mut())),
            Field::Pool { get_mut, .. } => config.pool_mut().map(get_mut),
        }
    }
}

pub const CONNECT_TIMEOUT: Tunable<Duration> = Tunable {
    key: PropertyKey::ConnectTimeout,
    field: Field::Base {
        get: |s| &s.connect_timeout,
        get_mut: |s| &mut s.connect_timeout,
    },
    validate: ConfigValidator::any,
};

pub const READ_TIMEOUT: Tunable<Duration> = Tunable {
    key: PropertyKey::ReadTimeout,
    field: Field::Base {
        get: |s| &s.read_timeout,
        get_mut: |s| &mut s.read_timeout,
    },
    validate: ConfigValidator::any,
};

pub const PROXY_URI: Tunable<String> = Tunable {
    key: PropertyKey::ProxyUri,
    field: Field::Base {
        get: |s| &s.proxy_uri,
        get_mut: |s| &mut s.proxy_uri,
    },
    validate: ConfigValidator::any,
};

pub const PROXY_USERNAME: Tunable<String> = Tunable {
    key: PropertyKey::ProxyUsername,
    field: Field::Base {
        get: |s| &s.proxy_username,
        get_mut: |s| &mut s.proxy_username,
    },
    validate: ConfigValidator::any,
};

pub const PROXY_PASSWORD: Tunable<String> = Tunable {
    key: PropertyKey::ProxyPassword,
    field: Field::Base {
        get: |s| &s.proxy_password,
        get_mut: |s| &mut s.proxy_password,
    },
    validate: ConfigValidator::any,
};

pub const FOLLOW_REDIRECTS: Tunable<bool> = Tunable {
    key: PropertyKey::FollowRedirects,
    field: Field::Base {
        get: |s| &s.follow_redirects,
        get_mut: |s| &mut s.follow_redirects,
    },
    validate: ConfigValidator::any,
};

pub const MAX_REDIRECTS: Tunable<u32> = Tunable {
    key: PropertyKey::MaxRedirects,
    field: Field::Base {
        get: |s| &s.max_redirects,
        get_mut: |s| &mut s.max_redirects,
    },
    validate: ConfigValidator::positive,
};

pub const SSL_CONTEXT_SUPPLIER: Tunable<SslContextSupplier> = Tunable {
    key: PropertyKey::SslContextSupplier,
    field: Field::Base {
        get: |s| &s.ssl_context_supplier,
        get_mut: |s| &mut s.ssl_context_supplier,
    },
    validate: ConfigValidator::any,
};

pub const CHUNK_SIZE: Tunable<usize> = Tunable {
    key: PropertyKey::ChunkSize,
    field: Field::Base {
        get: |s| &s.chunk_size,
        get_mut: |s| &mut s.chunk_size,
    },
    validate: ConfigValidator::any,
};

pub const HEADER_SIZE_LIMITS: Tunable<HeaderLimits> = Tunable {
    key: PropertyKey::HeaderSizeLimits,
    field: Field::Base {
        get: |s| &s.header_limits,
        get_mut: |s| &mut s.header_limits,
    },
    validate: ConfigValidator::header_limits,
};

pub const ENTITY_PROCESSING: Tunable<EntityProcessing> = Tunable {
    key: PropertyKey::EntityProcessing,
    field: Field::Base {
        get: |s| &s.entity_processing,
        get_mut: |s| &mut s.entity_processing,
    },
    validate: ConfigValidator::any,
};

pub const EXPECT_CONTINUE_THRESHOLD: Tunable<u64> = Tunable {
    key: PropertyKey::ExpectContinueThreshold,
    field: Field::Base {
        get: |s| &s.expect_continue_threshold,
        get_mut: |s| &mut s.expect_continue_threshold,
    },
    validate: ConfigValidator::any,
};

pub const ALLOW_RESTRICTED_HEADERS: Tunable<bool> = Tunable {
    key: PropertyKey::AllowRestrictedHeaders,
    field: Field::Base {
        get: |s| &s.allow_restricted_headers,
        get_mut: |s| &mut s.allow_restricted_headers,
    },
    validate: ConfigValidator::any,
};

pub const CONNECTION_CONTROLLER: Tunable<SharedConnectionController> = Tunable {
    key: PropertyKey::ConnectionController,
    field: Field::Base {
        get: |s| &s.connection_controller,
        get_mut: |s| &mut s.connection_controller,
    },
    validate: ConfigValidator::any,
};

pub const REDIRECT_CONTROLLER: Tunable<SharedRedirectController> = Tunable {
    key: PropertyKey::RedirectController,
    field: Field::Base {
        get: |s| &s.redirect_controller,
        get_mut: |s| &mut s.redirect_controller,
    },
    validate: ConfigValidator::any,
};

pub const MAX_CONNECTIONS_TOTAL: Tunable<usize> = Tunable {
    key: PropertyKey::MaxConnectionsTotal,
    field: Field::Pool {
        get: |p| &p.max_connections_total,
        get_mut: |p| &mut p.max_connections_total,
    },
    validate: ConfigValidator::positive,
};

pub const MAX_CONNECTIONS_PER_DESTINATION: Tunable<usize> = Tunable {
    key: PropertyKey::MaxConnectionsPerDestination,
    field: Field::Pool {
        get: |p| &p.max_connections_per_destination,
        get_mut: |p| &mut p.max_connections_per_destination,
    },
    validate: ConfigValidator::positive,
};

pub const IDLE_PRUNE_TIMEOUT: Tunable<Duration> = Tunable {
    key: PropertyKey::IdlePruneTimeout,
    field: Field::Pool {
        get: |p| &p.idle_prune_timeout,
        get_mut: |p| &mut p.idle_prune_timeout,
    },
    validate: ConfigValidator::any,
};

pub const HTTP2_UPGRADE: Tunable<Http2Upgrade> = Tunable {
    key: PropertyKey::Http2Upgrade,
    field: Field::Pool {
        get: |p| &p.http2_upgrade,
        get_mut: |p| &mut p.http2_upgrade,
    },
    validate: ConfigValidator::any,
};
