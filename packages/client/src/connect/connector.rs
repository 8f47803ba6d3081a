//! Per-request view of a frozen connector configuration
//!
//! A [`Connector`] never changes after construction. Every accessor resolves
//! one tunable for one request; [`Connector::settings`] resolves all of them in
//! a single pass.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::controller::DefaultConnectionController;
use crate::config::defaults::ConfigDefaults;
use crate::config::pool::NetConnectorConfiguration;
use crate::config::snapshot::Configuration;
use crate::config::tunables;
use crate::config::value::{EntityProcessing, HeaderLimits, Http2Upgrade, SharedConnectionController};
use crate::error::Result;
use crate::http::{ClientRequest, HeaderFilter};
use crate::proxy::{self, ProxyDescriptor};
use crate::redirect::Policy;
use crate::resolver::ResolutionContext;
use crate::tls::{EffectiveTls, SocketFactoryCache};

/// Pool limits in effect for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectivePool {
    pub max_connections_total: usize,
    pub max_connections_per_destination: usize,
    pub idle_prune_timeout: Duration,
}

impl Default for EffectivePool {
    fn default() -> Self {
        Self {
            max_connections_total: ConfigDefaults::MAX_CONNECTIONS_TOTAL,
            max_connections_per_destination: ConfigDefaults::MAX_CONNECTIONS_PER_DESTINATION,
            idle_prune_timeout: ConfigDefaults::IDLE_PRUNE_TIMEOUT,
        }
    }
}

/// Every tunable resolved for one request
#[derive(Debug, Clone)]
pub struct EffectiveSettings {
    /// Zero means the platform default
    pub connect_timeout: Duration,
    /// Zero means the platform default
    pub read_timeout: Duration,
    pub proxy: Option<ProxyDescriptor>,
    pub redirect: Policy,
    pub chunk_size: usize,
    /// `None` leaves framing to the transport
    pub entity_processing: Option<EntityProcessing>,
    pub header_limits: HeaderLimits,
    pub expect_continue_threshold: u64,
    pub header_filter: HeaderFilter,
    pub connection_controller: SharedConnectionController,
    pub pool: EffectivePool,
    pub http2_upgrade: Http2Upgrade,
    pub tls: EffectiveTls,
}

impl EffectiveSettings {
    /// Key under which this request's connection may be pooled
    pub fn pool_key(&self, request: &ClientRequest) -> String {
        self.connection_controller
            .pool_key(request.url(), self.proxy.as_ref())
    }

    /// Whether this request may take an already pooled connection
    pub fn may_reuse(&self, request: &ClientRequest) -> bool {
        self.connection_controller.may_reuse(request.url())
    }
}

/// Transport-side consumer of a client-level configuration
#[derive(Debug, Clone)]
pub struct Connector<C: Configuration = NetConnectorConfiguration> {
    config: Arc<C>,
    sockets: Arc<SocketFactoryCache>,
    default_controller: SharedConnectionController,
}

impl<C: Configuration> Connector<C> {
    /// Wrap `config`, sharing the process-wide socket factory cache
    pub fn new(config: C) -> Self {
        Self::with_socket_factory_cache(config, crate::global_socket_factory_cache())
    }

    /// Share a socket factory cache with other connectors
    pub fn with_socket_factory_cache(config: C, sockets: Arc<SocketFactoryCache>) -> Self {
        debug!(
            "Connector created for prefix {:?}",
            config.settings().prefix()
        );
        Self {
            config: Arc::new(config),
            sockets,
            default_controller: DefaultConnectionController::shared(),
        }
    }

    /// The frozen client-level configuration
    pub fn configuration(&self) -> &C {
        &self.config
    }

    pub fn socket_factory_cache(&self) -> &Arc<SocketFactoryCache> {
        &self.sockets
    }

    fn with_context<T>(
        &self,
        request: &ClientRequest,
        f: impl FnOnce(&ResolutionContext<'_>) -> Result<T>,
    ) -> Result<T> {
        let ctx = ResolutionContext::new(&*self.config, request.properties())?;
        f(&ctx)
    }

    pub fn effective_connect_timeout(&self, request: &ClientRequest) -> Result<Duration> {
        self.with_context(request, |ctx| {
            ctx.resolve_or(&tunables::CONNECT_TIMEOUT, ConfigDefaults::CONNECT_TIMEOUT)
        })
    }

    pub fn effective_read_timeout(&self, request: &ClientRequest) -> Result<Duration> {
        self.with_context(request, |ctx| {
            ctx.resolve_or(&tunables::READ_TIMEOUT, ConfigDefaults::READ_TIMEOUT)
        })
    }

    pub fn effective_proxy(&self, request: &ClientRequest) -> Result<Option<ProxyDescriptor>> {
        self.with_context(request, proxy::resolve_proxy)
    }

    pub fn effective_follow_redirects(&self, request: &ClientRequest) -> Result<bool> {
        self.with_context(request, |ctx| {
            ctx.resolve_or(&tunables::FOLLOW_REDIRECTS, ConfigDefaults::FOLLOW_REDIRECTS)
        })
    }

    pub fn effective_max_redirects(&self, request: &ClientRequest) -> Result<u32> {
        self.with_context(request, |ctx| {
            ctx.resolve_or(&tunables::MAX_REDIRECTS, ConfigDefaults::MAX_REDIRECTS)
        })
    }

    pub fn effective_redirect_policy(&self, request: &ClientRequest) -> Result<Policy> {
        self.with_context(request, redirect_policy)
    }

    pub fn effective_chunk_size(&self, request: &ClientRequest) -> Result<usize> {
        self.with_context(request, |ctx| {
            ctx.resolve_or(&tunables::CHUNK_SIZE, ConfigDefaults::CHUNK_SIZE)
        })
    }

    pub fn effective_entity_processing(
        &self,
        request: &ClientRequest,
    ) -> Result<Option<EntityProcessing>> {
        self.with_context(request, |ctx| ctx.resolve(&tunables::ENTITY_PROCESSING))
    }

    pub fn effective_header_limits(&self, request: &ClientRequest) -> Result<HeaderLimits> {
        self.with_context(request, |ctx| {
            ctx.resolve_or(&tunables::HEADER_SIZE_LIMITS, ConfigDefaults::HEADER_LIMITS)
        })
    }

    pub fn effective_expect_continue_threshold(&self, request: &ClientRequest) -> Result<u64> {
        self.with_context(request, |ctx| {
            ctx.resolve_or(
                &tunables::EXPECT_CONTINUE_THRESHOLD,
                ConfigDefaults::EXPECT_CONTINUE_THRESHOLD,
            )
        })
    }

    pub fn effective_allow_restricted_headers(&self, request: &ClientRequest) -> Result<bool> {
        self.with_context(request, allow_restricted_headers)
    }

    /// Drop restricted headers from `request` unless they are allowed for it.
    ///
    /// Returns how many header names were dropped.
    pub fn filter_headers(&self, request: &mut ClientRequest) -> Result<usize> {
        let allow = self.effective_allow_restricted_headers(request)?;
        Ok(HeaderFilter::new(allow).apply(request.headers_mut()))
    }

    pub fn effective_connection_controller(
        &self,
        request: &ClientRequest,
    ) -> Result<SharedConnectionController> {
        self.with_context(request, |ctx| self.connection_controller(ctx))
    }

    pub fn effective_pool(&self, request: &ClientRequest) -> Result<EffectivePool> {
        self.with_context(request, pool)
    }

    pub fn effective_http2_upgrade(&self, request: &ClientRequest) -> Result<Http2Upgrade> {
        self.with_context(request, |ctx| {
            ctx.resolve_or(&tunables::HTTP2_UPGRADE, ConfigDefaults::HTTP2_UPGRADE)
        })
    }

    /// TLS settings; the supplier is not invoked until a socket factory is
    /// requested
    pub fn effective_tls(&self, request: &ClientRequest) -> Result<EffectiveTls> {
        self.with_context(request, |ctx| self.tls(ctx))
    }

    /// Resolve every tunable for `request`
    ///
    /// # Errors
    ///
    /// Returns a type-mismatch error if a request property holds a value of
    /// the wrong type.
    pub fn settings(&self, request: &ClientRequest) -> Result<EffectiveSettings> {
        self.with_context(request, |ctx| {
            Ok(EffectiveSettings {
                connect_timeout: ctx
                    .resolve_or(&tunables::CONNECT_TIMEOUT, ConfigDefaults::CONNECT_TIMEOUT)?,
                read_timeout: ctx
                    .resolve_or(&tunables::READ_TIMEOUT, ConfigDefaults::READ_TIMEOUT)?,
                proxy: proxy::resolve_proxy(ctx)?,
                redirect: redirect_policy(ctx)?,
                chunk_size: ctx.resolve_or(&tunables::CHUNK_SIZE, ConfigDefaults::CHUNK_SIZE)?,
                entity_processing: ctx.resolve(&tunables::ENTITY_PROCESSING)?,
                header_limits: ctx
                    .resolve_or(&tunables::HEADER_SIZE_LIMITS, ConfigDefaults::HEADER_LIMITS)?,
                expect_continue_threshold: ctx.resolve_or(
                    &tunables::EXPECT_CONTINUE_THRESHOLD,
                    ConfigDefaults::EXPECT_CONTINUE_THRESHOLD,
                )?,
                header_filter: HeaderFilter::new(allow_restricted_headers(ctx)?),
                connection_controller: self.connection_controller(ctx)?,
                pool: pool(ctx)?,
                http2_upgrade: ctx
                    .resolve_or(&tunables::HTTP2_UPGRADE, ConfigDefaults::HTTP2_UPGRADE)?,
                tls: self.tls(ctx)?,
            })
        })
    }

    fn connection_controller(&self, ctx: &ResolutionContext<'_>) -> Result<SharedConnectionController> {
        ctx.resolve_or(&tunables::CONNECTION_CONTROLLER, self.default_controller.clone())
    }

    fn tls(&self, ctx: &ResolutionContext<'_>) -> Result<EffectiveTls> {
        let supplier = ctx.resolve(&tunables::SSL_CONTEXT_SUPPLIER)?;
        Ok(EffectiveTls::new(supplier, Arc::clone(&self.sockets)))
    }
}

fn redirect_policy(ctx: &ResolutionContext<'_>) -> Result<Policy> {
    Ok(Policy::new(
        ctx.resolve_or(&tunables::FOLLOW_REDIRECTS, ConfigDefaults::FOLLOW_REDIRECTS)?,
        ctx.resolve_or(&tunables::MAX_REDIRECTS, ConfigDefaults::MAX_REDIRECTS)?,
        ctx.resolve(&tunables::REDIRECT_CONTROLLER)?,
    ))
}

fn allow_restricted_headers(ctx: &ResolutionContext<'_>) -> Result<bool> {
    ctx.resolve_or(
        &tunables::ALLOW_RESTRICTED_HEADERS,
        ConfigDefaults::ALLOW_RESTRICTED_HEADERS,
    )
}

fn pool(ctx: &ResolutionContext<'_>) -> Result<EffectivePool> {
    let defaults = EffectivePool::default();
    Ok(EffectivePool {
        max_connections_total: ctx
            .resolve_or(&tunables::MAX_CONNECTIONS_TOTAL, defaults.max_connections_total)?,
        max_connections_per_destination: ctx.resolve_or(
            &tunables::MAX_CONNECTIONS_PER_DESTINATION,
            defaults.max_connections_per_destination,
        )?,
        idle_prune_timeout: ctx
            .resolve_or(&tunables::IDLE_PRUNE_TIMEOUT, defaults.idle_prune_timeout)?,
    })
}
