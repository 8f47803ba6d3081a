//! Per-request TLS resolution result

use std::sync::Arc;

use rustls::ClientConfig;
use tokio_rustls::TlsConnector;

use super::cache::SocketFactoryCache;
use super::supplier::{SslContextSupplier, platform_default};
use crate::error::Result;

/// TLS settings resolved for one request.
///
/// Holds the winning supplier without calling it; the context is produced
/// only when a connection asks for a socket factory.
#[derive(Debug, Clone)]
pub struct EffectiveTls {
    supplier: Option<SslContextSupplier>,
    cache: Arc<SocketFactoryCache>,
}

impl EffectiveTls {
    pub(crate) fn new(supplier: Option<SslContextSupplier>, cache: Arc<SocketFactoryCache>) -> Self {
        Self { supplier, cache }
    }

    /// The supplier that won resolution, `None` for the platform default
    pub fn supplier(&self) -> Option<&SslContextSupplier> {
        self.supplier.as_ref()
    }

    /// Invoke the supplier (or build the platform default)
    ///
    /// # Errors
    ///
    /// Returns a TLS error if the platform default context cannot be built.
    pub fn context(&self) -> Result<Arc<ClientConfig>> {
        match &self.supplier {
            Some(supplier) => Ok(supplier.get()),
            None => platform_default(),
        }
    }

    /// Socket factory for this request, shared with every other request that
    /// resolved to the same context
    ///
    /// # Errors
    ///
    /// Returns a TLS error if the platform default context cannot be built.
    pub fn socket_factory(&self) -> Result<Arc<TlsConnector>> {
        let context = self.context()?;
        Ok(self.cache.socket_factory(&context))
    }
}
