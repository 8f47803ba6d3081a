//! Lazily invoked TLS context suppliers

use std::fmt;
use std::sync::{Arc, OnceLock};

use rustls::{ClientConfig, RootCertStore};

use super::errors::TlsError;
use crate::config::value::Shared;
use crate::error::{self, Result};

type SupplierFn = dyn Fn() -> Arc<ClientConfig> + Send + Sync;

/// Produces the TLS context a connection should use.
///
/// The supplier is only called once a connection actually needs a socket
/// factory. Suppliers compare equal when they are the same allocation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SslContextSupplier(Shared<SupplierFn>);

impl SslContextSupplier {
    pub fn new<F>(supplier: F) -> Self
    where
        F: Fn() -> Arc<ClientConfig> + Send + Sync + 'static,
    {
        let inner: Arc<SupplierFn> = Arc::new(supplier);
        Self(Shared::new(inner))
    }

    /// Supplier that always hands out the same context
    pub fn fixed(context: Arc<ClientConfig>) -> Self {
        Self::new(move || Arc::clone(&context))
    }

    /// Invoke the supplier
    pub fn get(&self) -> Arc<ClientConfig> {
        (self.0)()
    }
}

impl fmt::Debug for SslContextSupplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SslContextSupplier").field(&self.0).finish()
    }
}

static PLATFORM_DEFAULT: OnceLock<Arc<ClientConfig>> = OnceLock::new();

/// Process-wide default context backed by the webpki root set
///
/// # Errors
///
/// Returns a TLS error if the ring provider rejects the default protocol
/// versions.
pub fn platform_default() -> Result<Arc<ClientConfig>> {
    if let Some(context) = PLATFORM_DEFAULT.get() {
        return Ok(Arc::clone(context));
    }

    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let context = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| error::tls(TlsError::DefaultContext(e)))?
        .with_root_certificates(roots)
        .with_no_client_auth();

    tracing::debug!("Built platform default TLS context");
    Ok(Arc::clone(PLATFORM_DEFAULT.get_or_init(|| Arc::new(context))))
}
