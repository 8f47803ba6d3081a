//! TLS context resolution
//!
//! Suppliers are resolved like any other tunable but invoked lazily, and the
//! socket factories derived from their contexts are cached by context identity.

pub mod cache;
pub mod effective;
pub mod errors;
pub mod supplier;

pub use cache::{SocketFactoryCache, SocketFactoryCacheStats};
pub use effective::EffectiveTls;
pub use errors::TlsError;
pub use supplier::{SslContextSupplier, platform_default};

#[cfg(test)]
pub(crate) fn test_context() -> std::sync::Arc<rustls::ClientConfig> {
    let provider = std::sync::Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .expect("ring supports the default protocol versions")
        .with_root_certificates(rustls::RootCertStore::empty())
        .with_no_client_auth();
    std::sync::Arc::new(config)
}
