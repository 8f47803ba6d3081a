//! TLS-specific error types

/// Reasons a TLS context cannot be produced
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("platform default TLS context could not be built: {0}")]
    DefaultContext(#[from] rustls::Error),
}
