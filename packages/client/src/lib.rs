//! # Trellis Client
//!
//! Layered connector configuration for HTTP clients.
//!
//! Every transport tunable (timeouts, proxy, redirects, chunking, header
//! limits, pooling, TLS) lives in a [`Slot`](config::Slot) of a configuration
//! snapshot. Snapshots are layered client-side once, at construction, and
//! resolved per request against the request's own properties:
//!
//! 1. a request property under the client's prefixed key,
//! 2. a request-level override snapshot under the reserved key,
//! 3. the client-level snapshot (client properties, client override,
//!    builder values),
//! 4. library defaults.
//!
//! ## Usage
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use trellis_client::prelude::*;
//!
//! fn main() -> trellis_client::Result<()> {
//!     let connector = ConnectorBuilder::<NetConnectorConfiguration>::new()
//!         .connect_timeout(Duration::from_secs(2))
//!         .chunk_size(8192)?
//!         .build(&PropertyStore::new(), &ProcessEnvironment)?;
//!
//!     let request = ClientRequest::get(Url::parse("https://example.com/").map_err(trellis_client::error::builder)?)
//!         .with_property(PropertyKey::ReadTimeout.as_str(), 500);
//!
//!     let settings = connector.settings(&request)?;
//!     assert_eq!(settings.read_timeout, Duration::from_millis(500));
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

use std::sync::{Arc, OnceLock};

pub mod builder;
pub mod config;
pub mod connect;
pub mod error;
pub mod http;
pub mod proxy;
pub mod redirect;
pub mod resolver;
pub mod tls;

pub mod prelude;

pub use builder::ConnectorBuilder;
pub use connect::{Connector, EffectivePool, EffectiveSettings};
pub use error::{Error, Result};
pub use url::Url;

static GLOBAL_SOCKET_FACTORIES: OnceLock<Arc<tls::SocketFactoryCache>> = OnceLock::new();

/// Process-wide socket factory cache.
///
/// Connectors created with [`Connector::new`] share it, so two clients that
/// resolve the same TLS context reuse one factory.
pub fn global_socket_factory_cache() -> Arc<tls::SocketFactoryCache> {
    GLOBAL_SOCKET_FACTORIES
        .get_or_init(|| Arc::new(tls::SocketFactoryCache::new()))
        .clone()
}
