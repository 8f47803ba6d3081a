//! Trellis public API
//!
//! A thin client facade over `trellis_client`: build a [`Client`] once from
//! connector defaults and client properties, then resolve the effective
//! transport settings for each request.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use trellis::{PropertyKey, Trellis};
//!
//! fn main() -> trellis::Result<()> {
//!     let client = Trellis::builder()
//!         .connect_timeout(Duration::from_secs(1))
//!         .property(PropertyKey::MaxRedirects, 3)
//!         .build()?;
//!
//!     let settings = client
//!         .get("https://example.com/")
//!         .property(PropertyKey::FollowRedirects, false)
//!         .settings()?;
//!     assert!(!settings.redirect.follow_redirects());
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod client;
pub mod request;

pub use client::{Client, ClientBuilder};
pub use request::{PreparedRequest, RequestBuilder};

pub use trellis_client::config::{
    Configuration, ConnectorConfiguration, EntityProcessing, HeaderLimits, Http2Upgrade,
    NetConnectorConfiguration, ProcessEnvironment, PropertyKey, PropertyStore, PropertyValue,
    StaticEnvironment,
};
pub use trellis_client::tls::SslContextSupplier;
pub use trellis_client::{
    ConnectorBuilder, EffectivePool, EffectiveSettings, Error, Result, Url,
};

/// Main entry point
pub struct Trellis;

impl Trellis {
    /// Start configuring a client
    ///
    /// Shorthand for `ClientBuilder::new()`
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}
