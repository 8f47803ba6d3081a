//! Per-request builder
//!
//! Request properties are written under the owning client's prefix so they
//! win over every client-level layer for this request only.

use http::header::{HeaderName, HeaderValue, PROXY_AUTHORIZATION};
use http::Method;
use trellis_client::config::{CONNECTOR_CONFIGURATION, Configuration, PropertyKey, PropertyValue};
use trellis_client::http::ClientRequest;
use trellis_client::{EffectiveSettings, Result};

use crate::client::Client;

/// Builds one [`ClientRequest`] against a [`Client`]
#[derive(Debug)]
pub struct RequestBuilder<'a> {
    client: &'a Client,
    request: Result<ClientRequest>,
}

/// A request with its settings resolved and its headers prepared for the wire
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub request: ClientRequest,
    pub settings: EffectiveSettings,
    /// Key of the connection pool this request draws from
    pub pool_key: String,
    /// `false` when the connection controller wants a fresh connection
    pub reuse_connection: bool,
}

impl<'a> RequestBuilder<'a> {
    pub(crate) fn new(client: &'a Client, method: Method, url: &str) -> Self {
        let request = Client::parse_url(url).map(|url| ClientRequest::new(method, url));
        if let Err(e) = &request {
            log::debug!("Request builder: invalid url {url:?}: {e}");
        }
        Self { client, request }
    }

    fn update(mut self, f: impl FnOnce(&mut ClientRequest) -> Result<()>) -> Self {
        let outcome = match &mut self.request {
            Ok(request) => f(request),
            Err(_) => return self,
        };
        if let Err(e) = outcome {
            self.request = Err(e);
        }
        self
    }

    /// Add a header; an invalid name or value fails the request
    #[must_use]
    pub fn header(self, name: &str, value: &str) -> Self {
        let name = name.to_owned();
        let value = value.to_owned();
        self.update(move |request| {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(trellis_client::error::builder)?;
            let value = HeaderValue::from_str(&value).map_err(trellis_client::error::builder)?;
            request.headers_mut().append(name, value);
            Ok(())
        })
    }

    /// Request-scoped value for a tunable
    #[must_use]
    pub fn property(self, key: PropertyKey, value: impl Into<PropertyValue>) -> Self {
        let key = self.client.key(key);
        let value = value.into();
        self.update(move |request| {
            request.properties_mut().put(key, value);
            Ok(())
        })
    }

    /// Request property under an exact key
    #[must_use]
    pub fn raw_property(self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        let key = key.into();
        let value = value.into();
        self.update(move |request| {
            request.properties_mut().put(key, value);
            Ok(())
        })
    }

    /// Request-level override snapshot, stored under the reserved key with
    /// the override's own prefix
    #[must_use]
    pub fn override_configuration<C: Configuration>(self, config: C) -> Self {
        let key = config.prefixed_key(CONNECTOR_CONFIGURATION);
        self.raw_property(key, config.into_object())
    }

    /// Finish the request
    ///
    /// # Errors
    ///
    /// Returns the first deferred error: an unparseable URL or header.
    pub fn build(self) -> Result<ClientRequest> {
        self.request
    }

    /// Resolve the effective settings without preparing headers
    ///
    /// # Errors
    ///
    /// Returns a deferred builder error or a property type mismatch.
    pub fn settings(self) -> Result<EffectiveSettings> {
        let client = self.client;
        client.settings(&self.build()?)
    }

    /// Resolve settings and apply them to the request headers: restricted
    /// headers are dropped and plain-http requests through an authenticating
    /// HTTP proxy get `Proxy-Authorization`.
    ///
    /// # Errors
    ///
    /// Returns a deferred builder error or a property type mismatch.
    pub fn prepare(self) -> Result<PreparedRequest> {
        let client = self.client;
        let mut request = self.build()?;
        let settings = client.settings(&request)?;

        let dropped = settings.header_filter.apply(request.headers_mut());
        if dropped > 0 {
            log::debug!("Dropped {dropped} restricted headers from {}", request.url());
        }

        if request.url().scheme() == "http"
            && let Some(auth) = settings.proxy.as_ref().and_then(|p| p.authorization())
        {
            request.headers_mut().insert(PROXY_AUTHORIZATION, auth);
        }

        let pool_key = settings.pool_key(&request);
        let reuse_connection = settings.may_reuse(&request);
        Ok(PreparedRequest {
            request,
            settings,
            pool_key,
            reuse_connection,
        })
    }
}
