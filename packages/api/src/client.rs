//! `Client` and `ClientBuilder`
//!
//! Setter failures are deferred: the first one is kept and returned from
//! [`ClientBuilder::build`], so chains never need `?` in the middle.

use std::sync::Arc;
use std::time::Duration;

use trellis_client::config::{
    CONNECTOR_CONFIGURATION, Configuration, ConfigurationObject, EnvironmentProvider,
    NetConnectorConfiguration, ProcessEnvironment, PropertyKey, PropertyStore, PropertyValue,
};
use trellis_client::http::ClientRequest;
use trellis_client::tls::SslContextSupplier;
use trellis_client::{Connector, ConnectorBuilder, EffectiveSettings, Error, Result, Url};

use crate::request::RequestBuilder;

/// Collects connector defaults and client properties
pub struct ClientBuilder {
    connector: ConnectorBuilder<NetConnectorConfiguration>,
    scalars: Vec<(PropertyKey, PropertyValue)>,
    properties: PropertyStore,
    env: Arc<dyn EnvironmentProvider>,
    error: Option<Error>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("connector", &self.connector)
            .field("properties", &self.properties.len())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: ConnectorBuilder::new(),
            scalars: Vec::new(),
            properties: PropertyStore::new(),
            env: Arc::new(ProcessEnvironment),
            error: None,
        }
    }

    fn record(&mut self, err: Error) {
        log::warn!("Client builder: {err}");
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Apply fallible connector settings in one step
    ///
    /// # Examples
    /// ```no_run
    /// use trellis::Trellis;
    ///
    /// let client = Trellis::builder()
    ///     .configure(|c| c.chunk_size(16 * 1024)?.max_connections_total(32))
    ///     .build();
    /// ```
    #[must_use]
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(
            ConnectorBuilder<NetConnectorConfiguration>,
        ) -> Result<ConnectorBuilder<NetConnectorConfiguration>>,
    {
        match f(self.connector.clone()) {
            Ok(connector) => self.connector = connector,
            Err(e) => self.record(e),
        }
        self
    }

    /// Namespace this client's property keys
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.connector = self.connector.prefix(prefix);
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connector = self.connector.connect_timeout(timeout);
        self
    }

    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.connector = self.connector.read_timeout(timeout);
        self
    }

    #[must_use]
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.connector = self.connector.follow_redirects(follow);
        self
    }

    /// Redirect hop limit; zero is rejected when the client is built
    #[must_use]
    pub fn max_redirects(self, max: u32) -> Self {
        self.configure(move |c| c.max_redirects(max))
    }

    /// Proxy URI, `DIRECT` for none
    #[must_use]
    pub fn proxy(self, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        self.configure(move |c| c.proxy_uri(uri))
    }

    #[must_use]
    pub fn ssl_context_supplier(mut self, supplier: SslContextSupplier) -> Self {
        self.connector = self.connector.ssl_context_supplier(supplier);
        self
    }

    /// Client property for a tunable, stored under the client's prefix
    #[must_use]
    pub fn property(mut self, key: PropertyKey, value: impl Into<PropertyValue>) -> Self {
        self.scalars.push((key, value.into()));
        self
    }

    /// Client property under an exact key
    #[must_use]
    pub fn raw_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.put(key, value);
        self
    }

    /// Client-level override snapshot.
    ///
    /// Stored under the reserved key prefixed with the override's own prefix;
    /// it only takes effect if that prefix matches the client's.
    #[must_use]
    pub fn override_configuration<C: Configuration>(mut self, config: C) -> Self {
        let key = config.prefixed_key(CONNECTOR_CONFIGURATION);
        self.properties.put(key, config.into_object());
        self
    }

    /// Merge client properties from a flat JSON object
    #[must_use]
    pub fn properties_json(mut self, json: &serde_json::Value) -> Self {
        match PropertyStore::from_json(json) {
            Ok(store) => {
                for (key, value) in store.iter() {
                    self.properties.put(key, value.clone());
                }
            }
            Err(e) => self.record(e),
        }
        self
    }

    /// Source of process-level defaults, the real environment by default
    #[must_use]
    pub fn environment(mut self, env: impl EnvironmentProvider + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Freeze the client-level configuration
    ///
    /// # Errors
    ///
    /// Returns the first deferred setter error, or a type-mismatch error if a
    /// client property holds a value of the wrong type.
    pub fn build(self) -> Result<Client> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut properties = self.properties;
        let settings = self.connector.configuration().settings();
        for (key, value) in self.scalars {
            properties.put(settings.prefixed_key(key.as_str()), value);
        }

        let config = self.connector.from_client(&properties, self.env.as_ref())?;
        log::debug!(
            "Client built with prefix {:?} and {} properties",
            config.prefix(),
            properties.len()
        );

        Ok(Client {
            connector: Connector::new(config),
            properties: Arc::new(properties),
        })
    }
}

/// A configured client; cheap to clone and safe to share
#[derive(Debug, Clone)]
pub struct Client {
    connector: Connector<NetConnectorConfiguration>,
    properties: Arc<PropertyStore>,
}

impl Client {
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn connector(&self) -> &Connector<NetConnectorConfiguration> {
        &self.connector
    }

    /// The client properties the configuration was layered from
    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    /// Request-scoped key for `key` under this client's prefix
    pub fn key(&self, key: PropertyKey) -> String {
        self.connector.configuration().prefixed_key(key.as_str())
    }

    /// Start a request with an explicit method
    pub fn request(&self, method: http::Method, url: &str) -> RequestBuilder<'_> {
        RequestBuilder::new(self, method, url)
    }

    pub fn get(&self, url: &str) -> RequestBuilder<'_> {
        self.request(http::Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder<'_> {
        self.request(http::Method::POST, url)
    }

    /// Resolve every tunable for an already built request
    ///
    /// # Errors
    ///
    /// Returns a type-mismatch error if a request property holds a value of
    /// the wrong type.
    pub fn settings(&self, request: &ClientRequest) -> Result<EffectiveSettings> {
        self.connector.settings(request)
    }

    pub(crate) fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url).map_err(trellis_client::error::builder)
    }
}
