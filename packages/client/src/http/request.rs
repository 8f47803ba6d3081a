//! Outgoing request as seen by the connector

use http::{HeaderMap, Method};

use crate::Url;
use crate::config::store::PropertyStore;
use crate::config::value::PropertyValue;

/// A request in flight: destination, headers and its request-scoped
/// properties. Properties are read during resolution, never written.
#[derive(Debug, Clone)]
pub struct ClientRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    properties: PropertyStore,
}

impl ClientRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            properties: PropertyStore::new(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.put(key, value);
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: PropertyStore) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.properties
    }
}
