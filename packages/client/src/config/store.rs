//! Property store shared by clients and requests
//!
//! A plain string-keyed map of [`PropertyValue`]s. Typed reads go through
//! [`PropertyStore::get_as`], which is where a stored value of the wrong type
//! is reported.

use std::collections::HashMap;
use std::sync::Arc;

use super::snapshot::ConfigurationObject;
use super::validation::ConfigurationError;
use super::value::{FromPropertyValue, PropertyValue};
use crate::error::{self, Result};

#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    values: HashMap<String, PropertyValue>,
}

impl PropertyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.put(key, value);
        self
    }

    /// Insert or replace a value, returning the previous one
    pub fn put(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Typed read.
    ///
    /// # Errors
    ///
    /// Returns a type-mismatch error when the stored value cannot represent
    /// `T`, and a builder error when it can but the value itself is rejected.
    pub fn get_as<T: FromPropertyValue>(&self, key: &str) -> Result<Option<T>> {
        match self.lookup::<T>(key)? {
            None => Ok(None),
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(reason)) => Err(error::builder(reason).with_key(key)),
        }
    }

    /// Typed read that keeps value rejections separate from type mismatches
    pub(crate) fn lookup<T: FromPropertyValue>(
        &self,
        key: &str,
    ) -> Result<Option<std::result::Result<T, ConfigurationError>>> {
        let Some(value) = self.values.get(key) else {
            return Ok(None);
        };
        match T::from_property(value) {
            Some(converted) => Ok(Some(converted)),
            None => Err(error::type_mismatch(key, T::EXPECTED, value.type_name())),
        }
    }

    /// Read an override configuration object
    ///
    /// # Errors
    ///
    /// Returns a type-mismatch error if the key holds something else.
    pub fn configuration(&self, key: &str) -> Result<Option<Arc<dyn ConfigurationObject>>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(PropertyValue::Configuration(object)) => Ok(Some(Arc::clone(object))),
            Some(other) => Err(error::type_mismatch(
                key,
                "connector configuration",
                other.type_name(),
            )),
        }
    }

    /// Build a store from a flat JSON object.
    ///
    /// Numbers become integers, booleans stay booleans and strings stay
    /// strings. Nested values are rejected.
    ///
    /// # Errors
    ///
    /// Returns a builder error when the input is not an object, a number is
    /// not an integer, or a value is an array, object or null.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| error::builder("property document must be a JSON object"))?;

        let mut store = Self::new();
        for (key, value) in object {
            let converted = match value {
                serde_json::Value::Bool(b) => PropertyValue::Bool(*b),
                serde_json::Value::String(s) => PropertyValue::Str(s.clone()),
                serde_json::Value::Number(n) => n
                    .as_i64()
                    .map(PropertyValue::Int)
                    .ok_or_else(|| error::builder(format!("{n} is not an integer")).with_key(key))?,
                _ => {
                    return Err(error::builder("nested property values are not supported")
                        .with_key(key));
                }
            };
            store.values.insert(key.clone(), converted);
        }
        Ok(store)
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (key, value) in iter {
            store.put(key, value);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_get_as_type_mismatch() {
        let store = PropertyStore::new().with("timeout", true);
        let err = store
            .get_as::<Duration>("timeout")
            .expect_err("bool is not a duration");
        assert!(err.is_type_mismatch());
        assert_eq!(err.key(), Some("timeout"));
    }

    #[test]
    fn test_get_as_rejected_value() {
        let store = PropertyStore::new().with("size", -5);
        let err = store.get_as::<usize>("size").expect_err("negative size");
        assert!(err.is_builder());
        assert!(store.lookup::<usize>("size").expect("types match").is_some());
    }

    #[test]
    fn test_configuration_mismatch() {
        let store = PropertyStore::new().with("cfg", "not a configuration");
        assert!(store.configuration("cfg").expect_err("string").is_type_mismatch());
        assert!(store.configuration("absent").expect("absent is fine").is_none());
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({
            "trellis.client.connectTimeout": 3000,
            "trellis.client.followRedirects": false,
            "trellis.client.proxy.uri": "http://proxy:3128"
        });
        let store = PropertyStore::from_json(&json).expect("flat object should load");
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get_as::<Duration>("trellis.client.connectTimeout").expect("duration"),
            Some(Duration::from_millis(3000))
        );
        assert_eq!(
            store.get_as::<bool>("trellis.client.followRedirects").expect("bool"),
            Some(false)
        );

        let nested = serde_json::json!({ "a": { "b": 1 } });
        assert!(PropertyStore::from_json(&nested).expect_err("nested").is_builder());
        assert!(PropertyStore::from_json(&serde_json::json!(1.5)).is_err());
        assert!(PropertyStore::from_json(&serde_json::json!({ "f": 1.5 })).is_err());
    }
}
