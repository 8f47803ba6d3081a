//! Effective-value resolution
//!
//! For every outgoing request a tunable is resolved from, highest first:
//!
//! 1. a request property under the client's prefixed key,
//! 2. the request-level override object under the prefixed reserved key,
//!    provided its own prefix matches the client's,
//! 3. the client-level configuration (itself layered at construction time),
//! 4. the hard-coded default already applied by `init()`.
//!
//! Resolution never mutates either input.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::keys::CONNECTOR_CONFIGURATION;
use crate::config::snapshot::{Configuration, ConfigurationObject};
use crate::config::store::PropertyStore;
use crate::config::tunables::Tunable;
use crate::config::value::FromPropertyValue;
use crate::error::Result;

/// The inputs of one resolution pass
pub struct ResolutionContext<'a> {
    client: &'a dyn ConfigurationObject,
    request: &'a PropertyStore,
    request_override: Option<Arc<dyn ConfigurationObject>>,
}

impl<'a> ResolutionContext<'a> {
    /// Bind a client-level configuration to one request's properties.
    ///
    /// # Errors
    ///
    /// Returns a type-mismatch error if the reserved override key holds
    /// something other than a configuration object.
    pub fn new(client: &'a dyn ConfigurationObject, request: &'a PropertyStore) -> Result<Self> {
        let request_override = find_override(client, request)?;
        Ok(Self {
            client,
            request,
            request_override,
        })
    }

    /// The request-level override accepted for this pass, if any
    pub fn request_override(&self) -> Option<&dyn ConfigurationObject> {
        self.request_override.as_deref()
    }

    /// Effective value of `tunable`, `None` if no layer defines one.
    ///
    /// # Errors
    ///
    /// Propagates type mismatches from the request property store.
    pub fn resolve<T>(&self, tunable: &Tunable<T>) -> Result<Option<T>>
    where
        T: FromPropertyValue + Clone,
    {
        let key = self.client.prefixed_key(tunable.key.as_str());

        match self.request.lookup::<T>(&key)? {
            Some(Ok(value)) => match (tunable.validate)(&value) {
                Ok(()) => return Ok(Some(value)),
                Err(reason) => {
                    warn!("Ignoring request property {}: {}", key, reason);
                }
            },
            Some(Err(reason)) => {
                warn!("Ignoring request property {}: {}", key, reason);
            }
            None => {}
        }

        if let Some(slot) = self
            .request_override
            .as_deref()
            .and_then(|object| tunable.slot(object))
            && slot.is_set()
        {
            return Ok(slot.value());
        }

        Ok(tunable.slot(self.client).and_then(|slot| slot.value()))
    }

    /// Like [`resolve`](Self::resolve) but never returns `None` when a
    /// default exists.
    ///
    /// # Errors
    ///
    /// Propagates type mismatches from the request property store.
    pub fn resolve_or<T>(&self, tunable: &Tunable<T>, fallback: T) -> Result<T>
    where
        T: FromPropertyValue + Clone,
    {
        Ok(self.resolve(tunable)?.unwrap_or(fallback))
    }
}

/// One-shot form of [`ResolutionContext::resolve`].
///
/// # Errors
///
/// Propagates type mismatches from the request property store.
pub fn resolve_scalar<T>(
    client: &dyn ConfigurationObject,
    request: &PropertyStore,
    tunable: &Tunable<T>,
) -> Result<Option<T>>
where
    T: FromPropertyValue + Clone,
{
    ResolutionContext::new(client, request)?.resolve(tunable)
}

/// Look up the override object visible to `owner`.
///
/// The object is looked up under `owner`'s prefixed reserved key and accepted
/// only if its own prefix is the same. An override built for another prefix
/// is ignored so isolated configurations sharing a store never see each
/// other's overrides.
pub(crate) fn find_override(
    owner: &dyn ConfigurationObject,
    store: &PropertyStore,
) -> Result<Option<Arc<dyn ConfigurationObject>>> {
    let key = owner.prefixed_key(CONNECTOR_CONFIGURATION);
    let Some(object) = store.configuration(&key)? else {
        return Ok(None);
    };

    if object.prefix() == owner.prefix() {
        Ok(Some(object))
    } else {
        debug!(
            "Skipping connector configuration under {} bound to prefix {:?}",
            key,
            object.prefix()
        );
        Ok(None)
    }
}

/// Write a client-level scalar property into `config` if present and valid.
///
/// Invalid values are logged and the slot keeps whatever it held.
///
/// # Errors
///
/// Propagates type mismatches from `store`.
pub(crate) fn apply_property<C, T>(
    config: &mut C,
    store: &PropertyStore,
    tunable: &Tunable<T>,
) -> Result<()>
where
    C: Configuration,
    T: FromPropertyValue + Clone,
{
    let key = config.prefixed_key(tunable.key.as_str());
    let value = match store.lookup::<T>(&key)? {
        None => return Ok(()),
        Some(Err(reason)) => {
            warn!("Ignoring client property {}: {}", key, reason);
            return Ok(());
        }
        Some(Ok(value)) => value,
    };

    if let Err(reason) = (tunable.validate)(&value) {
        warn!("Ignoring client property {}: {}", key, reason);
        return Ok(());
    }

    match tunable.slot_mut(config) {
        Some(slot) => slot.set(value),
        None => debug!("Client property {} has no slot in this connector variant", key),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::environment::StaticEnvironment;
    use crate::config::keys::PropertyKey;
    use crate::config::pool::NetConnectorConfiguration;
    use crate::config::snapshot::ConnectorConfiguration;
    use crate::config::tunables;

    fn client(prefix: Option<&str>) -> NetConnectorConfiguration {
        let mut config = NetConnectorConfiguration::new();
        if let Some(prefix) = prefix {
            config = config.with_prefix(prefix);
        }
        config
            .settings_mut()
            .connect_timeout
            .set(Duration::from_millis(1000));
        config.init(&StaticEnvironment::new());
        config
    }

    fn override_with_timeout(prefix: Option<&str>, millis: u64) -> Arc<dyn ConfigurationObject> {
        let mut config = ConnectorConfiguration::new();
        if let Some(prefix) = prefix {
            config = config.with_prefix(prefix);
        }
        config
            .settings_mut()
            .connect_timeout
            .set(Duration::from_millis(millis));
        config.into_object()
    }

    #[test]
    fn test_request_property_beats_everything() {
        let client = client(None);
        let request = PropertyStore::new()
            .with(PropertyKey::ConnectTimeout.as_str(), 3000)
            .with(CONNECTOR_CONFIGURATION, override_with_timeout(None, 2000));

        let resolved = resolve_scalar(&client, &request, &tunables::CONNECT_TIMEOUT)
            .expect("types match");
        assert_eq!(resolved, Some(Duration::from_millis(3000)));
    }

    #[test]
    fn test_override_beats_client() {
        let client = client(None);
        let request =
            PropertyStore::new().with(CONNECTOR_CONFIGURATION, override_with_timeout(None, 2000));

        let ctx = ResolutionContext::new(&client, &request).expect("override has right type");
        assert!(ctx.request_override().is_some());
        assert_eq!(
            ctx.resolve(&tunables::CONNECT_TIMEOUT).expect("types match"),
            Some(Duration::from_millis(2000))
        );
        // unset in the override, so the client value shows through
        assert_eq!(
            ctx.resolve(&tunables::CHUNK_SIZE).expect("types match"),
            Some(4096)
        );
    }

    #[test]
    fn test_override_with_other_prefix_is_ignored() {
        let client = client(None);
        let request = PropertyStore::new()
            .with(CONNECTOR_CONFIGURATION, override_with_timeout(Some("test."), 2000));

        let ctx = ResolutionContext::new(&client, &request).expect("override has right type");
        assert!(ctx.request_override().is_none());
        assert_eq!(
            ctx.resolve(&tunables::CONNECT_TIMEOUT).expect("types match"),
            Some(Duration::from_millis(1000))
        );
    }

    #[test]
    fn test_prefixed_override_under_unprefixed_client_key_is_not_found() {
        let client = client(None);
        let request = PropertyStore::new().with(
            format!("test.{CONNECTOR_CONFIGURATION}"),
            override_with_timeout(Some("test."), 2000),
        );

        let resolved = resolve_scalar(&client, &request, &tunables::CONNECT_TIMEOUT)
            .expect("types match");
        assert_eq!(resolved, Some(Duration::from_millis(1000)));
    }

    #[test]
    fn test_prefixed_client_only_sees_prefixed_keys() {
        let client = client(Some("test."));
        let request = PropertyStore::new()
            .with(PropertyKey::ConnectTimeout.as_str(), 9000)
            .with(
                format!("test.{CONNECTOR_CONFIGURATION}"),
                override_with_timeout(Some("test."), 2000),
            );

        assert_eq!(
            resolve_scalar(&client, &request, &tunables::CONNECT_TIMEOUT).expect("types match"),
            Some(Duration::from_millis(2000))
        );

        let request = request.with(format!("test.{}", PropertyKey::ConnectTimeout), 4000);
        assert_eq!(
            resolve_scalar(&client, &request, &tunables::CONNECT_TIMEOUT).expect("types match"),
            Some(Duration::from_millis(4000))
        );
    }

    #[test]
    fn test_invalid_request_value_falls_through() {
        let client = client(None);
        let request = PropertyStore::new().with(PropertyKey::ChunkSize.as_str(), -5);

        assert_eq!(
            resolve_scalar(&client, &request, &tunables::CHUNK_SIZE).expect("types match"),
            Some(4096)
        );

        let request = PropertyStore::new().with(PropertyKey::MaxConnectionsTotal.as_str(), 0);
        assert_eq!(
            resolve_scalar(&client, &request, &tunables::MAX_CONNECTIONS_TOTAL)
                .expect("types match"),
            Some(60)
        );

        let request = PropertyStore::new().with(PropertyKey::MaxRedirects.as_str(), 0);
        assert_eq!(
            resolve_scalar(&client, &request, &tunables::MAX_REDIRECTS).expect("types match"),
            Some(5)
        );
    }

    #[test]
    fn test_unreadable_string_falls_through() {
        let client = client(None);
        let request = PropertyStore::new()
            .with(PropertyKey::FollowRedirects.as_str(), "yes")
            .with(PropertyKey::ChunkSize.as_str(), "abc")
            .with(PropertyKey::ConnectTimeout.as_str(), "soon");

        let ctx = ResolutionContext::new(&client, &request).expect("no override");
        assert_eq!(
            ctx.resolve(&tunables::FOLLOW_REDIRECTS).expect("string is a bool coercion"),
            Some(true)
        );
        assert_eq!(
            ctx.resolve(&tunables::CHUNK_SIZE).expect("string is an integer coercion"),
            Some(4096)
        );
        assert_eq!(
            ctx.resolve(&tunables::CONNECT_TIMEOUT).expect("string is a duration coercion"),
            Some(Duration::from_millis(1000))
        );
    }

    #[test]
    fn test_type_mismatch_propagates() {
        let client = client(None);
        let request = PropertyStore::new().with(PropertyKey::FollowRedirects.as_str(), 12);
        let err = resolve_scalar(&client, &request, &tunables::FOLLOW_REDIRECTS)
            .expect_err("integer is not a bool");
        assert!(err.is_type_mismatch());

        let request = PropertyStore::new().with(CONNECTOR_CONFIGURATION, "nope");
        assert!(ResolutionContext::new(&client, &request).is_err());
    }

    #[test]
    fn test_pool_slot_missing_from_base_override() {
        let client = client(None);
        let request =
            PropertyStore::new().with(CONNECTOR_CONFIGURATION, override_with_timeout(None, 10));

        assert_eq!(
            resolve_scalar(&client, &request, &tunables::MAX_CONNECTIONS_PER_DESTINATION)
                .expect("types match"),
            Some(5)
        );
    }

    #[test]
    fn test_explicitly_cleared_override_slot_hides_client_value() {
        let mut client = client(None);
        client
            .settings_mut()
            .proxy_uri
            .set("http://proxy:3128".to_string());

        let mut cleared = ConnectorConfiguration::new();
        cleared.settings_mut().proxy_uri.set_empty();
        let request = PropertyStore::new().with(CONNECTOR_CONFIGURATION, cleared.into_object());

        assert_eq!(
            resolve_scalar(&client, &request, &tunables::PROXY_URI).expect("types match"),
            None
        );
    }
}
