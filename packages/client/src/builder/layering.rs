//! Client-level layering
//!
//! Builds the configuration a client freezes at construction. Highest first:
//! client scalar properties, the client override object, builder values,
//! then library defaults from `init()`.

use tracing::debug;

use super::ConnectorBuilder;
use crate::config::environment::EnvironmentProvider;
use crate::config::snapshot::Configuration;
use crate::config::store::PropertyStore;
use crate::config::tunables;
use crate::connect::Connector;
use crate::error::Result;
use crate::resolver::{apply_property, find_override};

impl<C: Configuration> ConnectorBuilder<C> {
    /// Resolve the client-level configuration against the client's
    /// properties and freeze it with defaults applied.
    ///
    /// Invalid property values are logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns a type-mismatch error if a client property holds a value of
    /// the wrong type.
    pub fn from_client(
        &self,
        client: &PropertyStore,
        env: &dyn EnvironmentProvider,
    ) -> Result<C> {
        let mut config = self.rw();

        if let Some(object) = find_override(&config, client)? {
            debug!(
                "Layering client connector configuration for prefix {:?}",
                object.prefix()
            );
            config.merge_object(&*object);
        }

        apply_client_properties(&mut config, client)?;
        config.init(env);
        Ok(config)
    }

    /// [`from_client`](Self::from_client) wrapped in a ready [`Connector`]
    ///
    /// # Errors
    ///
    /// Same as [`from_client`](Self::from_client).
    pub fn build(&self, client: &PropertyStore, env: &dyn EnvironmentProvider) -> Result<Connector<C>> {
        Ok(Connector::new(self.from_client(client, env)?))
    }
}

fn apply_client_properties<C: Configuration>(config: &mut C, store: &PropertyStore) -> Result<()> {
    apply_property(config, store, &tunables::CONNECT_TIMEOUT)?;
    apply_property(config, store, &tunables::READ_TIMEOUT)?;
    apply_property(config, store, &tunables::PROXY_URI)?;
    apply_property(config, store, &tunables::PROXY_USERNAME)?;
    apply_property(config, store, &tunables::PROXY_PASSWORD)?;
    apply_property(config, store, &tunables::FOLLOW_REDIRECTS)?;
    apply_property(config, store, &tunables::MAX_REDIRECTS)?;
    apply_property(config, store, &tunables::SSL_CONTEXT_SUPPLIER)?;
    apply_property(config, store, &tunables::CHUNK_SIZE)?;
    apply_property(config, store, &tunables::HEADER_SIZE_LIMITS)?;
    apply_property(config, store, &tunables::ENTITY_PROCESSING)?;
    apply_property(config, store, &tunables::EXPECT_CONTINUE_THRESHOLD)?;
    apply_property(config, store, &tunables::ALLOW_RESTRICTED_HEADERS)?;
    apply_property(config, store, &tunables::CONNECTION_CONTROLLER)?;
    apply_property(config, store, &tunables::REDIRECT_CONTROLLER)?;
    apply_property(config, store, &tunables::MAX_CONNECTIONS_TOTAL)?;
    apply_property(config, store, &tunables::MAX_CONNECTIONS_PER_DESTINATION)?;
    apply_property(config, store, &tunables::IDLE_PRUNE_TIMEOUT)?;
    apply_property(config, store, &tunables::HTTP2_UPGRADE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::environment::StaticEnvironment;
    use crate::config::keys::{CONNECTOR_CONFIGURATION, PropertyKey};
    use crate::config::pool::NetConnectorConfiguration;
    use crate::config::snapshot::{ConfigurationObject, ConnectorConfiguration};

    fn env() -> StaticEnvironment {
        StaticEnvironment::new()
    }

    #[test]
    fn test_four_layer_connect_timeout() {
        let builder = ConnectorBuilder::<ConnectorConfiguration>::new()
            .connect_timeout(Duration::from_millis(1000));

        let mut override_config = ConnectorConfiguration::new();
        override_config
            .settings_mut()
            .connect_timeout
            .set(Duration::from_millis(2000));

        let client = PropertyStore::new()
            .with(PropertyKey::ConnectTimeout.as_str(), 3000)
            .with(CONNECTOR_CONFIGURATION, override_config.into_object());

        let config = builder.from_client(&client, &env()).expect("layers");
        assert_eq!(
            config.settings().connect_timeout.value(),
            Some(Duration::from_millis(3000))
        );
    }

    #[test]
    fn test_override_beats_builder() {
        let builder = ConnectorBuilder::<ConnectorConfiguration>::new()
            .connect_timeout(Duration::from_millis(1000))
            .follow_redirects(false);

        let mut override_config = ConnectorConfiguration::new();
        override_config
            .settings_mut()
            .connect_timeout
            .set(Duration::from_millis(2000));

        let client = PropertyStore::new().with(CONNECTOR_CONFIGURATION, override_config.into_object());
        let config = builder.from_client(&client, &env()).expect("layers");

        assert_eq!(
            config.settings().connect_timeout.value(),
            Some(Duration::from_millis(2000))
        );
        assert_eq!(config.settings().follow_redirects.value(), Some(false));
    }

    #[test]
    fn test_invalid_client_chunk_size_keeps_default() {
        let client = PropertyStore::new().with(PropertyKey::ChunkSize.as_str(), -5);
        let config = ConnectorBuilder::<ConnectorConfiguration>::new()
            .from_client(&client, &env())
            .expect("layers");
        assert_eq!(config.settings().chunk_size.value(), Some(4096));
    }

    #[test]
    fn test_zero_client_max_redirects_keeps_default() {
        let client = PropertyStore::new().with(PropertyKey::MaxRedirects.as_str(), 0);
        let config = ConnectorBuilder::<ConnectorConfiguration>::new()
            .from_client(&client, &env())
            .expect("layers");
        assert_eq!(config.settings().max_redirects.value(), Some(5));
    }

    #[test]
    fn test_unreadable_client_strings_are_skipped() {
        let client = PropertyStore::new()
            .with(PropertyKey::FollowRedirects.as_str(), "yes")
            .with(PropertyKey::ChunkSize.as_str(), "abc");
        let config = ConnectorBuilder::<ConnectorConfiguration>::new()
            .follow_redirects(false)
            .from_client(&client, &env())
            .expect("bad strings are not type errors");
        assert_eq!(config.settings().follow_redirects.value(), Some(false));
        assert_eq!(config.settings().chunk_size.value(), Some(4096));
    }

    #[test]
    fn test_prefixed_client_ignores_unprefixed_properties() {
        let client = PropertyStore::new()
            .with(PropertyKey::MaxRedirects.as_str(), 9)
            .with(format!("a.{}", PropertyKey::MaxRedirects), 2);

        let config = ConnectorBuilder::<ConnectorConfiguration>::new()
            .prefix("a.")
            .from_client(&client, &env())
            .expect("layers");
        assert_eq!(config.settings().max_redirects.value(), Some(2));
    }

    #[test]
    fn test_pool_properties_reach_pooled_variant() {
        let client = PropertyStore::new()
            .with(PropertyKey::MaxConnectionsPerDestination.as_str(), 12)
            .with(PropertyKey::Http2Upgrade.as_str(), "PRIOR_KNOWLEDGE");

        let config = ConnectorBuilder::<NetConnectorConfiguration>::new()
            .from_client(&client, &env())
            .expect("layers");
        let pool = config.pool_settings();
        assert_eq!(pool.max_connections_per_destination.value(), Some(12));
        assert_eq!(pool.max_connections_total.value(), Some(60));
        assert_eq!(
            pool.http2_upgrade.value(),
            Some(crate::config::value::Http2Upgrade::PriorKnowledge)
        );
    }

    #[test]
    fn test_builder_is_not_mutated() {
        let builder = ConnectorBuilder::<ConnectorConfiguration>::new();
        let client = PropertyStore::new().with(PropertyKey::ChunkSize.as_str(), 100);
        let _ = builder.from_client(&client, &env()).expect("layers");
        assert!(!builder.configuration().settings().chunk_size.is_set());
    }
}
