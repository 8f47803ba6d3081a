//! Connector configuration snapshots and their building blocks
//!
//! A snapshot is a set of [`Slot`]s, one per tunable. Snapshots are layered
//! with `set_non_empty`, frozen once a client is built, and read by the
//! resolver for every request.

pub mod defaults;
pub mod environment;
pub mod keys;
pub mod pool;
pub mod slot;
pub mod snapshot;
pub mod store;
pub mod tunables;
pub mod validation;
pub mod value;

pub use defaults::ConfigDefaults;
pub use environment::{EnvironmentProvider, ProcessEnvironment, StaticEnvironment};
pub use keys::{ALLOW_RESTRICTED_HEADERS_ENV, CONNECTOR_CONFIGURATION, PropertyKey};
pub use pool::{NetConnectorConfiguration, PoolSettings};
pub use slot::Slot;
pub use snapshot::{Configuration, ConfigurationObject, ConnectorConfiguration, Settings};
pub use store::PropertyStore;
pub use tunables::Tunable;
pub use validation::{ConfigResult, ConfigValidator, ConfigurationError};
pub use value::{
    EntityProcessing, FromPropertyValue, HeaderLimits, Http2Upgrade, PropertyValue, Shared,
    SharedConnectionController, SharedRedirectController,
};
