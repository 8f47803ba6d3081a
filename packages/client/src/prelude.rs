//! Types most callers need

pub use crate::builder::ConnectorBuilder;
pub use crate::config::{
    Configuration, ConfigurationObject, ConnectorConfiguration, EntityProcessing,
    EnvironmentProvider, HeaderLimits, Http2Upgrade, NetConnectorConfiguration,
    ProcessEnvironment, PropertyKey, PropertyStore, PropertyValue, StaticEnvironment,
    CONNECTOR_CONFIGURATION,
};
pub use crate::connect::{
    ConnectionController, Connector, DefaultConnectionController, EffectivePool,
    EffectiveSettings,
};
pub use crate::error::{Error, Result};
pub use crate::http::{ClientRequest, HeaderFilter};
pub use crate::proxy::{ProxyDescriptor, ProxyScheme};
pub use crate::redirect::{Policy, RedirectController};
pub use crate::tls::{EffectiveTls, SslContextSupplier};

pub use ::http::{HeaderMap, HeaderValue, Method, StatusCode};
pub use url::Url;
