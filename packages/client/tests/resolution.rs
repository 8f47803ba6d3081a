//! End-to-end resolution scenarios
//!
//! Each test builds a connector the way a client would and resolves one or
//! more requests against it.

use std::time::Duration;

use trellis_client::config::{
    CONNECTOR_CONFIGURATION, Configuration, ConfigurationObject, ConnectorConfiguration,
    NetConnectorConfiguration, PropertyKey, PropertyStore, StaticEnvironment,
};
use trellis_client::http::ClientRequest;
use trellis_client::{ConnectorBuilder, Url};

fn request() -> ClientRequest {
    ClientRequest::get(Url::parse("http://service.internal/api").expect("test url"))
}

#[test]
fn test_connect_timeout_four_layers() {
    let builder = ConnectorBuilder::<NetConnectorConfiguration>::new()
        .connect_timeout(Duration::from_millis(1000));

    let mut client_override = NetConnectorConfiguration::new();
    client_override
        .settings_mut()
        .connect_timeout
        .set(Duration::from_millis(2000));

    let client = PropertyStore::new()
        .with(PropertyKey::ConnectTimeout.as_str(), 3000)
        .with(CONNECTOR_CONFIGURATION, client_override.into_object());

    let connector = builder
        .build(&client, &StaticEnvironment::new())
        .expect("client configuration should layer");

    let timeout = connector
        .effective_connect_timeout(&request())
        .expect("connect timeout should resolve");
    assert_eq!(timeout, Duration::from_millis(3000));
}

#[test]
fn test_request_scalar_beats_everything() {
    let connector = ConnectorBuilder::<NetConnectorConfiguration>::new()
        .connect_timeout(Duration::from_millis(1000))
        .build(&PropertyStore::new(), &StaticEnvironment::new())
        .expect("client configuration should layer");

    let mut request_override = ConnectorConfiguration::new();
    request_override
        .settings_mut()
        .connect_timeout
        .set(Duration::from_millis(2000));

    let req = request()
        .with_property(PropertyKey::ConnectTimeout.as_str(), Duration::from_millis(10))
        .with_property(CONNECTOR_CONFIGURATION, request_override.into_object());

    assert_eq!(
        connector.effective_connect_timeout(&req).expect("resolves"),
        Duration::from_millis(10)
    );
}

#[test]
fn test_direct_proxy_is_no_proxy() {
    let client = PropertyStore::new()
        .with(PropertyKey::ProxyUri.as_str(), "DIRECT")
        .with(PropertyKey::ProxyUsername.as_str(), "user")
        .with(PropertyKey::ProxyPassword.as_str(), "secret");

    let connector = ConnectorBuilder::<NetConnectorConfiguration>::new()
        .build(&client, &StaticEnvironment::new())
        .expect("client configuration should layer");

    assert_eq!(connector.effective_proxy(&request()).expect("resolves"), None);
}

#[test]
fn test_request_swaps_proxy_host_keeps_credentials() {
    let connector = ConnectorBuilder::<NetConnectorConfiguration>::new()
        .proxy_uri("http://proxy-a.internal:3128")
        .and_then(|b| b.proxy_credentials("user", "secret"))
        .expect("valid proxy")
        .build(&PropertyStore::new(), &StaticEnvironment::new())
        .expect("client configuration should layer");

    let req = request().with_property(PropertyKey::ProxyUri.as_str(), "http://proxy-b.internal");
    let proxy = connector
        .effective_proxy(&req)
        .expect("resolves")
        .expect("proxied");

    assert_eq!(proxy.host(), "proxy-b.internal");
    assert_eq!(proxy.port(), 80);
    assert_eq!(proxy.credentials().map(|c| c.username()), Some("user"));
    assert!(proxy.authorization().is_some());
}

#[test]
fn test_unsupported_proxy_scheme_falls_back_to_direct() {
    let connector = ConnectorBuilder::<NetConnectorConfiguration>::new()
        .build(&PropertyStore::new(), &StaticEnvironment::new())
        .expect("client configuration should layer");

    let req = request().with_property(PropertyKey::ProxyUri.as_str(), "ftp://proxy.internal");
    assert_eq!(connector.effective_proxy(&req).expect("resolves"), None);
}

#[test]
fn test_negative_chunk_size_keeps_default() {
    let client = PropertyStore::new().with(PropertyKey::ChunkSize.as_str(), -5);
    let connector = ConnectorBuilder::<NetConnectorConfiguration>::new()
        .build(&client, &StaticEnvironment::new())
        .expect("client configuration should layer");

    assert_eq!(connector.effective_chunk_size(&request()).expect("resolves"), 4096);

    let req = request().with_property(PropertyKey::ChunkSize.as_str(), -5);
    assert_eq!(connector.effective_chunk_size(&req).expect("resolves"), 4096);
}

#[test]
fn test_override_prefix_isolation() {
    let connector = ConnectorBuilder::<NetConnectorConfiguration>::new()
        .build(&PropertyStore::new(), &StaticEnvironment::new())
        .expect("client configuration should layer");

    let mut foreign = ConnectorConfiguration::new().with_prefix("test.");
    foreign.settings_mut().max_redirects.set(1);
    let key = foreign.prefixed_key(CONNECTOR_CONFIGURATION);
    let req = request().with_property(key, foreign.into_object());

    assert_eq!(connector.effective_max_redirects(&req).expect("resolves"), 5);
}

#[test]
fn test_prefixed_client_finds_its_own_override() {
    let connector = ConnectorBuilder::<NetConnectorConfiguration>::new()
        .prefix("test.")
        .build(&PropertyStore::new(), &StaticEnvironment::new())
        .expect("client configuration should layer");

    let mut own = ConnectorConfiguration::new().with_prefix("test.");
    own.settings_mut().max_redirects.set(1);

    let unprefixed = request().with_property(CONNECTOR_CONFIGURATION, own.clone().into_object());
    assert_eq!(connector.effective_max_redirects(&unprefixed).expect("resolves"), 5);

    let key = own.prefixed_key(CONNECTOR_CONFIGURATION);
    let prefixed = request().with_property(key, own.into_object());
    assert_eq!(connector.effective_max_redirects(&prefixed).expect("resolves"), 1);
}

#[test]
fn test_copy_is_idempotent() {
    let config = ConnectorBuilder::<NetConnectorConfiguration>::new()
        .chunk_size(1024)
        .and_then(|b| b.max_connections_total(10))
        .expect("valid settings")
        .rw();
    assert_eq!(config.copy().copy(), config.copy());
}

#[test]
fn test_json_properties_layer_like_any_other() {
    let json = serde_json::json!({
        "trellis.client.readTimeout": 250,
        "trellis.client.followRedirects": "false",
        "trellis.client.entityProcessing": "CHUNKED",
    });
    let client = PropertyStore::from_json(&json).expect("flat object");

    let connector = ConnectorBuilder::<NetConnectorConfiguration>::new()
        .build(&client, &StaticEnvironment::new())
        .expect("client configuration should layer");
    let settings = connector.settings(&request()).expect("resolves");

    assert_eq!(settings.read_timeout, Duration::from_millis(250));
    assert!(!settings.redirect.follow_redirects());
    assert_eq!(
        settings.entity_processing,
        Some(trellis_client::config::EntityProcessing::Chunked)
    );
}
