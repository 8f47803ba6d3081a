//! Socket factory reuse across requests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rustls::{ClientConfig, RootCertStore};
use trellis_client::config::{NetConnectorConfiguration, PropertyKey, PropertyStore, StaticEnvironment};
use trellis_client::http::ClientRequest;
use trellis_client::tls::{SocketFactoryCache, SslContextSupplier};
use trellis_client::{Connector, ConnectorBuilder, Url};

fn context() -> Arc<ClientConfig> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .expect("ring supports the default protocol versions")
        .with_root_certificates(RootCertStore::empty())
        .with_no_client_auth();
    Arc::new(config)
}

fn request(path: &str) -> ClientRequest {
    ClientRequest::get(Url::parse(&format!("https://service.internal/{path}")).expect("test url"))
}

fn connector(supplier: SslContextSupplier) -> Connector<NetConnectorConfiguration> {
    let config = ConnectorBuilder::<NetConnectorConfiguration>::new()
        .ssl_context_supplier(supplier)
        .from_client(&PropertyStore::new(), &StaticEnvironment::new())
        .expect("client configuration should layer");
    Connector::with_socket_factory_cache(config, Arc::new(SocketFactoryCache::new()))
}

#[test]
fn test_same_context_shares_socket_factory() {
    let shared = context();
    let calls = Arc::new(AtomicUsize::new(0));
    let supplier = {
        let calls = Arc::clone(&calls);
        SslContextSupplier::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Arc::clone(&shared)
        })
    };
    let connector = connector(supplier);

    let first = connector
        .effective_tls(&request("a"))
        .expect("tls resolves")
        .socket_factory()
        .expect("factory");
    let second = connector
        .effective_tls(&request("b"))
        .expect("tls resolves")
        .socket_factory()
        .expect("factory");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(connector.socket_factory_cache().stats().misses, 1);
    assert_eq!(connector.socket_factory_cache().stats().hits, 1);
}

#[test]
fn test_supplier_invoked_lazily() {
    let calls = Arc::new(AtomicUsize::new(0));
    let supplier = {
        let calls = Arc::clone(&calls);
        let shared = context();
        SslContextSupplier::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Arc::clone(&shared)
        })
    };
    let connector = connector(supplier);

    let tls = connector.effective_tls(&request("a")).expect("tls resolves");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(connector.socket_factory_cache().is_empty());

    tls.socket_factory().expect("factory");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_request_supplier_wins() {
    let client_context = context();
    let request_context = context();
    let connector = connector(SslContextSupplier::fixed(Arc::clone(&client_context)));

    let req = request("a").with_property(
        PropertyKey::SslContextSupplier.as_str(),
        SslContextSupplier::fixed(Arc::clone(&request_context)),
    );
    let resolved = connector
        .effective_tls(&req)
        .expect("tls resolves")
        .context()
        .expect("context");

    assert!(Arc::ptr_eq(&resolved, &request_context));
}

#[test]
fn test_platform_default_when_unset() {
    let config = ConnectorBuilder::<NetConnectorConfiguration>::new()
        .from_client(&PropertyStore::new(), &StaticEnvironment::new())
        .expect("client configuration should layer");
    let connector = Connector::with_socket_factory_cache(config, Arc::new(SocketFactoryCache::new()));

    let tls = connector.effective_tls(&request("a")).expect("tls resolves");
    assert!(tls.supplier().is_none());

    let first = tls.socket_factory().expect("platform default builds");
    let second = connector
        .effective_tls(&request("b"))
        .expect("tls resolves")
        .socket_factory()
        .expect("platform default builds");
    assert!(Arc::ptr_eq(&first, &second));
}
