//! Connection pooling decisions

use std::fmt;
use std::sync::Arc;

use crate::Url;
use crate::config::value::{Shared, SharedConnectionController};
use crate::proxy::ProxyDescriptor;

/// Decides which pooled connections a request may share.
///
/// Requests whose keys are equal may reuse each other's connections.
pub trait ConnectionController: fmt::Debug + Send + Sync + 'static {
    fn pool_key(&self, destination: &Url, proxy: Option<&ProxyDescriptor>) -> String;

    fn may_reuse(&self, _destination: &Url) -> bool {
        true
    }
}

/// Keys connections by `scheme://host:port`, plus the proxy when proxied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultConnectionController;

impl DefaultConnectionController {
    pub fn shared() -> SharedConnectionController {
        let controller: Arc<dyn ConnectionController> = Arc::new(Self);
        Shared::new(controller)
    }
}

impl ConnectionController for DefaultConnectionController {
    fn pool_key(&self, destination: &Url, proxy: Option<&ProxyDescriptor>) -> String {
        let host = destination.host_str().unwrap_or_default();
        let port = destination.port_or_known_default().unwrap_or_default();
        match proxy {
            Some(proxy) => format!("{}://{}:{} via {}", destination.scheme(), host, port, proxy),
            None => format!("{}://{}:{}", destination.scheme(), host, port),
        }
    }
}
