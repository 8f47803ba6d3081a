//! Request-side HTTP vocabulary

pub mod headers;
pub mod request;

pub use headers::{HeaderFilter, RESTRICTED_HEADERS, is_restricted};
pub use request::ClientRequest;
