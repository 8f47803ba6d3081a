//! Typed values carried by a property store
//!
//! The store maps string keys to [`PropertyValue`]. Scalar tunables are read
//! back through [`FromPropertyValue`], which applies the natural coercions
//! (integers as milliseconds, numeric strings, `"true"`/`"false"`).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::snapshot::ConfigurationObject;
use super::validation::ConfigurationError;
use crate::Url;
use crate::connect::controller::ConnectionController;
use crate::redirect::RedirectController;
use crate::tls::SslContextSupplier;

/// Shared trait object compared by identity.
///
/// Two handles are equal only when they point at the same allocation, which is
/// what "same controller" means for layering purposes.
pub struct Shared<T: ?Sized>(Arc<T>);

impl<T: ?Sized> Shared<T> {
    pub fn new(inner: Arc<T>) -> Self {
        Self(inner)
    }

    pub fn as_arc(&self) -> &Arc<T> {
        &self.0
    }

    #[inline]
    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast::<()>()
    }
}

impl<T: ?Sized> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> std::ops::Deref for Shared<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl<T: ?Sized> Eq for Shared<T> {}

impl<T: ?Sized> std::hash::Hash for Shared<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:p})", self.addr())
    }
}

pub type SharedConnectionController = Shared<dyn ConnectionController>;
pub type SharedRedirectController = Shared<dyn RedirectController>;

/// How request entities are framed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityProcessing {
    /// Serialize the whole entity first and send it with a content length
    Buffered,
    /// Stream the entity with chunked transfer encoding
    Chunked,
}

impl FromStr for EntityProcessing {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUFFERED" => Ok(EntityProcessing::Buffered),
            "CHUNKED" => Ok(EntityProcessing::Chunked),
            _ => Err(ConfigurationError::UnknownVariant(s.to_string())),
        }
    }
}

/// HTTP/2 negotiation behaviour for cleartext connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Http2Upgrade {
    /// Stay on HTTP/1.1
    #[default]
    Disabled,
    /// Send `Upgrade: h2c` on the first request
    Upgrade,
    /// Speak HTTP/2 immediately without negotiation
    PriorKnowledge,
}

impl FromStr for Http2Upgrade {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DISABLED" => Ok(Http2Upgrade::Disabled),
            "UPGRADE" => Ok(Http2Upgrade::Upgrade),
            "PRIOR_KNOWLEDGE" => Ok(Http2Upgrade::PriorKnowledge),
            _ => Err(ConfigurationError::UnknownVariant(s.to_string())),
        }
    }
}

/// Limits applied while decoding response heads and chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeaderLimits {
    pub max_header_size: usize,
    pub max_initial_line_length: usize,
    pub max_chunk_size: usize,
}

impl HeaderLimits {
    #[must_use]
    pub const fn new(
        max_header_size: usize,
        max_initial_line_length: usize,
        max_chunk_size: usize,
    ) -> Self {
        Self {
            max_header_size,
            max_initial_line_length,
            max_chunk_size,
        }
    }
}

/// A value stored under a property key
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Int(i64),
    Bool(bool),
    Str(String),
    Duration(Duration),
    Uri(Url),
    HeaderLimits(HeaderLimits),
    EntityProcessing(EntityProcessing),
    Http2Upgrade(Http2Upgrade),
    SslContextSupplier(SslContextSupplier),
    ConnectionController(SharedConnectionController),
    RedirectController(SharedRedirectController),
    /// Override configuration object, stored under the reserved key
    Configuration(Arc<dyn ConfigurationObject>),
}

impl PropertyValue {
    /// Short name of the carried type, used in mismatch errors
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Int(_) => "integer",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Str(_) => "string",
            PropertyValue::Duration(_) => "duration",
            PropertyValue::Uri(_) => "uri",
            PropertyValue::HeaderLimits(_) => "header limits",
            PropertyValue::EntityProcessing(_) => "entity processing",
            PropertyValue::Http2Upgrade(_) => "http2 upgrade",
            PropertyValue::SslContextSupplier(_) => "ssl context supplier",
            PropertyValue::ConnectionController(_) => "connection controller",
            PropertyValue::RedirectController(_) => "redirect controller",
            PropertyValue::Configuration(_) => "connector configuration",
        }
    }

    /// Integer view of the value. A string that does not hold an integer is
    /// a rejected value, not a mismatch.
    fn as_int(&self, expected: &'static str) -> Option<Result<i64, ConfigurationError>> {
        match self {
            PropertyValue::Int(i) => Some(Ok(*i)),
            PropertyValue::Str(s) => Some(s.trim().parse().map_err(|_| unparseable(expected, s))),
            _ => None,
        }
    }
}

/// Conversion from a stored value to a tunable's type.
///
/// `None` means the stored type cannot represent the tunable (a type
/// mismatch); `Some(Err(_))` means the type fits but the value is rejected.
pub trait FromPropertyValue: Sized {
    const EXPECTED: &'static str;

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>>;
}

fn unparseable(expected: &'static str, value: &str) -> ConfigurationError {
    ConfigurationError::Unparseable {
        expected,
        value: value.to_string(),
    }
}

fn non_negative(value: i64) -> Result<u64, ConfigurationError> {
    u64::try_from(value).map_err(|_| ConfigurationError::Negative { value })
}

impl FromPropertyValue for Duration {
    const EXPECTED: &'static str = "duration";

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>> {
        match value {
            PropertyValue::Duration(d) => Some(Ok(*d)),
            other => other
                .as_int(Self::EXPECTED)
                .map(|millis| millis.and_then(non_negative).map(Duration::from_millis)),
        }
    }
}

impl FromPropertyValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>> {
        match value {
            PropertyValue::Bool(b) => Some(Ok(*b)),
            PropertyValue::Str(s) if s.eq_ignore_ascii_case("true") => Some(Ok(true)),
            PropertyValue::Str(s) if s.eq_ignore_ascii_case("false") => Some(Ok(false)),
            PropertyValue::Str(s) => Some(Err(unparseable(Self::EXPECTED, s))),
            _ => None,
        }
    }
}

impl FromPropertyValue for u32 {
    const EXPECTED: &'static str = "integer";

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>> {
        value.as_int(Self::EXPECTED).map(|i| {
            let i = i?;
            let v = non_negative(i)?;
            u32::try_from(v).map_err(|_| ConfigurationError::OutOfRange { value: i })
        })
    }
}

impl FromPropertyValue for u64 {
    const EXPECTED: &'static str = "integer";

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>> {
        value.as_int(Self::EXPECTED).map(|i| i.and_then(non_negative))
    }
}

impl FromPropertyValue for usize {
    const EXPECTED: &'static str = "integer";

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>> {
        value.as_int(Self::EXPECTED).map(|i| {
            let i = i?;
            let v = non_negative(i)?;
            usize::try_from(v).map_err(|_| ConfigurationError::OutOfRange { value: i })
        })
    }
}

impl FromPropertyValue for String {
    const EXPECTED: &'static str = "string";

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>> {
        match value {
            PropertyValue::Str(s) => Some(Ok(s.clone())),
            PropertyValue::Uri(u) => Some(Ok(u.to_string())),
            _ => None,
        }
    }
}

impl FromPropertyValue for HeaderLimits {
    const EXPECTED: &'static str = "header limits";

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>> {
        match value {
            PropertyValue::HeaderLimits(limits) => Some(Ok(*limits)),
            _ => None,
        }
    }
}

impl FromPropertyValue for EntityProcessing {
    const EXPECTED: &'static str = "entity processing";

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>> {
        match value {
            PropertyValue::EntityProcessing(mode) => Some(Ok(*mode)),
            PropertyValue::Str(s) => Some(s.parse()),
            _ => None,
        }
    }
}

impl FromPropertyValue for Http2Upgrade {
    const EXPECTED: &'static str = "http2 upgrade";

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>> {
        match value {
            PropertyValue::Http2Upgrade(mode) => Some(Ok(*mode)),
            PropertyValue::Str(s) => Some(s.parse()),
            _ => None,
        }
    }
}

impl FromPropertyValue for SslContextSupplier {
    const EXPECTED: &'static str = "ssl context supplier";

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>> {
        match value {
            PropertyValue::SslContextSupplier(supplier) => Some(Ok(supplier.clone())),
            _ => None,
        }
    }
}

impl FromPropertyValue for SharedConnectionController {
    const EXPECTED: &'static str = "connection controller";

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>> {
        match value {
            PropertyValue::ConnectionController(controller) => Some(Ok(controller.clone())),
            _ => None,
        }
    }
}

impl FromPropertyValue for SharedRedirectController {
    const EXPECTED: &'static str = "redirect controller";

    fn from_property(value: &PropertyValue) -> Option<Result<Self, ConfigurationError>> {
        match value {
            PropertyValue::RedirectController(controller) => Some(Ok(controller.clone())),
            _ => None,
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(i64::from(v))
    }
}

impl From<u32> for PropertyValue {
    fn from(v: u32) -> Self {
        PropertyValue::Int(i64::from(v))
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Str(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Str(v)
    }
}

impl From<Duration> for PropertyValue {
    fn from(v: Duration) -> Self {
        PropertyValue::Duration(v)
    }
}

impl From<Url> for PropertyValue {
    fn from(v: Url) -> Self {
        PropertyValue::Uri(v)
    }
}

impl From<HeaderLimits> for PropertyValue {
    fn from(v: HeaderLimits) -> Self {
        PropertyValue::HeaderLimits(v)
    }
}

impl From<EntityProcessing> for PropertyValue {
    fn from(v: EntityProcessing) -> Self {
        PropertyValue::EntityProcessing(v)
    }
}

impl From<Http2Upgrade> for PropertyValue {
    fn from(v: Http2Upgrade) -> Self {
        PropertyValue::Http2Upgrade(v)
    }
}

impl From<SslContextSupplier> for PropertyValue {
    fn from(v: SslContextSupplier) -> Self {
        PropertyValue::SslContextSupplier(v)
    }
}

impl From<SharedConnectionController> for PropertyValue {
    fn from(v: SharedConnectionController) -> Self {
        PropertyValue::ConnectionController(v)
    }
}

impl From<SharedRedirectController> for PropertyValue {
    fn from(v: SharedRedirectController) -> Self {
        PropertyValue::RedirectController(v)
    }
}

impl From<Arc<dyn ConfigurationObject>> for PropertyValue {
    fn from(v: Arc<dyn ConfigurationObject>) -> Self {
        PropertyValue::Configuration(v)
    }
}
