use super::types::{Error, Kind};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Creates an `Error` for an invalid builder argument.
pub fn builder<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

/// Creates an `Error` for a property whose stored value has the wrong type.
pub fn type_mismatch(key: &str, expected: &'static str, found: &'static str) -> Error {
    Error::new(Kind::TypeMismatch { expected, found }).with_key(key)
}

/// Creates an `Error` for a TLS construction failure.
pub fn tls<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Tls).with(e.into())
}
