use std::error::Error as StdError;
use std::fmt;

/// A Result alias where the Err case is `trellis_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur while configuring a connector or
/// reading tunables out of a property store.
#[derive(Clone)]
pub struct Error {
    pub inner: Box<Inner>,
}

pub struct Inner {
    pub kind: Kind,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub key: Option<String>,
}

impl Clone for Inner {
    fn clone(&self) -> Self {
        Inner {
            kind: self.kind.clone(),
            source: None, // Cannot clone trait objects, so we lose the source
            key: self.key.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Invalid argument handed to a builder setter
    Builder,
    /// A property store value does not have the type the key requires
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// TLS context or socket factory construction failure
    Tls,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                key: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.inner.key = Some(key.into());
        self
    }

    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Get the property key associated with this error, if any
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.inner.key.as_deref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("trellis_client::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref key) = self.inner.key {
            f.field("key", key);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::Builder => f.write_str("builder error")?,
            Kind::TypeMismatch { expected, found } => {
                write!(f, "property type mismatch: expected {expected}, found {found}")?;
            }
            Kind::Tls => f.write_str("tls configuration error")?,
        }

        if let Some(ref key) = self.inner.key {
            write!(f, " for key {key:?}")?;
        }

        if let Some(ref source) = self.inner.source {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
