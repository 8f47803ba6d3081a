use super::types::{Error, Kind};

impl Error {
    /// Returns true if the error came from a builder setter.
    #[must_use]
    pub fn is_builder(&self) -> bool {
        matches!(self.inner.kind, Kind::Builder)
    }

    /// Returns true if a property value had an unexpected type.
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.inner.kind, Kind::TypeMismatch { .. })
    }

    /// Returns true if the error is related to TLS setup.
    #[must_use]
    pub fn is_tls(&self) -> bool {
        matches!(self.inner.kind, Kind::Tls)
    }
}

#[cfg(test)]
mod tests {
    use super::super::constructors;
    use crate::config::ConfigurationError;

    #[test]
    fn test_classification() {
        let err = constructors::builder(ConfigurationError::Negative { value: -1 });
        assert!(err.is_builder());
        assert!(!err.is_type_mismatch());

        let err = constructors::type_mismatch("k", "bool", "string");
        assert!(err.is_type_mismatch());
        assert_eq!(err.key(), Some("k"));
        assert_eq!(
            err.to_string(),
            "property type mismatch: expected bool, found string for key \"k\""
        );
    }

    #[test]
    fn test_source_survives_display_but_not_clone() {
        let err = constructors::builder(ConfigurationError::Negative { value: -5 });
        assert!(err.to_string().contains("-5"));
        assert!(std::error::Error::source(&err).is_some());

        let cloned = err.clone();
        assert!(std::error::Error::source(&cloned).is_none());
        assert!(cloned.is_builder());
    }
}
