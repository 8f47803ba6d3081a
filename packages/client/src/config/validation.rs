//! Validation of user-supplied tuning values
//!
//! Builder setters reject invalid input with an error. The same checks run on
//! values found in property stores, where a rejection is only logged and the
//! previously resolved value stays in effect.

use super::value::HeaderLimits;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Reasons a tuning value is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("negative value {value} is not allowed")]
    Negative { value: i64 },

    #[error("value {value} is out of range")]
    OutOfRange { value: i64 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    #[error("cannot read {value:?} as {expected}")]
    Unparseable { expected: &'static str, value: String },

    #[error("invalid proxy uri: {0}")]
    InvalidProxyUri(String),

    #[error("unsupported proxy scheme: {0}")]
    UnsupportedProxyScheme(String),

    #[error("{0} is required")]
    Missing(&'static str),
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Accept any value
    #[inline]
    pub fn any<T>(_value: &T) -> ConfigResult<()> {
        Ok(())
    }

    /// Validate a pool size, redirect limit or similar strictly positive count
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Zero` if the value is zero.
    pub fn positive<T: Default + PartialEq>(value: &T) -> ConfigResult<()> {
        if *value == T::default() {
            return Err(ConfigurationError::Zero("value"));
        }
        Ok(())
    }

    /// Validate a chunk size handed to a builder as a signed integer
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Negative` for values below zero.
    pub fn chunk_size(value: i64) -> ConfigResult<usize> {
        let unsigned = u64::try_from(value).map_err(|_| ConfigurationError::Negative { value })?;
        usize::try_from(unsigned).map_err(|_| ConfigurationError::OutOfRange { value })
    }

    /// Validate header decoding limits
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Zero` naming the first limit that is zero.
    pub fn header_limits(limits: &HeaderLimits) -> ConfigResult<()> {
        if limits.max_header_size == 0 {
            return Err(ConfigurationError::Zero("max header size"));
        }
        if limits.max_initial_line_length == 0 {
            return Err(ConfigurationError::Zero("max initial line length"));
        }
        if limits.max_chunk_size == 0 {
            return Err(ConfigurationError::Zero("max chunk size"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_size() {
        assert_eq!(ConfigValidator::chunk_size(0), Ok(0));
        assert_eq!(ConfigValidator::chunk_size(8192), Ok(8192));
        assert_eq!(
            ConfigValidator::chunk_size(-5),
            Err(ConfigurationError::Negative { value: -5 })
        );
    }

    #[test]
    fn test_positive_counts() {
        assert_eq!(ConfigValidator::positive(&1usize), Ok(()));
        assert_eq!(ConfigValidator::positive(&5u32), Ok(()));
        assert_eq!(
            ConfigValidator::positive(&0u32),
            Err(ConfigurationError::Zero("value"))
        );
    }

    #[test]
    fn test_header_limits_names_offender() {
        let err = ConfigValidator::header_limits(&HeaderLimits::new(8192, 0, 8192))
            .expect_err("zero initial line length must be rejected");
        assert_eq!(err.to_string(), "max initial line length must be greater than zero");
    }
}
