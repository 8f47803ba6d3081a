//! Process-wide defaults behind an injectable lookup
//!
//! A few defaults historically come from process state. Clients receive an
//! [`EnvironmentProvider`] at construction so tests can substitute their own.

use std::collections::HashMap;
use std::fmt;

/// Source of process-level default switches
pub trait EnvironmentProvider: fmt::Debug + Send + Sync {
    fn var(&self, name: &str) -> Option<String>;

    /// Interpret a variable as a boolean flag, `None` if unset or unparseable
    fn flag(&self, name: &str) -> Option<bool> {
        let raw = self.var(name)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => {
                tracing::warn!("Ignoring unparseable environment flag {}={:?}", name, raw);
                None
            }
        }
    }
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentProvider for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed set of variables
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    vars: HashMap<String, String>,
}

impl StaticEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvironmentProvider for StaticEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_parsing() {
        let env = StaticEnvironment::new()
            .with_var("a", "TRUE")
            .with_var("b", "off")
            .with_var("c", "maybe");

        assert_eq!(env.flag("a"), Some(true));
        assert_eq!(env.flag("b"), Some(false));
        assert_eq!(env.flag("c"), None);
        assert_eq!(env.flag("missing"), None);
    }
}
