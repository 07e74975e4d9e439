//! Host Configuration
//!
//! Knobs for the reference host. Every field has a default, so an empty
//! JSON object is a valid config.
//!
//! ```json
//! { "strict_deps_types": true, "flush_passive_on_render": true }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Behavior switches for [`HostRoot`](crate::host::HostRoot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Fail the render when a call site's comparison list changes type.
    /// Otherwise the change just counts as "changed".
    pub strict_deps_types: bool,

    /// Log a warning when a comparison list changes length between renders.
    pub warn_on_deps_resize: bool,

    /// Run passive effects before `render` returns instead of waiting for
    /// `flush_effects` or the next render.
    pub flush_passive_on_render: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            strict_deps_types: false,
            warn_on_deps_resize: true,
            flush_passive_on_render: false,
        }
    }
}

impl HostConfig {
    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style setter for [`strict_deps_types`](Self::strict_deps_types).
    pub fn strict_deps_types(mut self, strict: bool) -> Self {
        self.strict_deps_types = strict;
        self
    }

    /// Builder-style setter for [`warn_on_deps_resize`](Self::warn_on_deps_resize).
    pub fn warn_on_deps_resize(mut self, warn: bool) -> Self {
        self.warn_on_deps_resize = warn;
        self
    }

    /// Builder-style setter for [`flush_passive_on_render`](Self::flush_passive_on_render).
    pub fn flush_passive_on_render(mut self, flush: bool) -> Self {
        self.flush_passive_on_render = flush;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = HostConfig::from_json("{}").unwrap();
        assert_eq!(config, HostConfig::default());
        assert!(config.warn_on_deps_resize);
    }

    #[test]
    fn fields_override_defaults() {
        let config = HostConfig::from_json(r#"{"strict_deps_types": true}"#).unwrap();
        assert!(config.strict_deps_types);
        assert!(!config.flush_passive_on_render);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = HostConfig::from_json("{not json").unwrap_err();
        assert!(err.to_string().starts_with("invalid host config"));
    }

    #[test]
    fn builder_setters() {
        let config = HostConfig::default()
            .strict_deps_types(true)
            .warn_on_deps_resize(false)
            .flush_passive_on_render(true);
        assert!(config.strict_deps_types);
        assert!(!config.warn_on_deps_resize);
        assert!(config.flush_passive_on_render);
    }
}
