//! # Configuration
//!
//! The literals the nodes compare against and the filename sanitizing rules.
//! Defaults match what the host ships with; override per graph if needed.

use serde::{Deserialize, Serialize};

use super::error::{PackError, PackResult};

/// Checkpoint name that means "no settings here"
pub const NONE_MARKER: &str = "None";

/// VAE name that means "use the VAE baked into the checkpoint"
pub const BAKED_VAE: &str = "Baked VAE";

/// Template used by the filename node when the host passes none
pub const DEFAULT_TEMPLATE: &str = "{ckpt_name}_{date}";

/// Characters that never survive into a filename
pub const FORBIDDEN_CHARS: &[char] = &['\\', '/', ':', '?', '.', '"', '<', '>', '|'];

/// Node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Checkpoint name that packs to `Settings::Absent`
    pub none_marker: String,

    /// VAE name left untouched by the filename node
    pub baked_vae: String,

    /// Template used when none is given
    pub default_template: String,

    /// Characters replaced after template substitution
    pub forbidden_chars: Vec<char>,

    /// Replacement for each forbidden character
    pub replacement: char,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            none_marker: NONE_MARKER.to_string(),
            baked_vae: BAKED_VAE.to_string(),
            default_template: DEFAULT_TEMPLATE.to_string(),
            forbidden_chars: FORBIDDEN_CHARS.to_vec(),
            replacement: '-',
        }
    }
}

impl PackConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> PackResult<Self> {
        toml::from_str(text).map_err(|e| PackError::Config(e.to_string()))
    }

    /// Set the none-marker
    pub fn with_none_marker(mut self, marker: impl Into<String>) -> Self {
        self.none_marker = marker.into();
        self
    }

    /// Set the baked-VAE literal
    pub fn with_baked_vae(mut self, name: impl Into<String>) -> Self {
        self.baked_vae = name.into();
        self
    }

    /// Set the default filename template
    pub fn with_default_template(mut self, template: impl Into<String>) -> Self {
        self.default_template = template.into();
        self
    }

    /// Set the replacement character
    pub fn with_replacement(mut self, c: char) -> Self {
        self.replacement = c;
        self
    }

    /// Is this checkpoint name the none-marker?
    pub fn is_none_marker(&self, ckpt_name: &str) -> bool {
        ckpt_name == self.none_marker
    }

    /// Replace every forbidden character
    pub fn sanitize(&self, text: &str) -> String {
        text.chars()
            .map(|c| {
                if self.forbidden_chars.contains(&c) {
                    self.replacement
                } else {
                    c
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_literals() {
        let config = PackConfig::default();
        assert!(config.is_none_marker("None"));
        assert!(!config.is_none_marker("none"));
        assert_eq!(config.baked_vae, "Baked VAE");
        assert_eq!(config.default_template, "{ckpt_name}_{date}");
    }

    #[test]
    fn test_sanitize() {
        let config = PackConfig::default();
        assert_eq!(
            config.sanitize(r#"a\b/c:d?e.f"g<h>i|j"#),
            "a-b-c-d-e-f-g-h-i-j"
        );
        assert_eq!(config.sanitize("plain_name 01"), "plain_name 01");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = PackConfig::from_toml_str(
            r#"
            none_marker = "(none)"
            replacement = "_"
            "#,
        )
        .unwrap();

        assert_eq!(config.none_marker, "(none)");
        assert_eq!(config.replacement, '_');
        assert_eq!(config.baked_vae, "Baked VAE");
        assert_eq!(config.sanitize("a.b"), "a_b");
    }

    #[test]
    fn test_from_toml_invalid() {
        let result = PackConfig::from_toml_str("none_marker = [");
        assert!(matches!(result, Err(PackError::Config(_))));
    }

    #[test]
    fn test_builder() {
        let config = PackConfig::new()
            .with_none_marker("-")
            .with_baked_vae("builtin")
            .with_default_template("{steps}")
            .with_replacement('+');

        assert!(config.is_none_marker("-"));
        assert_eq!(config.baked_vae, "builtin");
        assert_eq!(config.default_template, "{steps}");
        assert_eq!(config.sanitize("a/b"), "a+b");
    }
}
