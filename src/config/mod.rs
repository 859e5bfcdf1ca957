//! Configuration management for `palm.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[scripts]` | Compiled script post-processing (minify, cache)  |
//! | `[hooks]`   | Attribute used to tag hydrated component roots   |
//! | `[state]`   | Window variable carrying the bootstrap blob      |
//!
//! Every section and field is optional; a missing file yields the defaults.

mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing palm.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PalmConfig {
    /// Compiled script handling
    pub scripts: ScriptsConfig,

    /// Component root hooks
    pub hooks: HooksConfig,

    /// Bootstrap state blob
    pub state: StateConfig,
}

impl PalmConfig {
    /// Read and validate a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_str(&content)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate TOML text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let attr = &self.hooks.attribute;
        if attr.is_empty()
            || !attr
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':')
        {
            return Err(ConfigError::Validation(format!(
                "hooks.attribute `{attr}` is not a valid attribute name"
            )));
        }

        if !is_js_identifier(&self.state.global_var) {
            return Err(ConfigError::Validation(format!(
                "state.global_var `{}` is not a valid JavaScript identifier",
                self.state.global_var
            )));
        }

        Ok(())
    }
}

fn is_js_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// ============================================================================
// sections
// ============================================================================

/// `[scripts]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Minify compiled scripts before hashing.
    pub minify: bool,
    /// Memoize compilation by source content hash.
    pub cache: bool,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            minify: false,
            cache: true,
        }
    }
}

/// `[hooks]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Attribute carrying the component id on the hydrated root element.
    pub attribute: String,
    /// Prefix of generated component ids.
    pub id_prefix: String,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            attribute: "data-palm-component".to_string(),
            id_prefix: "palm-".to_string(),
        }
    }
}

/// `[state]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// `window.<global_var>` receives the bootstrap blob.
    pub global_var: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            global_var: "__PALM__".to_string(),
        }
    }
}
