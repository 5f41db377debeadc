//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::method;
use axum::http::Method;
use serde::{Deserialize, Serialize};

/// Settings shared by the link registries
///
/// ```yaml
/// meta_methods: [HEAD, OPTIONS]
/// default_scheme: http
/// unique_link_names: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypermediaConfig {
    /// Methods ignored when inferring which method to advertise
    #[serde(default = "default_meta_methods")]
    pub meta_methods: Vec<String>,

    /// Scheme used when the request URI does not carry one
    #[serde(default = "default_scheme")]
    pub default_scheme: String,

    /// Reject link names a `Linker` has already used instead of replacing them
    #[serde(default)]
    pub unique_link_names: bool,
}

fn default_meta_methods() -> Vec<String> {
    method::META_METHODS
        .iter()
        .map(|m| m.as_str().to_string())
        .collect()
}

fn default_scheme() -> String {
    "http".to_string()
}

impl Default for HypermediaConfig {
    fn default() -> Self {
        Self {
            meta_methods: default_meta_methods(),
            default_scheme: default_scheme(),
            unique_link_names: false,
        }
    }
}

impl HypermediaConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value can be used as-is
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.meta_methods()?;

        let scheme = &self.default_scheme;
        let valid_scheme = scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid_scheme {
            return Err(ConfigError::InvalidScheme {
                scheme: scheme.clone(),
            });
        }
        Ok(())
    }

    /// Meta methods parsed into [`Method`] values
    pub fn meta_methods(&self) -> Result<Vec<Method>, ConfigError> {
        self.meta_methods
            .iter()
            .map(|name| {
                method::parse(name).ok_or_else(|| ConfigError::InvalidMethod {
                    method: name.clone(),
                })
            })
            .collect()
    }
}
