//! Storefront configuration
//!
//! Tunables that the storefront reads at start-up, loaded from YAML. Every
//! section and key is optional and falls back to the shop defaults.

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{filters::PriceRange, validation::PatternError};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed
        path: String,

        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid YAML for [`StorefrontConfig`].
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A configured validation pattern does not compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorefrontConfig {
    /// Shop page settings.
    pub shop: ShopConfig,

    /// Form validation settings.
    pub validation: ValidationConfig,

    /// Checkout settings.
    pub checkout: CheckoutConfig,
}

impl StorefrontConfig {
    /// Parse configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the document is malformed or has unknown keys.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Read configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_yaml(&yaml)
    }
}

/// Shop page settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShopConfig {
    /// Price range the filters start from and reset to.
    pub price_range: PriceRange,
}

/// Form validation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Regex a postal code must match.
    pub postal_code_pattern: String,

    /// Minimum gift card code length.
    pub gift_card_min_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            postal_code_pattern: r"^\d{6}$".to_string(),
            gift_card_min_length: 8,
        }
    }
}

/// Checkout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckoutConfig {
    /// Simulated payment processing time in milliseconds.
    pub processing_delay_ms: u64,
}

impl CheckoutConfig {
    /// Processing delay as a [`Duration`].
    #[must_use]
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 2000,
        }
    }
}
