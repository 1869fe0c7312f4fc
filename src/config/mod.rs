//! Provider configuration.
//!
//! The sandbox host hands the provider a structured configuration object;
//! this module defines that object and loads it from a YAML file or string.
//! No environment variables are consulted.

use crate::auth::CredentialsConfig;
use crate::cache::CacheTarget;
use crate::error::{ImageError, Result};
use config::{Config as ConfigRs, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};


/// Configuration for a catalog-backed image provider.
///
/// `target_path` and `catalog_url` are required; everything else has
/// defaults (anonymous access, auto-detected layout, 30 second timeout).
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Where to cache the image: a file path, or a directory under which the
    /// image is cached by identifier (see `layout`)
    pub target_path: PathBuf,

    /// Base URL of the catalog service to query for images
    pub catalog_url: String,

    /// Authentication parameters for the credential service
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Cache addressing mode
    #[serde(default)]
    pub layout: Layout,

    /// Transport settings
    #[serde(default)]
    pub network: Network,
}

impl ProviderConfig {
    /// Parses a `ProviderConfig` from a YAML string.
    ///
    /// # Examples
    ///
    /// ```
    /// use vmimage::ProviderConfig;
    ///
    /// let config = ProviderConfig::from_yaml_str(
    ///     r#"
    ///     target_path: /var/lib/sandbox/images
    ///     catalog_url: http://localhost:9292
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.catalog_url, "http://localhost:9292");
    /// ```
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = ConfigRs::builder().add_source(File::from_str(s, FileFormat::Yaml));
        Self::from_builder(builder)
    }

    /// Loads a `ProviderConfig` from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let builder = ConfigRs::builder().add_source(File::from(path).required(true));
        Self::from_builder(builder)
    }

    /// Creates a `ProviderConfig` from a `config::ConfigBuilder`.
    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                ImageError::config_with_source("Failed to deserialize provider configuration", e)
            })
    }

    /// Returns the cache target described by this configuration.
    pub fn cache_target(&self) -> CacheTarget {
        self.layout.target(self.target_path.clone())
    }
}

/// Cache addressing mode for the target path.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Detect from filesystem state when the provider is constructed:
    /// an existing directory caches per identifier, anything else in place
    #[default]
    Auto,

    /// Always cache in place at `target_path`
    File,

    /// Always cache under `target_path/<identifier>`
    Directory,
}

impl Layout {
    /// Resolves this mode against a target path.
    pub fn target(&self, path: PathBuf) -> CacheTarget {
        match self {
            Self::Auto => CacheTarget::detect(path),
            Self::File => CacheTarget::File(path),
            Self::Directory => CacheTarget::Directory(path),
        }
    }
}

/// Transport settings.

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]

pub struct Network {
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
        }
    }
}

fn default_network_timeout() -> u64 {
    30
}
