//! Host plugin capability.
//!
//! A sandbox host asks its image provider one question: given this
//! configuration and this requested image, where is the local disk image?
//! [`ImageProvider`] is that capability; [`CatalogProvider`] answers it from
//! a remote image catalog with local caching.

use crate::client::ClientConfig;
use crate::config::ProviderConfig;
use crate::error::{ImageError, Result};
use crate::resolver::Resolver;
use std::path::PathBuf;


/// Capability exposed to the sandbox host: yield a local disk image path.
///
/// Reading [`image`](ImageProvider::image) performs resolution freshly every
/// time, including the catalog metadata fetch and, when the cache is stale,
/// a re-download. The resolved path is intentionally not memoized, so hosts
/// observe catalog updates between reads.
pub trait ImageProvider {
    /// Resolves and returns the local path of the provider's image.
    fn image(&self) -> Result<PathBuf>;
}

/// [`ImageProvider`] backed by a remote image catalog.
///
/// # Examples
///
/// ```no_run
/// use vmimage::{CatalogProvider, ImageProvider, ProviderConfig};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ProviderConfig::from_yaml_str(
///         r#"
///         target_path: /var/lib/sandbox/images
///         catalog_url: http://localhost:9292
///         credentials:
///           auth_url: http://localhost:5000
///           username: sandbox
///           password: secret
///         "#,
///     )?;
///
///     let provider = CatalogProvider::new(config, "ubuntu-server")?;
///     let path = provider.image()?;
///     println!("disk image at {}", path.display());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct CatalogProvider {
    resolver: Resolver,
    reference: String,
}

impl CatalogProvider {
    /// Creates a provider from a host configuration and a requested image
    /// reference (identifier or display name).
    ///
    /// Collaborator clients are constructed here, once, and reused by every
    /// [`image`](ImageProvider::image) read. The cache addressing mode is
    /// also fixed here, per the configuration's `layout`.
    pub fn new(config: ProviderConfig, reference: impl Into<String>) -> Result<Self> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(ImageError::validation("image reference cannot be empty"));
        }

        let client_config = ClientConfig::new().with_timeout(config.network.timeout);

        let resolver = Resolver::builder()
            .catalog_url(&config.catalog_url)
            .target(config.cache_target())
            .credentials(config.credentials)
            .client_config(client_config)
            .build()?;

        Ok(Self {
            resolver,
            reference,
        })
    }

    /// Returns the requested image reference.
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl ImageProvider for CatalogProvider {
    fn image(&self) -> Result<PathBuf> {
        self.resolver.resolve(&self.reference)
    }
}
