//! High-level image resolution.
//!
//! This module provides the main entry point for mapping an image reference
//! (identifier or display name) to a confirmed-fresh local file path. It
//! orchestrates the credential client, catalog client, and cache modules:
//! look the reference up in the catalog listing, compare the local cache
//! file's modification time against the remote `updated_at`, and download
//! only when the cache is missing or stale.
//!
//! # Examples
//!
//! ```no_run
//! use vmimage::{CacheTarget, Resolver};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = Resolver::builder()
//!         .catalog_url("http://localhost:9292")
//!         .target(CacheTarget::Directory("/var/lib/sandbox/images".into()))
//!         .build()?;
//!
//!     let path = resolver.resolve("ubuntu-server")?;
//!     println!("disk image at {}", path.display());
//!     Ok(())
//! }
//! ```

use crate::auth::{CredentialClient, Credentials, CredentialsConfig};
use crate::cache::{self, CacheTarget};
use crate::catalog::select_latest;
use crate::client::{Client, ClientConfig};
use crate::error::{ImageError, Result};
use std::path::PathBuf;
use tracing::{debug, info};


/// Maps image references to fresh local file paths.
///
/// A `Resolver` is configured with one cache target and holds its
/// collaborator clients for reuse across calls; constructing the clients is
/// the only state it keeps. Every [`resolve`](Resolver::resolve) call fetches
/// catalog metadata anew, so repeated calls observe remote updates.
///
/// Resolution is synchronous and performs no retries: any collaborator
/// failure aborts the call and surfaces to the caller. Concurrent calls
/// against the same target are not coordinated and must be serialized by the
/// caller.
#[derive(Debug)]
pub struct Resolver {
    /// Catalog service client.
    client: Client,
    /// Credential service client, absent for anonymous catalogs.
    credentials: Option<CredentialClient>,
    /// Where the cached image lives.
    target: CacheTarget,
}

impl Resolver {
    /// Creates a resolver from already-constructed collaborator clients.
    ///
    /// This is the dependency-injected form; most callers use
    /// [`Resolver::builder`] instead.
    pub fn new(client: Client, credentials: Option<CredentialClient>, target: CacheTarget) -> Self {
        Self {
            client,
            credentials,
            target,
        }
    }

    /// Create a builder for configuring a resolver.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// Returns the configured cache target.
    pub fn target(&self) -> &CacheTarget {
        &self.target
    }

    /// Resolves an image reference to a local file path, downloading the
    /// image when no fresh cached copy exists.
    ///
    /// The reference may be an image identifier or a display name; when a
    /// name matches several images, the most recently updated one is
    /// selected. The returned path is the effective cache path: the target
    /// itself for a file target, or `<dir>/<identifier>` for a directory
    /// target.
    ///
    /// A cached file whose modification time is strictly newer than the
    /// selected image's `updated_at` is returned without any download. A
    /// missing or stale file is replaced by streaming the remote bytes to a
    /// temporary file and renaming it into place on success.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The reference is empty ([`ImageError::Validation`])
    /// - No catalog entry matches the reference ([`ImageError::NotFound`])
    /// - A collaborator fails (authentication, network, server errors
    ///   surface unchanged, with no retry)
    /// - The cache file cannot be written ([`ImageError::Io`])
    pub fn resolve(&self, reference: &str) -> Result<PathBuf> {
        if reference.trim().is_empty() {
            return Err(ImageError::validation("image reference cannot be empty"));
        }

        let credentials = self.request_credentials()?;

        let images = self.client.fetch_images(credentials.as_ref())?;
        let selected = select_latest(&images, reference)
            .ok_or_else(|| ImageError::not_found(reference))?
            .clone();

        let path = self.target.image_path(&selected.id);

        if cache::is_fresh(&path, selected.updated_at)? {
            debug!(
                image = %selected.id,
                path = %path.display(),
                "cache entry fresh, skipping download"
            );
            return Ok(path);
        }

        info!(
            image = %selected.id,
            name = %selected.name,
            "downloading image from catalog"
        );

        let mut stream = self
            .client
            .open_image(&selected.id, credentials.as_ref())?;
        let bytes = cache::write_stream(&path, &mut stream)?;

        info!(
            image = %selected.id,
            bytes,
            path = %path.display(),
            "image download complete"
        );

        Ok(path)
    }

    /// Mints request credentials for this resolution, or `None` for
    /// anonymous catalogs. The bearer token lives only for this call.
    fn request_credentials(&self) -> Result<Option<Credentials>> {
        match &self.credentials {
            Some(client) => {
                let session = client.authenticate()?;
                Ok(Some(Credentials::bearer(client.get_token(&session))))
            }
            None => Ok(None),
        }
    }
}

/// Builder for creating a [`Resolver`] with custom configuration.
///
/// # Examples
///
/// ```no_run
/// use vmimage::{CacheTarget, CredentialsConfig, Resolver};
/// use vmimage::client::ClientConfig;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = CredentialsConfig {
///         auth_url: Some("http://localhost:5000".to_string()),
///         username: Some("sandbox".to_string()),
///         password: Some("secret".to_string()),
///         ..Default::default()
///     };
///
///     let resolver = Resolver::builder()
///         .catalog_url("http://localhost:9292")
///         .target_path("/var/lib/sandbox/images")
///         .credentials(credentials)
///         .client_config(ClientConfig::new().with_timeout(120))
///         .build()?;
///     # let _ = resolver;
///     Ok(())
/// }
/// ```
pub struct ResolverBuilder {
    catalog_url: Option<String>,
    target: Option<CacheTarget>,
    credentials: Option<CredentialsConfig>,
    client_config: ClientConfig,
}

impl ResolverBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            catalog_url: None,
            target: None,
            credentials: None,
            client_config: ClientConfig::default(),
        }
    }

    /// Set the catalog service URL.
    pub fn catalog_url(mut self, url: &str) -> Self {
        self.catalog_url = Some(url.to_string());
        self
    }

    /// Set the cache target explicitly.
    pub fn target(mut self, target: CacheTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the cache target from a path, detecting the addressing mode from
    /// the current filesystem state (existing directory caches per
    /// identifier, anything else caches in place).
    pub fn target_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = Some(CacheTarget::detect(path));
        self
    }

    /// Set the credential service parameters. An empty config is treated as
    /// anonymous access.
    pub fn credentials(mut self, credentials: CredentialsConfig) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the transport configuration used for both collaborator clients.
    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = config;
        self
    }

    /// Build the [`Resolver`].
    pub fn build(self) -> Result<Resolver> {
        let catalog_url = self
            .catalog_url
            .ok_or_else(|| ImageError::validation("catalog URL is required"))?;
        let target = self
            .target
            .ok_or_else(|| ImageError::validation("cache target is required"))?;

        let client = Client::with_config(&catalog_url, self.client_config.clone())?;

        let credentials = match self.credentials {
            Some(config) if !config.is_empty() => {
                Some(CredentialClient::with_config(config, self.client_config)?)
            }
            _ => None,
        };

        Ok(Resolver::new(client, credentials, target))
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
