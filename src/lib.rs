//! vmimage - VM Disk Image Resolution Library
//!
//! vmimage fetches virtual-machine disk images from a remote image catalog
//! service and caches them on the local filesystem, for use by sandbox hosts
//! that need disk images on demand.
//!
//! The core decision this library makes is the freshness check: a local copy
//! whose modification time is newer than the remote image's `updated_at`
//! timestamp is served as-is; anything else is re-downloaded with an atomic
//! replace of the cache file.
//!
//! # Quick Start
//!
//! ```no_run
//! use vmimage::{CatalogProvider, ImageProvider, ProviderConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProviderConfig::from_yaml_str(
//!         r#"
//!         target_path: /var/lib/sandbox/images
//!         catalog_url: http://localhost:9292
//!         "#,
//!     )?;
//!
//!     // Resolve an image by display name or identifier. The returned path
//!     // points at a confirmed-fresh local copy.
//!     let provider = CatalogProvider::new(config, "ubuntu-server")?;
//!     let path = provider.image()?;
//!     println!("disk image at {}", path.display());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`Resolver`] - Maps an image reference to a fresh local file path
//! - [`ResolverBuilder`] - Builder for advanced configuration
//! - [`ImageProvider`] - Host plugin capability trait
//! - [`CatalogProvider`] - [`ImageProvider`] backed by a remote catalog
//! - [`ProviderConfig`] - Structured configuration supplied by the host
//! - [`ImageMetadata`] - Catalog listing entry
//! - [`CacheTarget`] - Explicit cache addressing mode (file or directory)
//!
//! # Architecture
//!
//! The library is organized into modules:
//!
//! - **High-level API** ([`resolver`], [`provider`]) - Recommended for most users
//! - **Low-level modules** - Available for advanced use cases (hidden from docs)
//!
//! For most use cases, you should use [`CatalogProvider`] (when driven by a
//! host configuration object) or [`Resolver`] (when wiring clients directly).

#![warn(clippy::all)]

/// Returns the vmimage crate version.
///
/// # Examples
///
/// ```
/// let version = vmimage::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// High-level public API (main entry points)
mod provider;
mod resolver;
pub use provider::{CatalogProvider, ImageProvider};
pub use resolver::{Resolver, ResolverBuilder};

// Re-export commonly used types for convenience
pub use auth::{Credentials, CredentialsConfig};
pub use cache::CacheTarget;
pub use catalog::ImageMetadata;
pub use config::{Layout, ProviderConfig};
pub use error::{ImageError, Result};

// Low-level implementation modules (hidden from docs but still public)
// These are available for advanced users who need fine-grained control
#[doc(hidden)]
pub mod auth;
#[doc(hidden)]
pub mod cache;
#[doc(hidden)]
pub mod catalog;
#[doc(hidden)]
pub mod client;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod error;
