//! Catalog data model and reference selection.
//!
//! The catalog service lists images as metadata entries; a resolution request
//! names an image either by its unique identifier or by its display name.
//! Display names are not unique, so a name may match several entries. The
//! selection rule here picks the most recently updated match.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};


/// Metadata for one image in the catalog listing.
///
/// `updated_at` is the freshness signal: a local cache file is current when
/// its modification time is strictly newer than this timestamp. The optional
/// fields are carried through from the listing for callers that want them;
/// they play no part in freshness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Opaque unique identifier assigned by the catalog service
    pub id: String,

    /// Human-readable display name, not unique across images
    pub name: String,

    /// Last modification time on the remote side (UTC)
    pub updated_at: DateTime<Utc>,

    /// Image size in bytes, when the catalog reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Content checksum as reported by the catalog (informational only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    /// Catalog-side lifecycle status (e.g., "active")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ImageMetadata {
    /// Returns true when this entry matches a requested reference, either by
    /// exact identifier or by exact display name.
    pub fn matches(&self, reference: &str) -> bool {
        self.id == reference || self.name == reference
    }
}

/// Selects the catalog entry for a requested reference.
///
/// Filters the listing to entries whose identifier or display name equals
/// `reference`, then picks the one with the greatest `updated_at`. This is
/// what makes "request by name" mean "latest matching image". Ties are
/// broken arbitrarily. Returns `None` when nothing matches.
///
/// # Examples
///
/// ```
/// use vmimage::catalog::{ImageMetadata, select_latest};
///
/// let images: Vec<ImageMetadata> = serde_json::from_str(
///     r#"[
///         {"id": "abc", "name": "ubuntu", "updated_at": "2020-01-01T00:00:00Z"},
///         {"id": "def", "name": "ubuntu", "updated_at": "2021-06-01T00:00:00Z"}
///     ]"#,
/// )
/// .unwrap();
///
/// let selected = select_latest(&images, "ubuntu").unwrap();
/// assert_eq!(selected.id, "def");
/// ```
pub fn select_latest<'a>(
    images: &'a [ImageMetadata],
    reference: &str,
) -> Option<&'a ImageMetadata> {
    images
        .iter()
        .filter(|image| image.matches(reference))
        .max_by_key(|image| image.updated_at)
}
