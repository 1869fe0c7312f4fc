//! HTTP client for catalog service communication.
//!
//! This module provides a thin blocking HTTP client built on reqwest for
//! talking to the image catalog service: one endpoint listing the available
//! images with their metadata, and one streaming raw image bytes for a given
//! identifier. Resolution is deliberately synchronous (the sandbox host
//! blocks on it), so the blocking reqwest client is used throughout.

use crate::auth::Credentials;
use crate::catalog::ImageMetadata;
use crate::error::{ImageError, Result};
use reqwest::StatusCode;
use reqwest::blocking::{Client as ReqwestClient, Response};
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;


/// Response from the image listing endpoint.
#[derive(Debug, Deserialize)]
struct ListImagesResponse {
    /// Image metadata entries on this page
    images: Vec<ImageMetadata>,
    /// Path of the next page, when the listing is paginated
    #[serde(default)]
    next: Option<String>,
}

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use vmimage::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(60)
///     .with_max_idle_per_host(20);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_idle_per_host: 10,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    ///
    /// The timeout covers the whole request, including reading the body, so
    /// it also bounds how long an image download may take.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }
}

/// A lazy byte stream over one image's raw bytes.
///
/// Wraps the in-flight download response; bytes are pulled from the catalog
/// service as the stream is read. Single-pass and not restartable.
#[derive(Debug)]
pub struct ImageStream {
    response: Response,
}

impl ImageStream {
    /// Returns the total byte count, when the catalog service reports one.
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }
}

impl Read for ImageStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.response.read(buf)
    }
}

/// HTTP client for catalog service operations.
///
/// Handles all HTTP communication with the catalog service, including
/// connection pooling, timeouts, and TLS configuration. Credentials are
/// passed per request because bearer tokens are minted per resolution.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    /// Base catalog URL (e.g., "http://localhost:9292")
    catalog_url: String,
}

impl Client {
    /// Creates a new client for the specified catalog URL with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use vmimage::client::Client;
    ///
    /// let client = Client::new("http://localhost:9292").unwrap();
    /// ```
    pub fn new(catalog_url: &str) -> Result<Self> {
        Self::with_config(catalog_url, ClientConfig::default())
    }

    /// Creates a new client for the specified catalog URL with custom configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use vmimage::client::{Client, ClientConfig};
    ///
    /// let config = ClientConfig::new().with_timeout(60);
    /// let client = Client::with_config("http://localhost:9292", config).unwrap();
    /// ```
    pub fn with_config(catalog_url: &str, config: ClientConfig) -> Result<Self> {
        let normalized_url = normalize_url(catalog_url)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| ImageError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            catalog_url: normalized_url,
        })
    }

    /// Returns the base catalog URL.
    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    /// Fetches the full image listing from the catalog service.
    ///
    /// Performs a GET request to the `/v2/images` endpoint and follows the
    /// `next` link in the response body until the listing is exhausted, so
    /// the returned vector always holds every image the service exposes.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Optional credentials attached to each page request
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The catalog service is unreachable
    /// - Authentication is required but not provided or rejected
    /// - The response cannot be parsed as a valid listing
    pub fn fetch_images(&self, credentials: Option<&Credentials>) -> Result<Vec<ImageMetadata>> {
        let mut all_images = Vec::new();
        let mut url = format!("{}/v2/images", self.catalog_url);

        loop {
            let mut request = self.http_client.get(&url);
            if let Some(creds) = credentials
                && let Some(auth_header) = creds.to_header_value()
            {
                request = request.header("Authorization", auth_header);
            }

            let response = request
                .send()
                .map_err(|e| translate_reqwest_error(e, &self.catalog_url))?;

            let response = check_response_status(response)?;

            let listing: ListImagesResponse = response.json().map_err(|e| {
                ImageError::validation_with_source("Failed to parse image listing", e)
            })?;

            all_images.extend(listing.images);

            // Check if there's a next page
            if let Some(path) = listing.next {
                // The next link is a path relative to the catalog URL
                url = format!("{}{}", self.catalog_url, path);
            } else {
                break;
            }
        }

        Ok(all_images)
    }

    /// Opens the raw byte stream for a specific image.
    ///
    /// Performs a GET request to the `/v2/images/{id}/file` endpoint and
    /// returns the response body as a lazy [`ImageStream`]. No bytes beyond
    /// the response headers are consumed until the stream is read.
    ///
    /// # Arguments
    ///
    /// * `identifier` - The unique image identifier (not the display name)
    /// * `credentials` - Optional credentials attached to the request
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The catalog service is unreachable
    /// - The image does not exist
    /// - Authentication is required but not provided or rejected
    pub fn open_image(
        &self,
        identifier: &str,
        credentials: Option<&Credentials>,
    ) -> Result<ImageStream> {
        let url = format!("{}/v2/images/{}/file", self.catalog_url, identifier);

        let mut request = self.http_client.get(&url);
        if let Some(creds) = credentials
            && let Some(auth_header) = creds.to_header_value()
        {
            request = request.header("Authorization", auth_header);
        }

        let response = request
            .send()
            .map_err(|e| translate_reqwest_error(e, &self.catalog_url))?;

        let response = check_response_status(response)?;

        Ok(ImageStream { response })
    }
}

/// Normalizes a service URL by ensuring it has a scheme and removing trailing slashes.
pub(crate) fn normalize_url(url: &str) -> Result<String> {
    let url = url.trim();

    if url.is_empty() {
        return Err(ImageError::validation("Service URL cannot be empty"));
    }

    // Add default scheme if missing
    let url = if !url.starts_with("http://") && !url.starts_with("https://") {
        format!("http://{}", url)
    } else {
        url.to_string()
    };

    // Remove trailing slashes
    let url = url.trim_end_matches('/');

    Ok(url.to_string())
}

/// Translates a reqwest error into an ImageError.
pub(crate) fn translate_reqwest_error(error: reqwest::Error, service_url: &str) -> ImageError {
    if error.is_timeout() {
        ImageError::network(format!("Request to {} timed out", service_url))
    } else if error.is_connect() {
        ImageError::network_with_source(
            format!("Failed to connect to service at {}", service_url),
            error,
        )
    } else if error.is_request() {
        ImageError::network_with_source(
            format!("Failed to send request to {}", service_url),
            error,
        )
    } else {
        ImageError::network_with_source(
            format!("Network error communicating with {}", service_url),
            error,
        )
    }
}

/// Checks the HTTP response status and translates errors to ImageError.
pub(crate) fn check_response_status(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    // Try to extract error message from response body
    let url = response.url().to_string();
    let error_body = response
        .text()
        .unwrap_or_else(|_| String::from("(unable to read response body)"));

    match status {
        StatusCode::UNAUTHORIZED => Err(ImageError::authentication(
            format!("Authentication required for {}: {}", url, error_body),
            Some(401),
        )),
        StatusCode::FORBIDDEN => Err(ImageError::authentication(
            format!("Access forbidden for {}: {}", url, error_body),
            Some(403),
        )),
        StatusCode::NOT_FOUND => Err(ImageError::not_found(url)),
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => Err(ImageError::server(
            format!("Server error from {}: {}", url, error_body),
            status.as_u16(),
        )),
        _ => Err(ImageError::network(format!(
            "HTTP {} from {}: {}",
            status.as_u16(),
            url,
            error_body
        ))),
    }
}
