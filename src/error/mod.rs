//! Error types for vmimage
//!
//! This module provides the error taxonomy for all resolution operations.
//! Collaborator failures (credential service, catalog service, filesystem)
//! surface with their own kind and are never retried or wrapped further.

use thiserror::Error;

#[cfg(test)]
mod tests;

/// Main error type for vmimage operations
#[derive(Error, Debug)]
pub enum ImageError {
    /// No catalog entry matches the requested reference (or a URL returned 404)
    #[error("not found: {reference}")]
    NotFound { reference: String },

    /// Network-related errors (connection, timeout, DNS)
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication errors (401, 403, token issues)
    #[error("authentication error (status: {status_code:?}): {message}")]
    Authentication {
        message: String,
        status_code: Option<u16>,
    },

    /// Server errors (500, 503)
    #[error("server error (status: {status_code}): {message}")]
    Server { message: String, status_code: u16 },

    /// Validation errors (invalid URL, malformed listing, empty reference)
    #[error("validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (missing or unparseable provider parameters)
    #[error("configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Filesystem errors while writing the cache entry, propagated unchanged
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for vmimage operations
pub type Result<T> = std::result::Result<T, ImageError>;

impl ImageError {
    /// Creates a new not found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use vmimage::error::ImageError;
    ///
    /// let err = ImageError::not_found("ubuntu-server");
    /// assert!(matches!(err, ImageError::NotFound { .. }));
    /// ```
    pub fn not_found<S: Into<String>>(reference: S) -> Self {
        Self::NotFound {
            reference: reference.into(),
        }
    }

    /// Creates a new network error.
    ///
    /// # Examples
    ///
    /// ```
    /// use vmimage::error::ImageError;
    ///
    /// let err = ImageError::network("connection refused");
    /// assert!(matches!(err, ImageError::Network { .. }));
    /// ```
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error with a source error.
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new authentication error.
    ///
    /// # Examples
    ///
    /// ```
    /// use vmimage::error::ImageError;
    ///
    /// let err = ImageError::authentication("invalid credentials", Some(401));
    /// assert!(matches!(err, ImageError::Authentication { .. }));
    /// ```
    pub fn authentication<S: Into<String>>(message: S, status_code: Option<u16>) -> Self {
        Self::Authentication {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new server error.
    pub fn server<S: Into<String>>(message: S, status_code: u16) -> Self {
        Self::Server {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use vmimage::error::ImageError;
    ///
    /// let err = ImageError::validation("image reference cannot be empty");
    /// assert!(matches!(err, ImageError::Validation { .. }));
    /// ```
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new validation error with a source error.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
