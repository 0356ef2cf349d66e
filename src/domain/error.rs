//! Error types for the zusers plugin.
//!
//! This module defines the crate-wide error type [`ConsoleError`] and the
//! [`Result`] alias used throughout the plugin. Remote call failures have their
//! own taxonomy in [`crate::api::ApiError`] and convert into `ConsoleError`
//! through `#[from]`.

use crate::api::ApiError;
use thiserror::Error;

/// The main error type for plugin operations.
///
/// # Examples
///
/// ```
/// use zusers::domain::ConsoleError;
///
/// fn read_config() -> Result<(), ConsoleError> {
///     Err(ConsoleError::Config("base_url must not be empty".to_string()))
/// }
/// ```
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A remote call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading or writing the persisted session failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    ///
    /// Covers malformed payloads in either direction and storage that was
    /// never initialized.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for plugin operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;
