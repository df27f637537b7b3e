//! Error types for the roster client.
//!
//! This module defines the centralized error type [`RosterError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// The main error type for roster operations.
///
/// Remote failures fall into three classes (`Transport`, `NotFound`,
/// `Validation`) which the edit session surfaces to its caller unchanged. The
/// remaining variants cover local concerns: image encoding, configuration and
/// filesystem access.
///
/// # Examples
///
/// ```
/// use roster::RosterError;
///
/// fn lookup(id: i64) -> Result<(), RosterError> {
///     Err(RosterError::NotFound(format!("employee {id}")))
/// }
///
/// assert!(lookup(7).unwrap_err().is_remote());
/// ```
#[derive(Debug, Error)]
pub enum RosterError {
    /// The remote call did not complete: network failure, timeout, 5xx, or a
    /// response body that could not be decoded.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The target record of an update, delete or fetch does not exist on the
    /// remote side.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The payload was rejected as malformed, either by the remote service or
    /// before it was sent (e.g. an update without an id).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Image bytes could not be turned into a data URL.
    ///
    /// The previously staged image is left untouched when this occurs.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The local store file could not be parsed or serialized.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The background worker could not be reached.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

impl RosterError {
    /// Returns `true` for the error classes produced by the remote store.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::NotFound(_) | Self::Validation(_))
    }
}

impl From<reqwest::Error> for RosterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Transport(format!("invalid response body: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// A specialized `Result` type for roster operations.
///
/// This is a type alias for `std::result::Result<T, RosterError>` that simplifies
/// function signatures throughout the codebase.
pub type Result<T> = std::result::Result<T, RosterError>;
