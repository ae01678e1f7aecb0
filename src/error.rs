//! Error types for the acquisition pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error produced by an [`crate::fetch::AssetSource`] when no response arrives.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal pipeline failures. Everything else (rejected candidates, cache and history I/O,
/// per-display wallpaper errors) is handled inside the pipeline and only logged.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The identifier range cannot supply the requested number of candidates.
    #[error("identifier range produced no candidates")]
    EmptySequence,

    /// Every candidate was rejected by the remote host.
    #[error("candidate sequence exhausted after {attempts} attempts without a successful fetch")]
    Exhausted {
        /// Number of candidates tried.
        attempts: usize,
    },

    /// No response for a request (connection, DNS, TLS, timeout, body read).
    #[error("transport failure fetching {url}: {source}")]
    Transport {
        /// Locator being fetched.
        url: String,
        /// Underlying transport error.
        #[source]
        source: TransportError,
    },

    /// The cache directory or history file could not be prepared.
    #[error("failed to prepare {}: {source}", .path.display())]
    Bootstrap {
        /// Path that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
