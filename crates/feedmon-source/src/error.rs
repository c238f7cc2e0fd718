/// Errors that can occur while listing a feed's objects.
///
/// # Examples
///
/// ```rust
/// use feedmon_source::error::SourceError;
///
/// let err = SourceError::Http {
///     source_name: "gcs".to_string(),
///     status: 403,
///     body: "forbidden".to_string(),
/// };
/// assert!(err.to_string().contains("403"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The listing API answered with a non-2xx status.
    #[error("{source_name} listing HTTP error: status={status}, body={body}")]
    Http {
        source_name: String,
        status: u16,
        body: String,
    },

    /// An underlying HTTP transport error from `reqwest`.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The listing response could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the local directory tree failed.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Filesystem error outside the walk itself (e.g. missing bucket directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking listing task panicked or was cancelled.
    #[error("Listing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Source configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias so callers can write `error::Result<T>`.
pub type Result<T> = std::result::Result<T, SourceError>;
