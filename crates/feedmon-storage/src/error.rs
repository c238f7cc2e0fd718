/// Errors that can occur within the storage layer.
///
/// # Examples
///
/// ```rust
/// use feedmon_storage::error::StorageError;
///
/// let err = StorageError::InvalidDate {
///     column: "date",
///     value: "2025-13-01".to_string(),
/// };
/// assert!(err.to_string().contains("2025-13-01"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An underlying SQLite error.
    #[error("Storage: SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Creating the database directory failed.
    #[error("Storage: I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored date could not be parsed back into a calendar date.
    #[error("Storage: invalid date in column '{column}': {value}")]
    InvalidDate { column: &'static str, value: String },

    /// A stored count does not fit the domain type (e.g. negative).
    #[error("Storage: value out of range in column '{column}': {value}")]
    OutOfRange { column: &'static str, value: i64 },
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
