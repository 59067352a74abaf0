use std::path::PathBuf;

/// Errors from reading a shared-data directory.
#[derive(Debug, thiserror::Error)]
pub enum SharedDataError {
    /// The directory itself does not exist.
    #[error("xcshareddata not found at path {}", path.display())]
    NotFound { path: PathBuf },

    /// Listing or reading a file failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A parser rejected a file's contents.
    #[error("cannot parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Convenience alias for shared-data results.
pub type SharedDataResult<T> = Result<T, SharedDataError>;
