//! VFS Error Types

use thiserror::Error;

/// Result type for VFS operations
pub type VfsResult<T> = Result<T, VfsError>;

/// Error type for VFS operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VfsError {
    /// File or directory not found
    #[error("Path not found: {path}")]
    NotFound { path: String },

    /// Permission denied
    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    /// Fewer bytes were read than the file reported
    #[error("Short read on '{path}': expected {expected} bytes, got {actual}")]
    ShortRead {
        path: String,
        expected: u64,
        actual: u64,
    },

    /// IO error
    #[error("IO error on '{path}': {message}")]
    Io { path: String, message: String },
}

impl VfsError {
    /// Classify an `std::io::Error` raised while accessing `path`
    pub fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        let path = path.to_string_lossy().to_string();
        match err.kind() {
            std::io::ErrorKind::NotFound => VfsError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => VfsError::PermissionDenied { path },
            _ => VfsError::Io {
                path,
                message: err.to_string(),
            },
        }
    }
}
