//! VirtualFileSystem trait definition

use crate::error::VfsResult;
use std::path::Path;

/// Virtual File System trait
///
/// Provides the read-only file operations the loader needs, decoupling it
/// from `std::fs`.
///
/// # Implementations
/// - `NativeFileSystem`: Native OS file system
pub trait VirtualFileSystem: Send + Sync {
    /// Read the complete file contents
    ///
    /// # Arguments
    /// * `path` - File path
    ///
    /// # Returns
    /// File contents as bytes, or VfsError. A read that yields fewer bytes
    /// than the file's reported length is an error, never a truncated Ok.
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>>;

    /// Check if path exists
    ///
    /// Plain existence check, no permission probing.
    fn exists(&self, path: &Path) -> bool;
}
