//! Native file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A native OS file system implementation.
///
/// This wraps `std::fs` operations and provides the `VirtualFileSystem`
/// interface for local file access.
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    /// Create a new native file system.
    pub fn new() -> Self {
        Self
    }
}

/// Check that a read produced as many bytes as the file reported.
///
/// Growing files are accepted (the extra bytes were really read); a shrunk
/// or interrupted read is `VfsError::ShortRead`.
pub fn ensure_complete(path: &Path, expected: u64, content: Vec<u8>) -> VfsResult<Vec<u8>> {
    let actual = content.len() as u64;
    if actual < expected {
        return Err(VfsError::ShortRead {
            path: path.to_string_lossy().to_string(),
            expected,
            actual,
        });
    }
    Ok(content)
}

impl VirtualFileSystem for NativeFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let mut file = File::open(path).map_err(|e| VfsError::from_io(path, e))?;
        let expected = file.metadata().map_err(|e| VfsError::from_io(path, e))?.len();

        let mut content = Vec::with_capacity(usize::try_from(expected).unwrap_or(0));
        file.read_to_end(&mut content)
            .map_err(|e| VfsError::from_io(path, e))?;

        ensure_complete(path, expected, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
