//! Shade Virtual File System
//!
//! The filesystem boundary used by the resolver and loader. Only the local
//! filesystem is supported; the trait exists so tests can observe and count
//! accesses without touching loader internals.
//!
//! # Usage
//! ```rust,ignore
//! use shade_vfs::{VirtualFileSystem, NativeFileSystem};
//! use std::path::Path;
//!
//! let fs = NativeFileSystem::new();
//! if fs.exists(Path::new("/lib/pkg/X.unit")) {
//!     let bytes = fs.read_file(Path::new("/lib/pkg/X.unit"))?;
//! }
//! ```

mod error;
mod native;
mod r#trait;

pub use error::{VfsError, VfsResult};
pub use native::{ensure_complete, NativeFileSystem};
pub use r#trait::VirtualFileSystem;
