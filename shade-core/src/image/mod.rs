//! Unit image format and the host that materializes it
//!
//! # 文件格式
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Header (8 bytes): "SHDU" major minor flags   │
//! ├──────────────────────────────────────────────┤
//! │ Name: u16 len + UTF-8                        │
//! ├──────────────────────────────────────────────┤
//! │ Dependencies: u16 count × (u16 len + UTF-8)  │
//! ├──────────────────────────────────────────────┤
//! │ Payload: u32 len + bytes                     │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. Any byte after the payload makes the image
//! malformed.

mod header;
mod host;
mod reader;
mod writer;

pub use header::{ImageHeader, UnitFlags, HEADER_SIZE, MAGIC, VERSION_MAJOR, VERSION_MINOR};
pub use host::{ImageHost, Origin, Unit};
pub use reader::UnitImage;
pub use writer::ImageWriter;

use thiserror::Error;

/// 镜像解析/写入错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("bad magic {found:02X?}, expected \"SHDU\"")]
    BadMagic { found: Vec<u8> },

    #[error("unsupported image version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("truncated image: need {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("{count} trailing bytes after payload")]
    TrailingBytes { count: usize },

    #[error("{field} too long: {len} bytes")]
    FieldTooLong { field: &'static str, len: usize },

    #[error("unit name is empty")]
    EmptyName,
}
