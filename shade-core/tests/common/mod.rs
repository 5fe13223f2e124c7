//! 测试辅助工具
//!
//! 真实临时目录 + 计数文件系统，用于观察读取次数

#![allow(dead_code)]

use shade_core::{unit_relative_path, ImageWriter, Resolver};
use shade_vfs::{ensure_complete, NativeFileSystem, VfsResult, VirtualFileSystem};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 统计 `read_file` 调用次数的文件系统
#[derive(Debug, Default)]
pub struct CountingFileSystem {
    inner: NativeFileSystem,
    reads: AtomicUsize,
}

impl CountingFileSystem {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl VirtualFileSystem for CountingFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }
}

/// 只交付一半内容的文件系统（模拟被截断的读取）
#[derive(Debug, Default)]
pub struct HalfReadFileSystem {
    inner: NativeFileSystem,
}

impl VirtualFileSystem for HalfReadFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let mut content = self.inner.read_file(path)?;
        let expected = content.len() as u64;
        content.truncate(content.len() / 2);
        ensure_complete(path, expected, content)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }
}

pub fn base(dir: &Path) -> String {
    dir.to_string_lossy().to_string()
}

/// 一个合法的单元镜像，payload 为单元名
pub fn image_for(name: &str) -> Vec<u8> {
    ImageWriter::new(name)
        .payload(name.as_bytes().to_vec())
        .finish()
        .unwrap()
}

/// 在 `dir` 下写入单元文件，返回其路径
pub fn write_raw(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = Resolver::candidate(&base(dir), &unit_relative_path(name), ".unit");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, bytes).unwrap();
    path
}

pub fn write_unit(dir: &Path, name: &str) -> PathBuf {
    write_raw(dir, name, &image_for(name))
}
