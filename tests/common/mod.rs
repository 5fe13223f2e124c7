//! 测试辅助工具
//!
//! 在临时目录中搭建加载器/宿主的目录布局

#![allow(dead_code)]

use shade::shade_core::{unit_relative_path, Resolver};
use shade::{ImageWriter, ProjectConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 一次测试用的目录布局：`lib/`、`vendor/`（加载器）与 `sys/`（宿主）
pub struct Layout {
    pub root: TempDir,
}

impl Layout {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        for dir in ["lib", "vendor", "sys"] {
            std::fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        Self { root }
    }

    pub fn dir(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// 加载器搜索 `lib`、`vendor`，宿主搜索 `sys`
    pub fn project(&self) -> ProjectConfig {
        let json = format!(
            r#"{{
                "loader": {{ "search_path": [{lib:?}, {vendor:?}] }},
                "host": {{ "search_path": [{sys:?}] }}
            }}"#,
            lib = self.dir("lib").to_string_lossy(),
            vendor = self.dir("vendor").to_string_lossy(),
            sys = self.dir("sys").to_string_lossy(),
        );
        serde_json::from_str(&json).unwrap()
    }

    /// 在 `dir` 下写入单元镜像
    pub fn put(&self, dir: &str, writer: ImageWriter, name: &str) -> PathBuf {
        write_image(&self.dir(dir), name, &writer.finish().unwrap())
    }

    pub fn put_resource(&self, dir: &str, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.dir(dir).join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }
}

pub fn write_image(base: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = Resolver::candidate(&base.to_string_lossy(), &unit_relative_path(name), ".unit");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, bytes).unwrap();
    path
}

/// payload 为给定文本的单元
pub fn unit(name: &str, payload: &str) -> ImageWriter {
    ImageWriter::new(name).payload(payload.as_bytes().to_vec())
}
