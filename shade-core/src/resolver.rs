//! 单元解析器
//!
//! 将逻辑名解析为搜索路径上的具体文件，不涉及缓存与物化。
//!
//! # 解析规则
//! - 候选路径为 `base + 路径分隔符 + relative + suffix`
//! - 按搜索路径顺序检查存在性，第一个存在的即为结果
//! - 不存在的基目录直接跳过，不报错
//!
//! 例：搜索路径 `["/a", "/b"]`，`locate("pkg/X", ".unit")` 依次检查
//! `/a/pkg/X.unit`、`/b/pkg/X.unit`。

use shade_vfs::{VfsResult, VirtualFileSystem};
use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};
use std::sync::Arc;
use url::Url;

/// 将逻辑名（`pkg.sub.Name`）转换为相对路径（`pkg/sub/Name`）
pub fn unit_relative_path(name: &str) -> String {
    name.replace('.', MAIN_SEPARATOR_STR)
}

/// 搜索路径解析器
///
/// 无可变状态，可被任意多个线程并发调用。
#[derive(Clone)]
pub struct Resolver {
    /// 基目录列表（构造后不再修改）
    search_path: Arc<[String]>,
    /// 文件系统边界
    vfs: Arc<dyn VirtualFileSystem>,
}

impl Resolver {
    /// 创建解析器
    ///
    /// 不做去重或校验；空列表得到一个永远找不到东西的解析器。
    pub fn new(search_path: Vec<String>, vfs: Arc<dyn VirtualFileSystem>) -> Self {
        Self {
            search_path: search_path.into(),
            vfs,
        }
    }

    /// 搜索路径（按优先级排列）
    pub fn search_path(&self) -> &[String] {
        &self.search_path
    }

    /// 构造单个候选路径
    pub fn candidate(base: &str, relative_path: &str, suffix: &str) -> PathBuf {
        PathBuf::from(format!("{base}{MAIN_SEPARATOR}{relative_path}{suffix}"))
    }

    /// 按搜索顺序列出所有候选路径（用于诊断 "tried" 列表）
    pub fn candidates(&self, relative_path: &str, suffix: &str) -> Vec<PathBuf> {
        self.search_path
            .iter()
            .map(|base| Self::candidate(base, relative_path, suffix))
            .collect()
    }

    /// 查找第一个存在的候选文件
    ///
    /// # Returns
    /// 找到则返回路径，否则 `None`（未找到是正常结果，不是错误）
    pub fn locate(&self, relative_path: &str, suffix: &str) -> Option<PathBuf> {
        self.search_path
            .iter()
            .map(|base| Self::candidate(base, relative_path, suffix))
            .find(|candidate| self.vfs.exists(candidate))
    }

    /// 完整读取已定位的文件
    pub fn read_artifact(&self, path: &Path) -> VfsResult<Vec<u8>> {
        self.vfs.read_file(path)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("search_path", &self.search_path)
            .finish()
    }
}

/// 资源位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocation {
    path: PathBuf,
}

impl ResourceLocation {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// 文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    /// `file://` URI（相对路径基于当前目录补全为绝对路径）
    ///
    /// 路径无法表示为文件 URI 时返回 `None`（例如当前目录不可用）。
    pub fn to_uri(&self) -> Option<Url> {
        let absolute = if self.path.is_absolute() {
            self.path.clone()
        } else {
            std::env::current_dir().ok()?.join(&self.path)
        };
        Url::from_file_path(absolute).ok()
    }
}
