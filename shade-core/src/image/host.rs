//! 基于单元镜像的宿主实现
//!
//! 宿主自身的解析顺序：内置单元 → 宿主搜索路径（带独立缓存）。
//! 由加载器物化的单元标记为 [`Origin::Defined`]，宿主自己解析到的单元标记为
//! [`Origin::System`]。

use super::header::UnitFlags;
use super::reader::UnitImage;
use super::ImageError;
use crate::error::LoadError;
use crate::host::{Host, HostError};
use crate::loader::UnitLoader;
use crate::resolver::{unit_relative_path, Resolver};
use shade_config::{HostConfig, ProjectConfig, DEFAULT_UNIT_EXTENSION};
use shade_log::{debug, trace, Logger};
use shade_vfs::{NativeFileSystem, VirtualFileSystem};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// 单元来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// 由某个加载器从其搜索路径读取并物化
    Defined,
    /// 由宿主自身解析（内置或宿主搜索路径）
    System,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Defined => "defined",
            Origin::System => "system",
        }
    }
}

/// 物化后的单元
#[derive(Debug)]
pub struct Unit {
    name: String,
    origin: Origin,
    flags: UnitFlags,
    dependencies: Vec<String>,
    payload: Vec<u8>,
}

impl Unit {
    fn from_image(image: UnitImage, origin: Origin) -> Self {
        Self {
            name: image.name,
            origin,
            flags: image.header.flags,
            dependencies: image.dependencies,
            payload: image.payload,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn is_interface(&self) -> bool {
        self.flags.contains(UnitFlags::IS_INTERFACE)
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

fn malformed(name: &str, err: ImageError) -> HostError {
    HostError::MalformedUnit {
        name: name.to_string(),
        reason: err.to_string(),
    }
}

/// 解释单元镜像的宿主
pub struct ImageHost {
    builtins: RwLock<HashMap<String, Arc<Unit>>>,
    resolver: Resolver,
    suffix: String,
    /// 宿主搜索路径上解析到的单元
    system_cache: Mutex<HashMap<String, Arc<Unit>>>,
    /// `materialize` 成功次数
    materialized: AtomicUsize,
    logger: Arc<Logger>,
}

impl ImageHost {
    /// 没有内置单元、没有搜索路径的宿主
    pub fn new() -> Self {
        Self {
            builtins: RwLock::new(HashMap::new()),
            resolver: Resolver::new(Vec::new(), Arc::new(NativeFileSystem::new())),
            suffix: format!(".{DEFAULT_UNIT_EXTENSION}"),
            system_cache: Mutex::new(HashMap::new()),
            materialized: AtomicUsize::new(0),
            logger: Logger::noop(),
        }
    }

    /// 从配置创建；`unit_extension` 不带前导点
    pub fn from_config(config: &HostConfig, unit_extension: &str) -> Self {
        let mut host = Self::new().with_search_path(config.search_path.clone());
        host.suffix = format!(".{unit_extension}");
        host
    }

    pub fn with_search_path(mut self, search_path: Vec<String>) -> Self {
        self.resolver = Resolver::new(search_path, Arc::new(NativeFileSystem::new()));
        self
    }

    pub fn with_vfs(mut self, vfs: Arc<dyn VirtualFileSystem>) -> Self {
        self.resolver = Resolver::new(self.resolver.search_path().to_vec(), vfs);
        self
    }

    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// 注册内置单元；同名覆盖
    pub fn register_builtin(&self, bytes: &[u8]) -> Result<Arc<Unit>, HostError> {
        let image = UnitImage::parse(bytes).map_err(|e| malformed("<builtin>", e))?;
        let unit = Arc::new(Unit::from_image(image, Origin::System));
        debug!(self.logger, "Registered builtin unit {}", unit.name());
        self.builtins
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(unit.name.clone(), Arc::clone(&unit));
        Ok(unit)
    }

    pub fn search_path(&self) -> &[String] {
        self.resolver.search_path()
    }

    /// 通过 `materialize` 成功物化的单元数
    pub fn materialized_count(&self) -> usize {
        self.materialized.load(Ordering::SeqCst)
    }

    fn builtin(&self, name: &str) -> Option<Arc<Unit>> {
        self.builtins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl Default for ImageHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for ImageHost {
    type Unit = Unit;

    fn materialize(&self, name: &str, bytes: &[u8]) -> Result<Arc<Unit>, HostError> {
        let image = UnitImage::parse(bytes).map_err(|e| malformed(name, e))?;
        if image.name != name {
            return Err(HostError::MalformedUnit {
                name: name.to_string(),
                reason: format!("image declares unit '{}'", image.name),
            });
        }
        self.materialized.fetch_add(1, Ordering::SeqCst);
        trace!(self.logger, "Materialized unit {} ({} bytes)", name, bytes.len());
        Ok(Arc::new(Unit::from_image(image, Origin::Defined)))
    }

    fn default_resolve(&self, name: &str) -> Result<Arc<Unit>, HostError> {
        if let Some(unit) = self.builtin(name) {
            return Ok(unit);
        }

        let mut cache = self
            .system_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(unit) = cache.get(name) {
            return Ok(Arc::clone(unit));
        }

        let path = self
            .resolver
            .locate(&unit_relative_path(name), &self.suffix)
            .ok_or_else(|| HostError::UnitNotFound {
                name: name.to_string(),
            })?;
        let bytes = self
            .resolver
            .read_artifact(&path)
            .map_err(|e| HostError::Unreadable {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let image = UnitImage::parse(&bytes).map_err(|e| malformed(name, e))?;
        if image.name != name {
            return Err(HostError::MalformedUnit {
                name: name.to_string(),
                reason: format!("image declares unit '{}'", image.name),
            });
        }

        debug!(self.logger, "Host resolved unit {} from {}", name, path.display());
        let unit = Arc::new(Unit::from_image(image, Origin::System));
        cache.insert(name.to_string(), Arc::clone(&unit));
        Ok(unit)
    }

    fn link(&self, unit: &Arc<Unit>) -> Result<(), HostError> {
        for dep in unit.dependencies() {
            self.default_resolve(dep)
                .map_err(|e| HostError::LinkFailed {
                    name: unit.name().to_string(),
                    reason: format!("dependency '{dep}': {e}"),
                })?;
        }
        Ok(())
    }
}

impl UnitLoader<ImageHost> {
    /// Loader over an [`ImageHost`], both configured from a project file and
    /// logging to `logger`
    pub fn from_project(project: &ProjectConfig, logger: Arc<Logger>) -> Result<Self, LoadError> {
        let host = ImageHost::from_config(&project.host, &project.loader.unit_extension)
            .with_logger(Arc::clone(&logger));
        Ok(UnitLoader::from_config(&project.loader, host)?.with_logger(logger))
    }
}

impl std::fmt::Debug for ImageHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHost")
            .field("search_path", &self.search_path())
            .field("suffix", &self.suffix)
            .finish()
    }
}
