//! Local-first unit loader
//!
//! `UnitLoader` resolves a logical name in this order:
//!
//! 1. its own cache
//! 2. its own search path (read, then [`Host::materialize`], then cache)
//! 3. [`Host::default_resolve`], returned as-is and never cached here
//!
//! This is the reverse of parent-first delegation. Units on the private
//! search path shadow the host's units of the same name, which isolates the
//! loader but also means a shared unit found privately is a *different* unit
//! from the host's copy.

use crate::error::{LoadError, NotFoundCause};
use crate::host::Host;
use crate::resolver::{unit_relative_path, Resolver, ResourceLocation};
use shade_config::LoaderConfig;
use shade_log::{debug, warn, Level, Logger};
use shade_vfs::{NativeFileSystem, VirtualFileSystem};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Cache<U> = HashMap<String, Arc<U>>;

/// Unit loader with a private search path and a per-instance cache
pub struct UnitLoader<H: Host> {
    resolver: Resolver,
    /// Suffix appended to unit paths, e.g. ".unit"
    unit_suffix: String,
    host: H,
    /// name → handle. Also the lock serializing every resolution.
    cache: Mutex<Cache<H::Unit>>,
    logger: Arc<Logger>,
}

impl<H: Host> UnitLoader<H> {
    /// Create a loader over `search_path` with the default unit extension.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the search path is empty. Base directories
    /// that do not exist are accepted and skipped at lookup time.
    pub fn new<I, S>(search_path: I, host: H) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_config(&LoaderConfig::with_search_path(search_path), host)
    }

    /// Create a loader from configuration
    pub fn from_config(config: &LoaderConfig, host: H) -> Result<Self, LoadError> {
        if config.search_path.is_empty() {
            return Err(LoadError::InvalidConfiguration(
                "search path must contain at least one base location".to_string(),
            ));
        }
        if config.unit_extension.is_empty() || config.unit_extension.starts_with('.') {
            return Err(LoadError::InvalidConfiguration(format!(
                "unit extension '{}' must be non-empty and given without a leading dot",
                config.unit_extension
            )));
        }

        Ok(Self {
            resolver: Resolver::new(config.search_path.clone(), Arc::new(NativeFileSystem::new())),
            unit_suffix: config.unit_suffix(),
            host,
            cache: Mutex::new(HashMap::new()),
            logger: Logger::noop(),
        })
    }

    /// Set the logger used for diagnostics
    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the filesystem boundary
    pub fn with_vfs(mut self, vfs: Arc<dyn VirtualFileSystem>) -> Self {
        self.resolver = Resolver::new(self.resolver.search_path().to_vec(), vfs);
        self
    }

    /// Resolve a unit to its handle.
    ///
    /// Once a name has been materialized from the search path, every later
    /// call returns the identical handle.
    pub fn resolve_unit(&self, name: &str) -> Result<Arc<H::Unit>, LoadError> {
        self.load_unit(name, false)
    }

    /// Resolve a unit and, if `link` is set, link it through the host.
    pub fn load_unit(&self, name: &str, link: bool) -> Result<Arc<H::Unit>, LoadError> {
        let mut cache = self.lock_cache();
        let unit = self.find_unit(&mut cache, name)?;
        if link {
            self.host
                .link(&unit)
                .map_err(|source| LoadError::LinkFailed {
                    name: name.to_string(),
                    source,
                })?;
        }
        Ok(unit)
    }

    fn find_unit(&self, cache: &mut Cache<H::Unit>, name: &str) -> Result<Arc<H::Unit>, LoadError> {
        if let Some(unit) = cache.get(name) {
            debug!(self.logger, "Unit {} found in cache.", name);
            return Ok(Arc::clone(unit));
        }

        let relative = unit_relative_path(name);
        let Some(path) = self.resolver.locate(&relative, &self.unit_suffix) else {
            if self.logger.is_enabled(Level::Debug) {
                let tried = self.resolver.candidates(&relative, &self.unit_suffix);
                let tried: Vec<_> = tried.iter().map(|p| p.display().to_string()).collect();
                debug!(
                    self.logger,
                    "Unit {} not on search path (tried {}), delegating to host",
                    name,
                    tried.join(", ")
                );
            }
            return self.host.default_resolve(name).map_err(|e| LoadError::UnitNotFound {
                name: name.to_string(),
                cause: Some(NotFoundCause::Delegated(e)),
            });
        };

        debug!(self.logger, "Unit {} found in {}", name, path.display());
        let unit = self.define_from(name, &path)?;
        cache.insert(name.to_string(), Arc::clone(&unit));
        Ok(unit)
    }

    /// Read and materialize the artifact at `path`. Never touches the cache.
    fn define_from(&self, name: &str, path: &Path) -> Result<Arc<H::Unit>, LoadError> {
        let bytes = self.resolver.read_artifact(path).map_err(|source| {
            warn!(self.logger, "Cannot load unit {}: {}", name, source);
            LoadError::UnitNotFound {
                name: name.to_string(),
                cause: Some(NotFoundCause::IoFailure {
                    path: path.to_path_buf(),
                    source,
                }),
            }
        })?;

        self.host.materialize(name, &bytes).map_err(|source| {
            warn!(self.logger, "Format of unit file incorrect for unit {}: {}", name, source);
            LoadError::UnitNotFound {
                name: name.to_string(),
                cause: Some(NotFoundCause::MalformedUnit {
                    path: path.to_path_buf(),
                    source,
                }),
            }
        })
    }

    /// Locate a resource by name on the search path.
    ///
    /// The name is used as-is (no separator rewriting, no suffix). Absence is
    /// `None`, never an error.
    pub fn resolve_resource(&self, name: &str) -> Option<ResourceLocation> {
        self.resolver.locate(name, "").map(ResourceLocation::new)
    }

    /// Read the full contents of a located resource
    pub fn read_resource(&self, location: &ResourceLocation) -> Result<Vec<u8>, LoadError> {
        self.resolver
            .read_artifact(location.path())
            .map_err(|source| LoadError::Resource {
                path: location.path().to_path_buf(),
                source,
            })
    }

    /// Cached handle for `name`, without resolving
    pub fn cached(&self, name: &str) -> Option<Arc<H::Unit>> {
        self.lock_cache().get(name).cloned()
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.lock_cache().contains_key(name)
    }

    /// Number of units materialized by this loader
    pub fn cache_size(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn search_path(&self) -> &[String] {
        self.resolver.search_path()
    }

    pub fn unit_suffix(&self) -> &str {
        &self.unit_suffix
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    // The cache is only written after a successful materialization, so a
    // guard recovered from a poisoned lock is still consistent.
    fn lock_cache(&self) -> MutexGuard<'_, Cache<H::Unit>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H: Host> std::fmt::Debug for UnitLoader<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitLoader")
            .field("search_path", &self.search_path())
            .field("unit_suffix", &self.unit_suffix)
            .field("cached", &self.cache_size())
            .finish()
    }
}
