//! Shade - a local-first unit loader
//!
//! A [`UnitLoader`] resolves logical unit names (`pkg.sub.Name`) against its
//! own ordered search path before asking the host, and memoizes what it
//! materializes. Each loader instance is an isolated namespace.
//!
//! # Architecture
//!
//! ```text
//! shade-config  - configuration data (search paths, extensions, logging)
//! shade-vfs     - filesystem boundary
//! shade-log     - explicitly passed logger with ring-buffer sinks
//! shade-core    - resolver, loader, host trait, unit images
//! shade-cli     - `shade` command line
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use shade::{open, ProjectConfig};
//!
//! let mut project = ProjectConfig::default();
//! project.loader.search_path = vec!["lib".to_string()];
//! let loader = open(&project)?;
//! let unit = loader.resolve_unit("pkg.X")?;
//! println!("{} ({:?})", unit.name(), unit.origin());
//! ```

use std::sync::Arc;

pub use shade_config;
pub use shade_core;
pub use shade_log;
pub use shade_vfs;

pub use shade_config::{HostConfig, LoaderConfig, LoggingConfig, ProjectConfig};
pub use shade_core::{
    Host, HostError, ImageHost, ImageWriter, LoadError, NotFoundCause, Origin, ResourceLocation,
    Unit, UnitLoader,
};
pub use shade_log::Logger;

/// Build a loader over an [`ImageHost`] from a project configuration
pub fn open(project: &ProjectConfig) -> Result<UnitLoader<ImageHost>, LoadError> {
    open_with_logger(project, Logger::noop())
}

/// Same as [`open`], with the loader and host logging to `logger`
pub fn open_with_logger(
    project: &ProjectConfig,
    logger: Arc<Logger>,
) -> Result<UnitLoader<ImageHost>, LoadError> {
    UnitLoader::<ImageHost>::from_project(project, logger)
}
