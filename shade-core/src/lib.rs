//! Shade core - local-first unit loading
//!
//! Resolves logical unit names (`pkg.sub.Name`) against an ordered search
//! path, materializes the artifact through a [`Host`], and memoizes the
//! handle per loader instance. Names that are not on the search path are
//! delegated to the host's own resolution.
//!
//! Resolution order is local first, host second. A unit present on the
//! loader's search path shadows the host's copy of the same name, and the two
//! handles are distinct.

pub mod error;
pub mod host;
pub mod image;
pub mod loader;
pub mod resolver;

pub use error::{LoadError, NotFoundCause};
pub use host::{Host, HostError};
pub use image::{ImageError, ImageHost, ImageWriter, Origin, Unit, UnitFlags, UnitImage};
pub use loader::UnitLoader;
pub use resolver::{unit_relative_path, Resolver, ResourceLocation};
