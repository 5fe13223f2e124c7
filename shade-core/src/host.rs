//! Host runtime boundary
//!
//! The loader never interprets unit bytes itself. Turning bytes into an
//! executable unit, and resolving names the loader cannot find, are both
//! delegated to a [`Host`].

use std::sync::Arc;
use thiserror::Error;

/// Errors reported by a host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The bytes are not a well-formed unit for this host
    #[error("malformed unit '{name}': {reason}")]
    MalformedUnit { name: String, reason: String },

    /// The host's own resolution could not find the unit
    #[error("unit '{name}' not found by host")]
    UnitNotFound { name: String },

    /// The host located the unit but could not read it
    #[error("unit '{name}' unreadable: {reason}")]
    Unreadable { name: String, reason: String },

    /// Linking a materialized unit failed
    #[error("cannot link unit '{name}': {reason}")]
    LinkFailed { name: String, reason: String },
}

impl HostError {
    /// Name of the unit the error refers to
    pub fn name(&self) -> &str {
        match self {
            HostError::MalformedUnit { name, .. }
            | HostError::UnitNotFound { name }
            | HostError::Unreadable { name, .. }
            | HostError::LinkFailed { name, .. } => name,
        }
    }
}

/// The host runtime a loader materializes units into.
///
/// Handles are `Arc<Self::Unit>`; two handles denote the same unit iff
/// `Arc::ptr_eq` holds.
pub trait Host: Send + Sync {
    /// Materialized unit type
    type Unit: Send + Sync;

    /// Turn raw artifact bytes into a unit named `name`.
    fn materialize(&self, name: &str, bytes: &[u8]) -> Result<Arc<Self::Unit>, HostError>;

    /// Resolve `name` with the host's own mechanism (built-ins, then its own
    /// search path). The host owns caching for units it resolves here.
    fn default_resolve(&self, name: &str) -> Result<Arc<Self::Unit>, HostError>;

    /// Prepare a unit for execution. No-op unless the host needs it.
    fn link(&self, unit: &Arc<Self::Unit>) -> Result<(), HostError> {
        let _ = unit;
        Ok(())
    }
}

impl<H: Host> Host for Arc<H> {
    type Unit = H::Unit;

    fn materialize(&self, name: &str, bytes: &[u8]) -> Result<Arc<Self::Unit>, HostError> {
        (**self).materialize(name, bytes)
    }

    fn default_resolve(&self, name: &str) -> Result<Arc<Self::Unit>, HostError> {
        (**self).default_resolve(name)
    }

    fn link(&self, unit: &Arc<Self::Unit>) -> Result<(), HostError> {
        (**self).link(unit)
    }
}
