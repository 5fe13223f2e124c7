//! Loader error taxonomy

use crate::host::HostError;
use shade_vfs::VfsError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a unit could not be produced
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotFoundCause {
    /// The artifact was located but could not be fully read
    #[error("cannot load unit from '{}'", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: VfsError,
    },

    /// The host rejected the artifact bytes
    #[error("format of unit file '{}' incorrect", path.display())]
    MalformedUnit {
        path: PathBuf,
        #[source]
        source: HostError,
    },

    /// Not on the search path, and the host's own resolution failed
    #[error("host resolution failed")]
    Delegated(#[source] HostError),
}

/// Errors returned by [`crate::UnitLoader`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Neither the search path nor the host produced the unit
    #[error("unit '{name}' not found")]
    UnitNotFound {
        name: String,
        #[source]
        cause: Option<NotFoundCause>,
    },

    /// Construction-time misconfiguration
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The unit was produced but the host could not link it
    #[error("cannot link unit '{name}'")]
    LinkFailed {
        name: String,
        #[source]
        source: HostError,
    },

    /// A located resource could not be read
    #[error("cannot read resource '{}'", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: VfsError,
    },
}

impl LoadError {
    /// Underlying cause of a `UnitNotFound`
    pub fn cause(&self) -> Option<&NotFoundCause> {
        match self {
            LoadError::UnitNotFound { cause, .. } => cause.as_ref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::UnitNotFound { .. })
    }

    pub fn is_io_failure(&self) -> bool {
        matches!(self.cause(), Some(NotFoundCause::IoFailure { .. }))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.cause(), Some(NotFoundCause::MalformedUnit { .. }))
    }

    pub fn is_delegated(&self) -> bool {
        matches!(self.cause(), Some(NotFoundCause::Delegated(_)))
    }
}
