//! CLI 错误

use shade_core::{ImageError, LoadError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("cannot read '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse project file '{}'", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode output")]
    Json(#[source] serde_json::Error),

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),

    #[error("cannot initialize logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("cannot build unit image")]
    Image(#[from] ImageError),
}
