//! Shade Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Shade crates.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Default file extension for unit artifacts (without the leading dot)
pub const DEFAULT_UNIT_EXTENSION: &str = "unit";

/// Configuration for a unit loader
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Ordered base directories; earlier entries take precedence
    pub search_path: Vec<String>,
    /// Artifact extension for units, e.g. "unit" for `pkg/X.unit`
    pub unit_extension: String,
}

impl LoaderConfig {
    /// Create a config for the given search path with the default extension
    pub fn with_search_path<I, S>(search_path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_path: search_path.into_iter().map(Into::into).collect(),
            unit_extension: DEFAULT_UNIT_EXTENSION.to_string(),
        }
    }

    /// Suffix appended to a unit's relative path, including the leading dot
    pub fn unit_suffix(&self) -> String {
        format!(".{}", self.unit_extension)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            search_path: Vec::new(),
            unit_extension: DEFAULT_UNIT_EXTENSION.to_string(),
        }
    }
}

/// Configuration for the host's own ("system") resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directories the host searches after its built-in units
    pub search_path: Vec<String>,
}

/// Log level names accepted in configuration files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Get the string name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a level name, case-insensitive. "silent" maps to error.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "silent" | "error" => Some(LogLevel::Error),
            "warn" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global level
    pub level: LogLevel,
    /// Per-component overrides, e.g. `{ "loader": "debug" }`
    pub components: BTreeMap<Component, LogLevel>,
    /// Optional log file (appended)
    pub file: Option<String>,
}

impl LoggingConfig {
    /// Effective level for a component
    pub fn level_for(&self, component: Component) -> LogLevel {
        self.components.get(&component).copied().unwrap_or(self.level)
    }
}

/// Component enum for component-specific log targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Loader,
    Host,
    Cli,
}

impl Component {
    /// All components, in target registration order
    pub const ALL: [Component; 3] = [Component::Loader, Component::Host, Component::Cli];

    /// Get the string name of the component
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Loader => "loader",
            Component::Host => "host",
            Component::Cli => "cli",
        }
    }

    /// Get the log target name for this component
    pub fn target(&self) -> String {
        format!("shade::{}", self.as_str())
    }
}

/// Project file (`shade.json`) contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub loader: LoaderConfig,
    pub host: HostConfig,
    pub logging: LoggingConfig,
}
