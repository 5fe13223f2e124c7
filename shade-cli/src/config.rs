//! CLI 配置
//!
//! 项目文件 `shade.json` 的读取，以及按组件划分的日志级别

use crate::error::CliError;
use shade_config::{Component, LogLevel, LoggingConfig, ProjectConfig};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::Level;

/// 默认项目文件名
pub const DEFAULT_PROJECT_FILE: &str = "shade.json";

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    /// 组件级覆盖（来自 `shade.json` 的 `logging.components`）
    pub components: BTreeMap<Component, Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::INFO,
            components: BTreeMap::new(),
        }
    }
}

impl LogConfig {
    /// 从项目文件的日志配置创建
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        Self {
            global: tracing_level(logging.level),
            components: logging
                .components
                .iter()
                .map(|(component, level)| (*component, tracing_level(*level)))
                .collect(),
        }
    }

    /// Get log level for a specific component
    pub fn level_for(&self, component: Component) -> Level {
        self.components.get(&component).copied().unwrap_or(self.global)
    }
}

/// `shade-log` 日志器的级别：全局与各组件中最详细的那个，
/// 其余过滤交给 tracing 的 `Targets`
pub fn shade_logger_level(logging: &LoggingConfig) -> shade_log::Level {
    logging
        .components
        .values()
        .map(|level| shade_level(*level))
        .fold(shade_level(logging.level), Ord::min)
}

pub fn tracing_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}

pub fn shade_level(level: LogLevel) -> shade_log::Level {
    match level {
        LogLevel::Trace => shade_log::Level::Trace,
        LogLevel::Debug => shade_log::Level::Debug,
        LogLevel::Info => shade_log::Level::Info,
        LogLevel::Warn => shade_log::Level::Warn,
        LogLevel::Error => shade_log::Level::Error,
    }
}

/// 读取项目文件
///
/// 未显式指定且默认文件不存在时使用默认配置；显式指定的文件必须存在。
pub fn read_project_config(path: Option<&Path>) -> Result<ProjectConfig, CliError> {
    let (path, explicit) = match path {
        Some(p) => (p, true),
        None => (Path::new(DEFAULT_PROJECT_FILE), false),
    };

    if !explicit && !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// 命令行给出的目录排在配置文件之前
pub fn prepend_paths(configured: &mut Vec<String>, from_cli: &[String]) {
    if from_cli.is_empty() {
        return;
    }
    let mut merged = from_cli.to_vec();
    merged.append(configured);
    *configured = merged;
}
