//! CLI 日志系统初始化
//!
//! 基于 `tracing-subscriber` 实现按组件的日志控制；加载器自身的
//! `shade-log` 记录经 [`TracingSink`] 转发进 `tracing`。

use crate::config::LogConfig;
use crate::error::CliError;
use shade_config::Component;
use shade_log::{Level, LogSink, Record};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// 日志输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// 彩色格式化（开发使用）
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式（工具集成）
    Json,
}

/// 使用指定格式和日志配置初始化日志系统
///
/// 日志写到 stderr，stdout 只留给命令结果。指定文件时额外追加到文件。
pub fn init_with_file(
    log_config: &LogConfig,
    format: LogFormat,
    file: Option<&Path>,
) -> Result<(), CliError> {
    let targets = Component::ALL
        .into_iter()
        .fold(Targets::new().with_default(log_config.global), |targets, component| {
            targets.with_target(component.target(), log_config.level_for(component))
        });

    let file_layer = match file {
        Some(path) => {
            let handle = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| CliError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(handle))
                    .with_filter(targets.clone()),
            )
        }
        None => None,
    };

    let console_layer = create_format_layer(format, io::stderr).with_filter(targets);
    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

/// Create formatter layer based on format
fn create_format_layer<W, F>(format: LogFormat, make_writer: F) -> impl Layer<tracing_subscriber::Registry>
where
    W: io::Write + Send + Sync + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}

/// 按模块路径归属组件
pub fn component_for(module_path: &str) -> Component {
    if module_path.contains("loader") {
        Component::Loader
    } else if module_path.contains("image") || module_path.contains("host") {
        Component::Host
    } else {
        Component::Cli
    }
}

// tracing 的 target 必须是常量
macro_rules! forward {
    ($target:literal, $record:expr) => {
        match $record.level {
            Level::Trace => tracing::trace!(target: $target, module = $record.target, "{}", $record.message),
            Level::Debug => tracing::debug!(target: $target, module = $record.target, "{}", $record.message),
            Level::Info => tracing::info!(target: $target, module = $record.target, "{}", $record.message),
            Level::Warn => tracing::warn!(target: $target, module = $record.target, "{}", $record.message),
            Level::Error => tracing::error!(target: $target, module = $record.target, "{}", $record.message),
        }
    };
}

/// 将 `shade-log` 记录转发到 `tracing`
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: &Record) {
        match component_for(record.target) {
            Component::Loader => forward!("shade::loader", record),
            Component::Host => forward!("shade::host", record),
            Component::Cli => forward!("shade::cli", record),
        }
    }
}
