//! shade-log - 结构化日志系统
//!
//! 为 Shade 加载器设计的结构化日志系统，特点：
//! - **显式传递**：无全局 logger，`Arc<Logger>` 通过构造器传入
//! - **非阻塞**：环形缓冲区满了覆盖旧数据
//! - **可观测**：测试通过环形缓冲区检查诊断输出（如缓存命中）
//!
//! # 快速开始
//!
//! ```ignore
//! use shade_log::{LogConfig, debug};
//!
//! let (logger, ring) = LogConfig::dev().init();
//! debug!(logger, "loader ready");
//! ```

mod config;
mod logger;
mod macros;
mod record;
mod ring_buffer;

pub use config::{LogConfig, OutputConfig};
pub use logger::{FileSink, LogSink, Logger, StderrSink, StdoutSink};
pub use record::{Level, Record};
pub use ring_buffer::{LogRingBuffer, RingBufferStats};

// 宏通过 #[macro_export] 自动导出到 crate 根：
// trace!, debug!, info!, warn!, error!, log!

/// 日志结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// 日志系统错误类型
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO错误（文件 sink）
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 无法识别的日志级别
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),
}
