//! 日志配置
//!
//! 提供便捷的日志初始化配置。

use crate::logger::{FileSink, StderrSink, StdoutSink};
use crate::{Level, LogRingBuffer, Logger};
use std::sync::Arc;

/// 日志输出目标配置
#[derive(Clone, Debug, PartialEq)]
pub enum OutputConfig {
    /// 输出到标准输出
    Stdout,
    /// 输出到标准错误
    Stderr,
    /// 输出到文件（路径）
    File(String),
    /// 输出到环形缓冲区（容量）
    RingBuffer(usize),
}

/// 日志配置
///
/// 用于一键初始化日志系统
///
/// # 示例
///
/// ```
/// use shade_log::{LogConfig, Level};
///
/// let config = LogConfig::new(Level::Debug).with_ring_buffer(10000);
/// let (logger, ring) = config.init();
/// assert!(ring.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// 日志级别
    pub level: Level,
    /// 输出目标列表
    pub outputs: Vec<OutputConfig>,
}

impl LogConfig {
    /// 创建指定级别的配置（无输出）
    pub fn new(level: Level) -> Self {
        LogConfig {
            level,
            outputs: Vec::new(),
        }
    }

    /// 开发环境推荐配置
    ///
    /// - Debug 级别
    /// - 输出到 stderr
    /// - 环形缓冲区 10000 条
    pub fn dev() -> Self {
        LogConfig {
            level: Level::Debug,
            outputs: vec![OutputConfig::Stderr, OutputConfig::RingBuffer(10000)],
        }
    }

    /// 生产环境推荐配置
    ///
    /// - Warn 级别
    /// - 输出到 stderr
    /// - 环形缓冲区 1000 条
    pub fn production() -> Self {
        LogConfig {
            level: Level::Warn,
            outputs: vec![OutputConfig::Stderr, OutputConfig::RingBuffer(1000)],
        }
    }

    /// 测试环境配置：Trace 级别，只写环形缓冲区，便于断言诊断输出
    pub fn test() -> Self {
        LogConfig {
            level: Level::Trace,
            outputs: vec![OutputConfig::RingBuffer(10000)],
        }
    }

    /// 添加 stdout 输出
    pub fn with_stdout(mut self) -> Self {
        if !self.outputs.contains(&OutputConfig::Stdout) {
            self.outputs.push(OutputConfig::Stdout);
        }
        self
    }

    /// 添加 stderr 输出
    pub fn with_stderr(mut self) -> Self {
        if !self.outputs.contains(&OutputConfig::Stderr) {
            self.outputs.push(OutputConfig::Stderr);
        }
        self
    }

    /// 添加文件输出
    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.outputs.push(OutputConfig::File(path.into()));
        self
    }

    /// 添加环形缓冲区输出
    pub fn with_ring_buffer(mut self, capacity: usize) -> Self {
        self.outputs.push(OutputConfig::RingBuffer(capacity));
        self
    }

    /// 初始化日志系统
    ///
    /// 返回 (logger, Option<ring_buffer>)；配置了多个环形缓冲区时返回最后一个。
    /// 文件打不开时跳过该输出。
    pub fn init(self) -> (Arc<Logger>, Option<Arc<LogRingBuffer>>) {
        let logger = Logger::new(self.level);
        let mut ring_buffer: Option<Arc<LogRingBuffer>> = None;

        for output in self.outputs {
            match output {
                OutputConfig::Stdout => logger.add_sink(StdoutSink),
                OutputConfig::Stderr => logger.add_sink(StderrSink),
                OutputConfig::File(path) => {
                    if let Ok(sink) = FileSink::new(&path) {
                        logger.add_sink(sink);
                    }
                }
                OutputConfig::RingBuffer(capacity) => {
                    let ring = LogRingBuffer::new(capacity);
                    ring_buffer = Some(Arc::clone(&ring));
                    logger.add_sink(ring);
                }
            }
        }

        (logger, ring_buffer)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug;

    #[test]
    fn test_presets() {
        assert_eq!(LogConfig::dev().level, Level::Debug);
        assert_eq!(LogConfig::production().level, Level::Warn);
        assert_eq!(LogConfig::default().level, Level::Info);
        assert!(LogConfig::default().outputs.is_empty());
    }

    #[test]
    fn test_with_stdout_dedup() {
        let config = LogConfig::new(Level::Info).with_stdout().with_stdout().with_stderr();
        assert_eq!(config.outputs, vec![OutputConfig::Stdout, OutputConfig::Stderr]);
    }

    #[test]
    fn test_init_with_ring_buffer() {
        let (logger, ring) = LogConfig::test().init();
        let ring = ring.unwrap();

        debug!(logger, "ring captured {}", 1);
        assert_eq!(ring.len(), 1);
        assert_eq!(logger.sink_count(), 1);
    }

    #[test]
    fn test_init_without_ring_buffer() {
        let (logger, ring) = LogConfig::new(Level::Warn).init();
        assert!(ring.is_none());
        assert_eq!(logger.level(), Level::Warn);
    }

    #[test]
    fn test_init_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let (logger, _) = LogConfig::new(Level::Info)
            .with_file(path.to_string_lossy())
            .init();

        logger.log(Level::Info, "test", "to file");
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("to file"));
    }

    #[test]
    fn test_init_skips_unopenable_file() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, _) = LogConfig::new(Level::Info)
            .with_file(dir.path().to_string_lossy())
            .init();
        assert_eq!(logger.sink_count(), 0);
    }
}
