//! 日志器实现

use crate::record::{Level, Record};
use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// 日志输出目标trait
pub trait LogSink: Send + Sync {
    /// 写入日志记录
    fn write(&self, record: &Record);
}

/// 日志器配置和状态
pub struct Logger {
    /// 当前日志级别（原子存储）
    level: AtomicU8,
    /// 输出目标列表
    sinks: RwLock<Vec<Box<dyn LogSink>>>,
}

impl Logger {
    /// 创建新的日志器
    pub fn new(level: Level) -> Arc<Self> {
        Arc::new(Logger {
            level: AtomicU8::new(level as u8),
            sinks: RwLock::new(Vec::new()),
        })
    }

    /// 添加输出目标
    pub fn with_sink<S: LogSink + 'static>(self: Arc<Self>, sink: S) -> Arc<Self> {
        self.add_sink(sink);
        self
    }

    /// 添加 sink（用于 config 或共享的 logger）
    pub fn add_sink<S: LogSink + 'static>(&self, sink: S) {
        self.sinks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(sink));
    }

    /// 动态设置日志级别
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// 获取当前日志级别
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed)).unwrap_or(Level::Info)
    }

    /// 检查指定级别是否启用
    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// 记录日志（宏的落点）
    #[inline(never)]
    pub fn log(&self, level: Level, target: &'static str, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }

        let record = Record::new(level, target, message);
        let sinks = self.sinks.read().unwrap_or_else(PoisonError::into_inner);
        for sink in sinks.iter() {
            sink.write(&record);
        }
    }

    /// 创建禁用日志的no-op日志器（默认值，用于测试或禁用场景）
    pub fn noop() -> Arc<Self> {
        Self::new(Level::Error)
    }

    /// 当前 sink 数量
    pub fn sink_count(&self) -> usize {
        self.sinks.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("sinks", &self.sink_count())
            .finish()
    }
}

/// 标准输出sink
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write(&self, record: &Record) {
        println!("{}", record.format());
    }
}

/// 标准错误sink
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write(&self, record: &Record) {
        eprintln!("{}", record.format());
    }
}

/// 文件sink
pub struct FileSink {
    file: Mutex<std::fs::File>,
}

impl FileSink {
    /// 创建文件sink（追加模式）
    pub fn new(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        Ok(FileSink {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    #[inline(never)]
    fn write(&self, record: &Record) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", record.format());
        }
    }
}
