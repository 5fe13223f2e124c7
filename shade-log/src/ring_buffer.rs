//! 日志专用环形缓冲区

use crate::logger::LogSink;
use crate::record::Record;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 环形缓冲区统计信息
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RingBufferStats {
    /// 当前记录数
    pub record_count: usize,
    /// 因缓冲区满而丢弃的记录数
    pub dropped_count: usize,
    /// 缓冲区容量
    pub capacity: usize,
}

/// 日志环形缓冲区
///
/// 当缓冲区满时，新记录会覆盖最旧的记录（FIFO）
#[derive(Debug)]
pub struct LogRingBuffer {
    inner: Mutex<VecDeque<Record>>,
    capacity: usize,
    dropped: AtomicUsize,
}

impl LogRingBuffer {
    /// 创建新的环形缓冲区
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(LogRingBuffer {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            dropped: AtomicUsize::new(0),
        })
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Record>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 写入记录（满了则覆盖旧数据）
    fn push(&self, record: Record) {
        if self.capacity == 0 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let mut inner = self.lock();
        if inner.len() >= self.capacity {
            inner.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        inner.push_back(record);
    }

    /// 获取当前所有记录（按时间顺序）
    pub fn dump_records(&self) -> Vec<Record> {
        self.lock().iter().cloned().collect()
    }

    /// 将日志转储到字符串
    pub fn dump(&self) -> String {
        self.dump_records()
            .iter()
            .map(|r| r.format())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 统计消息中包含指定片段的记录数
    pub fn count_matching(&self, needle: &str) -> usize {
        self.lock()
            .iter()
            .filter(|r| r.message.contains(needle))
            .count()
    }

    /// 清空缓冲区
    pub fn clear(&self) {
        self.lock().clear();
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// 获取统计信息
    pub fn stats(&self) -> RingBufferStats {
        RingBufferStats {
            record_count: self.len(),
            dropped_count: self.dropped.load(Ordering::Relaxed),
            capacity: self.capacity,
        }
    }

    /// 获取当前记录数
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 获取容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl LogSink for LogRingBuffer {
    fn write(&self, record: &Record) {
        self.push(record.clone());
    }
}

impl LogSink for Arc<LogRingBuffer> {
    fn write(&self, record: &Record) {
        self.push(record.clone());
    }
}
