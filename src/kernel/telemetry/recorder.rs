use std::collections::VecDeque;

use tokio::sync::broadcast;

use super::event::{LogEntry, LogKind};
use super::metrics::{compute_summary, LogSummary};

pub const DEFAULT_CAPACITY: usize = 50;
const BROADCAST_CAPACITY: usize = 64;

/// Capped journal of analyzer activity. Oldest entries are evicted first.
#[derive(Debug)]
pub struct LogRecorder {
    buffer: VecDeque<LogEntry>,
    capacity: usize,
    tx: broadcast::Sender<LogEntry>,
}

impl LogRecorder {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            tx,
        }
    }

    pub fn record(&mut self, kind: LogKind, message: impl Into<String>) {
        let entry = LogEntry::new(kind, message);
        match kind {
            LogKind::Error => tracing::warn!("{}", entry.message),
            LogKind::Request | LogKind::Response => tracing::debug!("{}", entry.message),
            LogKind::Info | LogKind::Action => tracing::info!("{}", entry.message),
        }

        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        // No live observers is fine.
        let _ = self.tx.send(entry.clone());
        self.buffer.push_back(entry);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.buffer.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.tx.subscribe()
    }

    pub fn summary(&self) -> LogSummary {
        compute_summary(&self.buffer)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for LogRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
