// common/src/log_buffer.rs
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

pub const DEFAULT_LOG_LINES: usize = 1000;

/// Bounded ring of recent log lines, shared between the tracing writer and
/// the admin log endpoints. Oldest lines are dropped first.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: Arc<AtomicUsize>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_LINES)
    }
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::new())),
            capacity: Arc::new(AtomicUsize::new(capacity)),
        }
    }

    /// Resize; excess old lines are discarded immediately
    pub fn set_capacity(&self, capacity: usize) {
        self.capacity.store(capacity, Ordering::Relaxed);
        let mut lines = self.lock();
        while lines.len() > capacity {
            lines.pop_front();
        }
    }

    pub fn push(&self, line: String) {
        let capacity = self.capacity.load(Ordering::Relaxed);
        if capacity == 0 {
            return;
        }
        let mut lines = self.lock();
        while lines.len() >= capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            self.push(line.to_string());
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_drops_oldest_when_full() {
        let logs = LogBuffer::new(2);
        logs.push("one".into());
        logs.push("two".into());
        logs.push("three".into());
        assert_eq!(logs.lines(), vec!["two".to_string(), "three".to_string()]);
    }

    #[test]
    fn test_writer_splits_lines() {
        let mut logs = LogBuffer::new(10);
        logs.write_all(b"first line\nsecond line\n\n").unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs.lines()[1], "second line");
    }

    #[test]
    fn test_shrink_and_clear() {
        let logs = LogBuffer::new(5);
        for i in 0..5 {
            logs.push(format!("line {}", i));
        }
        logs.set_capacity(2);
        assert_eq!(logs.lines(), vec!["line 3".to_string(), "line 4".to_string()]);

        logs.clear();
        assert!(logs.is_empty());
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let logs = LogBuffer::new(0);
        logs.push("ignored".into());
        assert!(logs.is_empty());
    }
}
