use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

pub const DEFAULT_LOG_CAPACITY: usize = 5000;

pub type SharedLogStore = Arc<Mutex<LogStore>>;

/// Formatted tracing output kept for the log pane. Oldest lines fall off once
/// `capacity` is reached.
pub struct LogStore {
    lines: VecDeque<String>,
    capacity: usize,
    generation: u64,
}

impl LogStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            generation: 0,
        }
    }

    pub fn shared(capacity: usize) -> SharedLogStore {
        Arc::new(Mutex::new(Self::new(capacity)))
    }

    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            if self.lines.len() == self.capacity {
                self.lines.pop_front();
            }
            self.lines.push_back(line);
            self.generation = self.generation.wrapping_add(1);
        }
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.extend(std::iter::once(line.into()));
    }

    /// Bumped once per stored line, evicted ones included.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Up to `height` lines ending `scroll` lines before the newest, oldest first.
    pub fn window(&self, scroll: usize, height: usize) -> Vec<String> {
        let end = self.lines.len().saturating_sub(scroll);
        let start = end.saturating_sub(height);
        self.lines.range(start..end).cloned().collect()
    }
}

/// Routes a `fmt` layer into a [`LogStore`] instead of the terminal the UI owns.
#[derive(Clone)]
pub struct LogPaneMakeWriter {
    store: SharedLogStore,
}

impl LogPaneMakeWriter {
    pub fn new(store: SharedLogStore) -> Self {
        Self { store }
    }
}

impl<'a> MakeWriter<'a> for LogPaneMakeWriter {
    type Writer = LogPaneWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogPaneWriter {
            store: self.store.clone(),
            pending: String::new(),
        }
    }
}

pub struct LogPaneWriter {
    store: SharedLogStore,
    pending: String,
}

impl LogPaneWriter {
    fn take_complete_lines(&mut self) -> Vec<String> {
        let Some(last_newline) = self.pending.rfind('\n') else {
            return Vec::new();
        };
        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);
        complete
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect()
    }
}

impl Write for LogPaneWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.push_str(&String::from_utf8_lossy(buf));
        let lines = self.take_complete_lines();
        if !lines.is_empty() {
            self.store.lock().extend(lines);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogPaneWriter {
    fn drop(&mut self) {
        let rest = std::mem::take(&mut self.pending);
        self.store.lock().push_line(rest.trim_end().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{LogPaneMakeWriter, LogStore};
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;

    fn filled(n: usize, capacity: usize) -> LogStore {
        let mut store = LogStore::new(capacity);
        store.extend((1..=n).map(|i| format!("line {i}")));
        store
    }

    #[test]
    fn store_drops_oldest_and_ignores_blank_lines() {
        let mut store = LogStore::new(2);
        store.push_line("a");
        store.push_line("   ");
        store.push_line("b");
        store.push_line("c");
        assert_eq!(store.window(0, 10), vec!["b".to_string(), "c".to_string()]);
        assert_eq!(store.line_count(), 2);
        assert_eq!(store.generation(), 3);
    }

    #[test]
    fn window_follows_scroll_offset() {
        let store = filled(6, 10);
        assert_eq!(store.window(0, 2), vec!["line 5", "line 6"]);
        assert_eq!(store.window(3, 2), vec!["line 2", "line 3"]);
        assert_eq!(store.window(5, 4), vec!["line 1"]);
        assert!(store.window(9, 4).is_empty());
        assert!(store.window(0, 0).is_empty());
    }

    #[test]
    fn writer_batches_complete_lines_and_keeps_tail_until_drop() {
        let store = LogStore::shared(10);
        let make = LogPaneMakeWriter::new(store.clone());
        {
            let mut writer = make.make_writer();
            writer.write_all(b"first\r\nsec").expect("write");
            assert_eq!(store.lock().window(0, 10), vec!["first"]);
            writer.write_all(b"ond\n\nthird").expect("write");
            assert_eq!(store.lock().line_count(), 2);
        }
        assert_eq!(
            store.lock().window(0, 10),
            vec!["first", "second", "third"]
        );
    }
}
