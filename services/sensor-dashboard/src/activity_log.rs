//! Bounded, newest-first activity log

use std::collections::VecDeque;

use chrono::{Local, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Capacity used when a view does not configure its own
pub const DEFAULT_CAPACITY: usize = 15;

/// One human-readable line in an activity log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Local wall-clock time of the append, `HH:MM:SS`
    pub timestamp: String,
    pub message: String,
}

impl LogEntry {
    pub fn at(time: NaiveTime, message: impl Into<String>) -> Self {
        Self {
            timestamp: format_timestamp(time),
            message: message.into(),
        }
    }

    /// The rendered list item, e.g. `09:05:01 - connected!`
    pub fn line(&self) -> String {
        format!("{} - {}", self.timestamp, self.message)
    }
}

/// Zero-padded 24-hour `HH:MM:SS`
pub fn format_timestamp(time: NaiveTime) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}

/// Ordered log holding at most `capacity` entries, newest at the head
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl ActivityLog {
    /// A capacity of zero is raised to one so the newest entry is always kept.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert at the head, then evict from the tail until within capacity
    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Append a message stamped with the current local time
    pub fn push(&mut self, message: impl Into<String>) {
        self.append_at(Local::now().time(), message);
    }

    pub fn append_at(&mut self, time: NaiveTime, message: impl Into<String>) {
        self.append(LogEntry::at(time, message));
    }

    /// Most recently appended entry
    pub fn head(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Entries newest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(LogEntry::line).collect()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
