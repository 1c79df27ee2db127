//! Battle log entries and the sinks that receive them
//!
//! The log is the player-facing narrative of a fight. Diagnostics go
//! through `tracing` separately.

use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::core::types::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEntryKind {
    Hit,
    Defeated,
}

/// One line of the battle narrative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogEntryKind,
    /// Side of the attacker
    pub side: Side,
    pub attacker: String,
    pub verb: String,
    pub target: String,
    /// Present only when damage numbers are visible
    pub damage: Option<i64>,
}

impl LogEntry {
    pub fn hit(side: Side, attacker: &str, verb: &str, target: &str, damage: Option<i64>) -> Self {
        Self {
            kind: LogEntryKind::Hit,
            side,
            attacker: attacker.to_string(),
            verb: verb.to_string(),
            target: target.to_string(),
            damage,
        }
    }

    pub fn defeated(side: Side, attacker: &str, target: &str) -> Self {
        Self {
            kind: LogEntryKind::Defeated,
            side,
            attacker: attacker.to_string(),
            verb: "defeated".to_string(),
            target: target.to_string(),
            damage: None,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.damage) {
            (LogEntryKind::Hit, Some(damage)) => write!(
                f,
                "{} {} {} for {} damage",
                self.attacker, self.verb, self.target, damage
            ),
            (LogEntryKind::Hit, None) => {
                write!(f, "{} {} {}", self.attacker, self.verb, self.target)
            }
            (LogEntryKind::Defeated, _) => {
                write!(f, "{} has been defeated by {}", self.target, self.attacker)
            }
        }
    }
}

/// Receives log entries from concurrently firing attackers
pub trait BattleLog: Send + Sync {
    fn record(&self, entry: LogEntry);
}

/// Collects entries in memory
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BattleLog for MemoryLog {
    fn record(&self, entry: LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }
}

/// Forwards entries to `tracing` at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl BattleLog for TracingLog {
    fn record(&self, entry: LogEntry) {
        tracing::info!(side = ?entry.side, kind = ?entry.kind, "{}", entry);
    }
}

/// Streams entries to a receiver; a dropped receiver silently discards them
impl BattleLog for mpsc::UnboundedSender<LogEntry> {
    fn record(&self, entry: LogEntry) {
        let _ = self.send(entry);
    }
}

/// Detachable handle to the caller's sink, shared by every attack action
#[derive(Clone, Default)]
pub struct LogSlot {
    sink: Arc<RwLock<Option<Arc<dyn BattleLog>>>>,
}

impl LogSlot {
    pub fn new(sink: Option<Arc<dyn BattleLog>>) -> Self {
        Self {
            sink: Arc::new(RwLock::new(sink)),
        }
    }

    pub fn record(&self, entry: LogEntry) {
        let sink = self.sink.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(sink) = sink.as_ref() {
            sink.record(entry);
        }
    }

    /// Stop delivering entries; later records are dropped
    pub fn detach(&self) {
        *self.sink.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    pub fn is_attached(&self) -> bool {
        self.sink
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }
}

impl fmt::Debug for LogSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}
