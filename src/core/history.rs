//! Transition log: an ordered record of completed transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of a single completed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state the machine left.
    pub from: String,
    /// The state the machine entered.
    pub to: String,
    /// When the transition completed.
    pub at: DateTime<Utc>,
}

impl TransitionRecord {
    /// Create a record stamped with the current time.
    pub fn now(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            at: Utc::now(),
        }
    }
}

/// Ordered log of a machine instance's completed transitions.
///
/// Only successful transitions are recorded; rejected attempts leave the
/// log untouched, like every other piece of machine state.
///
/// # Example
///
/// ```rust
/// use stance::{TransitionLog, TransitionRecord};
///
/// let mut log = TransitionLog::new();
/// log.record(TransitionRecord::now("initial", "Green"));
/// log.record(TransitionRecord::now("Green", "Orange"));
///
/// assert_eq!(log.path(), vec!["initial", "Green", "Orange"]);
/// assert_eq!(log.latest().unwrap().to, "Orange");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionLog {
    records: Vec<TransitionRecord>,
}

impl TransitionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record.
    pub fn record(&mut self, record: TransitionRecord) {
        self.records.push(record);
    }

    /// All records, in completion order.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// The most recent record, if any.
    pub fn latest(&self) -> Option<&TransitionRecord> {
        self.records.last()
    }

    /// The path of states traversed: the starting state, then the target of
    /// each transition. Empty when nothing has been recorded.
    pub fn path(&self) -> Vec<&str> {
        let Some(first) = self.records.first() else {
            return Vec::new();
        };
        let mut path = vec![first.from.as_str()];
        path.extend(self.records.iter().map(|r| r.to.as_str()));
        path
    }

    /// Number of recorded transitions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_preserves_order() {
        let mut log = TransitionLog::new();
        log.record(TransitionRecord::now("initial", "Green"));
        log.record(TransitionRecord::now("Green", "Orange"));
        log.record(TransitionRecord::now("Orange", "Red"));

        let targets: Vec<&str> = log.records().iter().map(|r| r.to.as_str()).collect();
        assert_eq!(targets, vec!["Green", "Orange", "Red"]);
    }

    #[test]
    fn path_starts_at_the_first_source() {
        let mut log = TransitionLog::new();
        log.record(TransitionRecord::now("initial", "Green"));
        log.record(TransitionRecord::now("Green", "Orange"));
        assert_eq!(log.path(), vec!["initial", "Green", "Orange"]);
    }

    #[test]
    fn empty_log() {
        let log = TransitionLog::new();
        assert!(log.is_empty());
        assert!(log.latest().is_none());
        assert!(log.path().is_empty());
    }

    #[test]
    fn serializes_round_trip() {
        let mut log = TransitionLog::new();
        log.record(TransitionRecord::now("initial", "Green"));

        let json = serde_json::to_string(&log).unwrap();
        let restored: TransitionLog = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, log);
    }
}
