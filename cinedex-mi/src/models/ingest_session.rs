//! Batch ingest session state machine
//!
//! A session walks each requested title through lookup -> classify -> store
//! and accumulates per-title outcomes. Session state progresses
//! RUNNING -> COMPLETED (normal), or ends CANCELLED / FAILED.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::movie::{ClassificationLabels, MovieRecord};

/// Ingest session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IngestState {
    /// Titles are being processed
    Running,
    /// All titles processed; partial success is still COMPLETED
    Completed,
    /// Cancelled by the caller; in-flight title finished first
    Cancelled,
    /// Aborted by a catastrophic store failure
    Failed,
}

/// Why one title failed.
///
/// One title's failure never aborts the batch; it is recorded here and the
/// pipeline moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Empty or whitespace-only title; fails fast, never retried
    InvalidInput,
    /// Provider affirmatively reported no match; not retried
    NotFound,
    /// Network/provider instability that outlived the retry budget
    TransientError,
    /// Persistence failure reported by the store
    StorageError,
}

/// A successfully ingested title: the record plus its derived labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestedMovie {
    pub record: MovieRecord,
    pub labels: ClassificationLabels,
}

/// A failed title with its terminal reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTitle {
    pub title: String,
    pub reason: FailureReason,
}

/// Progress tracking, updated after every processed title
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestProgress {
    /// Titles processed so far
    pub current: usize,
    /// Total titles requested
    pub total: usize,
    /// Percentage complete (0.0 - 100.0)
    pub percentage: f64,
    /// Current operation description
    pub current_operation: String,
}

impl IngestProgress {
    fn new(total: usize) -> Self {
        Self {
            current: 0,
            total,
            percentage: 0.0,
            current_operation: String::from("Starting"),
        }
    }
}

/// Outcome of one pipeline run, in input order.
///
/// Invariant: `succeeded.len() + failed.len() == total_requested` once the
/// session is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub total_requested: usize,
    pub succeeded: Vec<IngestedMovie>,
    pub failed: Vec<FailedTitle>,
}

/// Batch ingest session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSession {
    /// Unique session identifier
    pub session_id: Uuid,

    /// Current lifecycle state
    pub state: IngestState,

    /// Progress tracking
    pub progress: IngestProgress,

    /// Successfully ingested titles, in input order
    pub succeeded: Vec<IngestedMovie>,

    /// Failed titles, in input order
    pub failed: Vec<FailedTitle>,

    /// Aggregated error message for FAILED sessions
    pub error: Option<String>,

    /// Session start time
    pub started_at: DateTime<Utc>,

    /// Session end time (terminal states only)
    pub ended_at: Option<DateTime<Utc>>,
}

impl IngestSession {
    /// Create a new running session for `total` titles
    pub fn new(total: usize) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            state: IngestState::Running,
            progress: IngestProgress::new(total),
            succeeded: Vec::new(),
            failed: Vec::new(),
            error: None,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Transition to a new state, stamping `ended_at` for terminal states
    pub fn transition_to(&mut self, new_state: IngestState) {
        self.state = new_state;
        if self.is_terminal() {
            self.ended_at = Some(Utc::now());
        }
    }

    /// Update progress counters after finishing one title
    pub fn update_progress(&mut self, current: usize, operation: String) {
        self.progress.current = current;
        self.progress.percentage = if self.progress.total > 0 {
            (current as f64 / self.progress.total as f64) * 100.0
        } else {
            0.0
        };
        self.progress.current_operation = operation;
    }

    pub fn record_success(&mut self, record: MovieRecord, labels: ClassificationLabels) {
        self.succeeded.push(IngestedMovie { record, labels });
    }

    pub fn record_failure(&mut self, title: String, reason: FailureReason) {
        self.failed.push(FailedTitle { title, reason });
    }

    /// Check if session is terminal (finished)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            IngestState::Completed | IngestState::Cancelled | IngestState::Failed
        )
    }

    /// Snapshot the outcome as a BatchResult
    pub fn batch_result(&self) -> BatchResult {
        BatchResult {
            total_requested: self.progress.total,
            succeeded: self.succeeded.clone(),
            failed: self.failed.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_running() {
        let session = IngestSession::new(3);
        assert_eq!(session.state, IngestState::Running);
        assert!(!session.is_terminal());
        assert_eq!(session.progress.total, 3);
        assert!(session.ended_at.is_none());
    }

    #[test]
    fn terminal_transition_stamps_end_time() {
        let mut session = IngestSession::new(1);
        session.transition_to(IngestState::Completed);
        assert!(session.is_terminal());
        assert!(session.ended_at.is_some());
    }

    #[test]
    fn progress_percentage_tracks_current() {
        let mut session = IngestSession::new(4);
        session.update_progress(1, "Looking up".to_string());
        assert_eq!(session.progress.percentage, 25.0);
        session.update_progress(4, "Done".to_string());
        assert_eq!(session.progress.percentage, 100.0);
    }

    #[test]
    fn zero_title_session_has_zero_percentage() {
        let mut session = IngestSession::new(0);
        session.update_progress(0, "Done".to_string());
        assert_eq!(session.progress.percentage, 0.0);
    }

    #[test]
    fn failure_reason_serializes_as_snake_case() {
        let json = serde_json::to_string(&FailureReason::TransientError).unwrap();
        assert_eq!(json, "\"transient_error\"");
        let json = serde_json::to_string(&FailureReason::InvalidInput).unwrap();
        assert_eq!(json, "\"invalid_input\"");
    }
}
