//! Progress reporting channel
//!
//! The controller publishes human-readable lines, errors, phase changes and
//! individual outcomes to an unbounded channel. Publishing never blocks and
//! never fails: if nobody is listening the events are dropped.

use crate::crawler::CheckOutcome;
use crate::state::CrawlPhase;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A single event published during a run
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Informational line
    Line(String),

    /// Recovered error (unreachable page, bad sitemap)
    Error(String),

    /// An outcome, published after `is_external` has been stamped
    Outcome(CheckOutcome),

    /// Completion count within the current page batch
    Progress { completed: usize, total: usize },

    /// Run phase transition
    Phase(CrawlPhase),
}

/// Fire-and-forget publisher for progress events
#[derive(Debug, Clone, Default)]
pub struct ProgressSink {
    tx: Option<UnboundedSender<ProgressEvent>>,
}

impl ProgressSink {
    /// Creates a connected sink and the receiver that consumes it
    pub fn channel() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Creates a sink that discards every event
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            // A dropped receiver just means nobody is watching
            let _ = tx.send(event);
        }
    }

    pub fn line(&self, message: impl Into<String>) {
        self.emit(ProgressEvent::Line(message.into()));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(ProgressEvent::Error(message.into()));
    }

    pub fn outcome(&self, outcome: &CheckOutcome) {
        self.emit(ProgressEvent::Outcome(outcome.clone()));
    }

    pub fn progress(&self, completed: usize, total: usize) {
        self.emit(ProgressEvent::Progress { completed, total });
    }

    pub fn phase(&self, phase: CrawlPhase) {
        self.emit(ProgressEvent::Phase(phase));
    }
}

/// Formats an outcome as a one-line progress message
///
/// URLs longer than 70 characters are truncated with an ellipsis.
pub fn format_outcome_line(outcome: &CheckOutcome, completed: usize, total: usize) -> String {
    let status = if outcome.is_dead { "DEAD" } else { "OK" };
    let location = if outcome.is_external { "ext" } else { "int" };

    let url: String = outcome.target_url.chars().take(70).collect();
    let ellipsis = if outcome.target_url.chars().count() > 70 {
        "..."
    } else {
        ""
    };

    format!(
        "[{}/{}] {} [{}] [{}] {}: {}{}",
        completed, total, status, outcome.asset_kind, location, outcome.status_label, url, ellipsis
    )
}
