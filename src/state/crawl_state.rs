/// Crawl phase definitions for tracking a check run
///
/// A run moves `Idle -> Running`, may bounce between `Running` and `Paused`,
/// and ends in either `Completed` or `Stopped`.
use std::fmt;

/// Represents the current phase of a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Run has been configured but not started
    Idle,

    /// Controller is processing frontier entries
    Running,

    /// Controller is blocked on the pause gate
    Paused,

    // ===== Terminal States =====
    /// Frontier drained normally
    Completed,

    /// A stop signal was observed; remaining entries were abandoned
    Stopped,
}

impl CrawlPhase {
    /// Returns true if the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Stopped)
    }

    /// Returns true if moving from this phase to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;

        matches!(
            (self, next),
            (Idle, Running)
                | (Running, Paused)
                | (Paused, Running)
                | (Running, Completed)
                | (Running, Stopped)
                | (Paused, Stopped)
        )
    }

    /// Short lowercase name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
