//! State module for tracking a check run
//!
//! This module provides the run-level state machine and the control plane
//! used to pause, resume and stop a run from outside.
//!
//! # Components
//!
//! - `CrawlPhase`: Tracks the phase of a run (idle, running, paused, completed, stopped)
//! - `CrawlControl`: Cloneable pause/stop handle checked at well-defined yield points

mod control;
mod crawl_state;

// Re-export main types
pub use control::CrawlControl;
pub use crawl_state::CrawlPhase;
