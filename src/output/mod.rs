//! Output module for progress reporting and result rendering
//!
//! This module handles:
//! - Publishing progress events from a running check
//! - Mapping HTTP status codes to display labels
//! - Rendering finished runs as text or CSV reports

mod progress;
mod report;
mod status;

pub use progress::{format_outcome_line, ProgressEvent, ProgressSink};
pub use report::{generate_csv_report, generate_report, report_filename, save_report};
pub use status::status_label;
