//! Report generation for finished runs
//!
//! Renders the outcome list as a plain-text summary or as CSV, and picks
//! timestamped filenames for saving them.

use crate::crawler::CheckOutcome;
use crate::{CheckerError, Result};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

const RULE: &str = "================================================================================";
const SECTION_RULE: &str = "----------------------------------------";

/// Formats the outcome list as a plain-text report
///
/// # Arguments
///
/// * `outcomes` - Every outcome produced by a run
///
/// # Returns
///
/// The report text
pub fn generate_report(outcomes: &[CheckOutcome]) -> String {
    if outcomes.is_empty() {
        return "No links were found to check.".to_string();
    }

    let dead: Vec<&CheckOutcome> = outcomes.iter().filter(|o| o.is_dead).collect();
    let alive = outcomes.len() - dead.len();
    let external = outcomes.iter().filter(|o| o.is_external).count();
    let pages: HashSet<&str> = outcomes.iter().map(|o| o.discovered_on.as_str()).collect();

    let mut report = String::new();
    report.push_str(RULE);
    report.push_str("\n                          DEAD LINK CHECKER REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    // Summary
    report.push_str("SUMMARY\n");
    report.push_str(SECTION_RULE);
    report.push('\n');
    report.push_str(&format!("  Pages crawled:       {}\n", pages.len()));
    report.push_str(&format!("  Total items checked: {}\n", outcomes.len()));
    report.push_str(&format!("  Working items:       {}\n", alive));
    report.push_str(&format!("  Dead items:          {}\n", dead.len()));
    report.push_str(&format!(
        "  Success rate:        {:.1}%\n\n",
        alive as f64 / outcomes.len() as f64 * 100.0
    ));

    push_breakdown(
        &mut report,
        "ASSET TYPE BREAKDOWN",
        count_by(outcomes, |o| o.asset_kind.to_string()),
    );

    report.push_str("LINK LOCATION BREAKDOWN\n");
    report.push_str(SECTION_RULE);
    report.push('\n');
    report.push_str(&format!("  Internal:   {}\n", outcomes.len() - external));
    report.push_str(&format!("  External:   {}\n\n", external));

    push_breakdown(
        &mut report,
        "STATUS BREAKDOWN",
        count_by(outcomes, |o| o.status_label.clone()),
    );

    let (dead_external, dead_internal): (Vec<&CheckOutcome>, Vec<&CheckOutcome>) =
        dead.iter().copied().partition(|o| o.is_external);

    push_dead_list(&mut report, "DEAD INTERNAL ASSETS (Need Attention)", &dead_internal);
    push_dead_list(&mut report, "DEAD EXTERNAL ASSETS", &dead_external);

    if dead.is_empty() {
        report.push_str("No dead links found.\n");
    }

    report
}

/// Counts outcomes per key, sorted by descending count then key
fn count_by<F>(outcomes: &[CheckOutcome], key: F) -> Vec<(String, usize)>
where
    F: Fn(&CheckOutcome) -> String,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for outcome in outcomes {
        *counts.entry(key(outcome)).or_insert(0) += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

fn push_breakdown(report: &mut String, title: &str, rows: Vec<(String, usize)>) {
    report.push_str(title);
    report.push('\n');
    report.push_str(SECTION_RULE);
    report.push('\n');
    for (label, count) in rows {
        report.push_str(&format!("  {}: {}\n", label, count));
    }
    report.push('\n');
}

fn push_dead_list(report: &mut String, title: &str, dead: &[&CheckOutcome]) {
    if dead.is_empty() {
        return;
    }

    report.push_str(title);
    report.push('\n');
    report.push_str(SECTION_RULE);
    report.push('\n');
    for (i, outcome) in dead.iter().enumerate() {
        report.push_str(&format!(
            "  {}. [{}] {}\n     Status: {}\n     Found on: {}\n",
            i + 1,
            outcome.asset_kind,
            outcome.target_url,
            outcome.status_label,
            outcome.discovered_on
        ));
    }
    report.push('\n');
}

/// Column headers of the CSV report
const CSV_HEADER: [&str; 8] = [
    "URL",
    "Status Code",
    "Status",
    "Response Time",
    "Found On",
    "Dead",
    "External",
    "Type",
];

/// Formats the outcome list as CSV with a header row
///
/// # Errors
///
/// Returns an error if the CSV writer fails to serialize a record
pub fn generate_csv_report(outcomes: &[CheckOutcome]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for outcome in outcomes {
        writer.write_record([
            outcome.target_url.clone(),
            outcome
                .status_code
                .map(|c| c.to_string())
                .unwrap_or_default(),
            outcome.status_label.clone(),
            outcome
                .elapsed_seconds
                .map(|s| format!("{:.2}", s))
                .unwrap_or_default(),
            outcome.discovered_on.clone(),
            outcome.is_dead.to_string(),
            outcome.is_external.to_string(),
            outcome.asset_kind.as_str().to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CheckerError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| CheckerError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Builds a timestamped report filename for a seed URL
///
/// # Examples
///
/// ```
/// use deadlink_checker::output::report_filename;
///
/// let name = report_filename("https://www.example.com/docs", "txt", None);
/// let name = name.to_string_lossy();
/// assert!(name.starts_with("reports/deadlinks_example.com_"));
/// assert!(name.ends_with(".txt"));
/// ```
pub fn report_filename(seed_url: &str, extension: &str, dir: Option<&Path>) -> PathBuf {
    let host = Url::parse(seed_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_else(|| "unknown".to_string());
    let host = host.strip_prefix("www.").unwrap_or(&host).replace(':', "_");

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("deadlinks_{}_{}.{}", host, timestamp, extension);

    dir.unwrap_or_else(|| Path::new("reports")).join(filename)
}

/// Writes a report to disk, creating parent directories as needed
pub fn save_report(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}
