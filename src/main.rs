//! Deadlink Checker main entry point
//!
//! This is the command-line interface for the dead link checker.

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use deadlink_checker::config::{load_config, validate, CheckerConfig, Credentials};
use deadlink_checker::crawler::{run_check, CheckRequest};
use deadlink_checker::output::{
    format_outcome_line, generate_csv_report, generate_report, report_filename, save_report,
    ProgressEvent,
};
use deadlink_checker::{CrawlControl, CrawlPhase, ProgressSink};
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

/// Deadlink Checker: find broken links and assets on a website
///
/// Checks every link, image, script, stylesheet and iframe on a page.
/// With --depth 2 or more it follows internal links; a sitemap URL checks
/// every page the sitemap lists.
#[derive(Parser, Debug)]
#[command(name = "deadlink-checker")]
#[command(version = "1.0.0")]
#[command(about = "Find broken links and assets on a website", long_about = None)]
struct Cli {
    /// Page or sitemap URL to check (https:// is assumed when missing)
    #[arg(value_name = "URL")]
    url: String,

    /// Concurrent checks per page
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Crawl depth (1 = only this page, 2+ = follow internal links)
    #[arg(short, long)]
    depth: Option<u32>,

    /// Skip URLs matching this regex (or substring); repeatable
    #[arg(long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Extra request header as 'Name: value'; repeatable
    #[arg(long, value_name = "HEADER")]
    header: Vec<String>,

    /// Basic-auth credentials as user:pass
    #[arg(long, value_name = "USER:PASS")]
    auth: Option<String>,

    /// Do not check links to other hosts
    #[arg(long)]
    no_external: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory reports are written to
    #[arg(long, value_name = "DIR", default_value = "reports")]
    output_dir: PathBuf,

    /// Also write a CSV report
    #[arg(long)]
    csv: bool,

    /// Skip the text report
    #[arg(long)]
    no_txt: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?
        }
        None => CheckerConfig::default(),
    };

    apply_overrides(&mut config, &cli)?;
    validate(&config).context("invalid settings")?;

    let seed = with_scheme(&cli.url);
    let request = CheckRequest::from_config(seed.clone(), &config);
    tracing::info!(
        "Checking {} with {} workers, depth {}",
        seed,
        request.workers,
        request.max_depth
    );

    let (sink, events) = ProgressSink::channel();
    let printer = tokio::spawn(print_progress(events, cli.quiet));

    let control = CrawlControl::new();
    let interrupt = control.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nStopping after the current batch...");
            interrupt.stop();
        }
    });

    let run = run_check(request, sink, control).await?;
    // The sink is dropped with the run, so the printer drains and exits
    let _ = printer.await;

    let dead = run.outcomes.iter().filter(|o| o.is_dead).count();
    println!(
        "\n{} links checked on {} pages, {} dead",
        run.outcomes.len(),
        run.pages_visited,
        dead
    );
    if run.phase == CrawlPhase::Stopped {
        println!("Run was stopped early; results are partial.");
    }

    write_reports(&cli, &seed, &run.outcomes)?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("deadlink_checker=warn,warn"),
            1 => EnvFilter::new("deadlink_checker=info,warn"),
            2 => EnvFilter::new("deadlink_checker=debug,info"),
            _ => EnvFilter::new("deadlink_checker=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Applies command-line flags on top of the file configuration
fn apply_overrides(config: &mut CheckerConfig, cli: &Cli) -> anyhow::Result<()> {
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_secs = timeout;
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if cli.no_external {
        config.crawler.check_external = false;
    }

    config.exclude.extend(cli.exclude.iter().cloned());

    for raw in &cli.header {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| anyhow!("header '{}' must look like 'Name: value'", raw))?;
        config
            .request
            .headers
            .insert(name.trim().to_string(), value.trim().to_string());
    }

    if let Some(auth) = &cli.auth {
        let Some((username, password)) = auth.split_once(':') else {
            bail!("--auth must look like user:pass");
        };
        config.request.auth = Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    Ok(())
}

/// Prepends https:// to a URL that has no scheme
fn with_scheme(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Prints progress events until every sender is gone
async fn print_progress(mut events: UnboundedReceiver<ProgressEvent>, quiet: bool) {
    let (mut completed, mut total) = (0, 0);

    while let Some(event) = events.recv().await {
        match event {
            ProgressEvent::Line(line) if !quiet => println!("{}", line),
            ProgressEvent::Line(_) => {}
            ProgressEvent::Error(message) => eprintln!("ERROR: {}", message),
            ProgressEvent::Progress {
                completed: c,
                total: t,
            } => {
                completed = c;
                total = t;
            }
            ProgressEvent::Outcome(outcome) => {
                if !quiet || outcome.is_dead {
                    println!("{}", format_outcome_line(&outcome, completed, total));
                }
            }
            ProgressEvent::Phase(phase) => tracing::debug!("Phase: {}", phase),
        }
    }
}

/// Writes the text and/or CSV reports
fn write_reports(
    cli: &Cli,
    seed: &str,
    outcomes: &[deadlink_checker::CheckOutcome],
) -> anyhow::Result<()> {
    if !cli.no_txt {
        let path = report_filename(seed, "txt", Some(cli.output_dir.as_path()));
        save_report(&path, &generate_report(outcomes))
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Report saved to: {}", path.display());
    }

    if cli.csv {
        let path = report_filename(seed, "csv", Some(cli.output_dir.as_path()));
        let csv = generate_csv_report(outcomes).context("failed to render CSV report")?;
        save_report(&path, &csv)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("CSV report saved to: {}", path.display());
    }

    Ok(())
}
