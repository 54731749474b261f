//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and initializes logging
//! - resolves report/comparison dates
//! - picks the snapshot source (download or local files)
//! - picks the sink (SMTP or stdout)
//! - runs the pipeline

use chrono::{Days, Local, NaiveDate};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use crate::cli::Cli;
use crate::data::{FileSource, SnapshotSource, TimeEtfClient};
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::mail::{MailConfig, ReportSink, SmtpMailer, StdoutSink};

pub mod pipeline;

use pipeline::RunOutcome;

/// Entry point for the `etf-report` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = run_config_from_args(&cli, Local::now().date_naive())?;
    debug!("{config:?}");

    let source = build_source(&cli, &config)?;
    let sink = build_sink(config.dry_run)?;

    match pipeline::run_report(&config, source.as_ref(), sink.as_ref())? {
        RunOutcome::Delivered(report) => info!("Done: {}", report.subject),
        RunOutcome::Skipped(_) => info!("No report for {}.", config.report_date),
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    // `try_init` so a second call (tests) is harmless.
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .try_init();
}

/// Resolve CLI flags into a run configuration.
///
/// `today` is injected so date defaults are testable.
pub fn run_config_from_args(cli: &Cli, today: NaiveDate) -> Result<RunConfig, AppError> {
    let report_date = cli.date.unwrap_or(today);
    let yesterday_date = match cli.yesterday {
        Some(d) => d,
        None => report_date
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| AppError::config(format!("No day before {report_date}.")))?,
    };

    if yesterday_date >= report_date {
        return Err(AppError::config(format!(
            "Comparison date {yesterday_date} must be before report date {report_date}."
        )));
    }
    if cli.top == 0 {
        return Err(AppError::config("`--top` must be > 0."));
    }

    Ok(RunConfig {
        report_date,
        yesterday_date,
        format: cli.format,
        top_n: cli.top,
        title: cli.title.clone(),
        export_csv: cli.export.clone(),
        export_json: cli.export_json.clone(),
        dry_run: cli.dry_run,
    })
}

fn build_source(cli: &Cli, config: &RunConfig) -> Result<Box<dyn SnapshotSource>, AppError> {
    match (&cli.today_file, &cli.yesterday_file) {
        (Some(today), Some(yesterday)) => Ok(Box::new(
            FileSource::new()
                .with_file(config.report_date, today)
                .with_file(config.yesterday_date, yesterday),
        )),
        _ => Ok(Box::new(TimeEtfClient::new(cli.base_url.clone(), cli.fund_idx)?)),
    }
}

fn build_sink(dry_run: bool) -> Result<Box<dyn ReportSink>, AppError> {
    if dry_run {
        return Ok(Box::new(StdoutSink));
    }
    Ok(Box::new(SmtpMailer::new(MailConfig::from_env()?)))
}
