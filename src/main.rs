use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use log::{error, info, LevelFilter, Log, Metadata, Record};
use regex::Regex;

use specular::config::{Ignore, SyncInfo};
use specular::reconcile;
use specular::report::{EventSink, SyncAction};

#[derive(Parser, Debug)]
#[command(name = "specular")]
#[command(about = "One-way directory mirroring utility", long_about = None)]
struct Args {
    /// Path to the source directory that is mirrored from
    source: PathBuf,

    /// Path to the replica directory that is kept identical to the source
    replica: PathBuf,

    /// Seconds to wait between synchronization passes
    interval: u64,

    /// Path to the log file where passes are recorded
    log_file: PathBuf,

    /// Relative paths matching this regex are left alone (repeatable)
    #[arg(long = "ignore-regex")]
    ignore_regexes: Vec<Regex>,

    /// Relative paths under this prefix are left alone (repeatable)
    #[arg(long = "ignore-path")]
    ignore_paths: Vec<String>,

    /// Also log debug-level diagnostics
    #[arg(short, long)]
    verbose: bool,
}

/// Writes every record, timestamped, to both the console and the log file.
struct DualLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl Log for DualLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "{} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.args()
        );
        println!("{}", line);
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", line);
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Opens the log file in append mode, creating missing parent directories,
/// and installs the process-wide logger.
fn setup_logging(path: &Path, verbose: bool) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create log directory {:?}", parent))?;
        }
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {:?}", path))?;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    log::set_boxed_logger(Box::new(DualLogger {
        file: Mutex::new(file),
        level,
    }))
    .context("failed to install the logger")?;
    log::set_max_level(level);
    Ok(())
}

/// Forwards every action the reconciler records into the log stream.
struct LogSink;

impl EventSink for LogSink {
    fn record(&self, action: &SyncAction) {
        info!("{}", action);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_file, args.verbose)?;

    let mut config = SyncInfo::new(args.source, args.replica);
    config.ignore = Ignore {
        regexes: args.ignore_regexes,
        paths: args.ignore_paths,
    };

    info!(
        "Mirroring {:?} to {:?} every {} seconds",
        config.source, config.replica, args.interval
    );

    loop {
        info!("Starting synchronization pass");
        match reconcile::synchronize(&config, &LogSink) {
            Ok(report) => info!(
                "Pass finished: {} actions, {} files unchanged, {} entries skipped",
                report.actions.len(),
                report.statistics.files_unchanged,
                report.statistics.entries_skipped
            ),
            Err(e) => error!("Synchronization pass failed: {}", e),
        }
        info!("Sleeping for {} seconds", args.interval);
        thread::sleep(Duration::from_secs(args.interval));
    }
}
