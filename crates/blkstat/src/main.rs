//! blkstat - block I/O accounting for a cgroup.
//!
//! Reads the cgroup v1 blkio `*_recursive` files of one cgroup and prints the
//! counters, either once or as per-second rates at a fixed interval.

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

use blkstat_core::collector::{BlkioCollector, FileSystem, RealFs};
use blkstat_core::{BlkioError, BlkioRates, BlkioStats, StatFile};

/// Block I/O statistics for a cgroup.
#[derive(Parser)]
#[command(name = "blkstat", about = "Block I/O statistics for a cgroup", version)]
struct Args {
    /// Path to the cgroup directory in the blkio hierarchy.
    #[arg(
        value_name = "PATH",
        env = "BLKSTAT_CGROUP_PATH",
        default_value = "/sys/fs/cgroup/blkio"
    )]
    cgroup_path: PathBuf,

    /// Output as JSON.
    #[arg(long)]
    json: bool,

    /// Sample every N seconds and print per-second rates.
    #[arg(short, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Number of rate reports in interval mode (default: unlimited).
    #[arg(short, long, requires = "interval")]
    count: Option<u64>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Failure of a single run; any of these exits with status 1.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Collect(#[from] BlkioError),
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// One line of `--json` output in interval mode.
#[derive(Serialize)]
struct RateReport<'a> {
    timestamp: String,
    rates: &'a BlkioRates,
}

/// Initializes the tracing subscriber with the appropriate log level.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["blkstat", "blkstat_core"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Formats bytes as human-readable size string.
fn format_size(bytes: f64) -> String {
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    const KIB: f64 = 1024.0;

    if bytes >= GIB {
        format!("{:.1} GiB", bytes / GIB)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes / MIB)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes / KIB)
    } else {
        format!("{} B", bytes.round())
    }
}

fn format_value(file: StatFile, value: f64) -> String {
    match file {
        StatFile::ServiceBytes => format_size(value),
        _ if value.fract() == 0.0 => format!("{}", value),
        _ => format!("{:.1}", value),
    }
}

fn render_stats(stats: &BlkioStats) -> String {
    let mut out = String::new();
    for file in StatFile::ALL {
        out.push_str(&format!("{}:\n", file.file_name()));
        for (key, &value) in stats.map(file) {
            out.push_str(&format!("  {} {}\n", key, format_value(file, value as f64)));
        }
    }
    out
}

fn render_rates(rates: &BlkioRates) -> String {
    let mut out = String::new();
    for file in StatFile::ALL {
        match rates.rate_map(file) {
            Some(map) if !map.is_empty() => {
                out.push_str(&format!("{}:\n", file.file_name()));
                for (key, &value) in map {
                    out.push_str(&format!("  {} {}/s\n", key, format_value(file, value)));
                }
            }
            Some(_) => {}
            // Queue depth is a gauge, shown as the current value.
            None if !rates.queued.is_empty() => {
                out.push_str(&format!("{}:\n", file.file_name()));
                for (key, &value) in &rates.queued {
                    out.push_str(&format!("  {} {}\n", key, value));
                }
            }
            None => {}
        }
    }
    out
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

fn print_once<F: FileSystem>(collector: &BlkioCollector<F>, json: bool) -> Result<(), CliError> {
    let stats = collector.stats()?;
    if json {
        println!("{}", to_json(&stats, true)?);
    } else {
        print!("{}", render_stats(&stats));
    }
    Ok(())
}

fn watch<F: FileSystem>(
    collector: &BlkioCollector<F>,
    interval: Duration,
    count: Option<u64>,
    json: bool,
) -> Result<(), CliError> {
    let mut prev = collector.stats()?;
    let mut prev_at = Instant::now();
    let mut reports = 0u64;

    while count.is_none_or(|c| reports < c) {
        thread::sleep(interval);

        let curr = collector.stats()?;
        let now = Instant::now();
        let dt = now.duration_since(prev_at).as_secs_f64();
        let rates = BlkioRates::between(&prev, &curr, dt);
        debug!(dt, entries = curr.len(), "sampled blkio stats");

        let ts = Utc::now().format("%Y-%m-%d %H:%M:%S");
        if json {
            let report = RateReport {
                timestamp: ts.to_string(),
                rates: &rates,
            };
            println!("{}", to_json(&report, false)?);
        } else {
            println!("{}", ts);
            print!("{}", render_rates(&rates));
        }

        prev = curr;
        prev_at = now;
        reports += 1;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let collector = BlkioCollector::new(RealFs::new(), &args.cgroup_path);
    info!("reading blkio stats from {}", args.cgroup_path.display());

    let result = match args.interval {
        Some(secs) => watch(&collector, Duration::from_secs(secs), args.count, args.json),
        None => print_once(&collector, args.json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Collect(e)) if e.is_missing() => {
            error!(
                "{} (is the blkio controller mounted at {}?)",
                e,
                args.cgroup_path.display()
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
