//! `skipdays` CLI: advance a date by N days, skipping holidays, weekends, and
//! explicit blocked dates.
//!
//! ## Usage
//!
//! ```sh
//! # 30 days from July 1st, skipping the 4th and every weekend
//! skipdays resolve --start 2011-07-01 --days 30 \
//!     -b "Independence Day" -b "RRULE:FREQ=WEEKLY;BYDAY=SA,SU"
//!
//! # Read blocked-day lines from a file (or "-" for stdin), print JSON
//! skipdays resolve --start 7/1/2011 --days 30 --blocked-file blocked.txt --json
//!
//! # Start from a JSON options document
//! skipdays resolve --config options.json --days 30
//!
//! # Report lines that are not recognized
//! skipdays check -i blocked.txt
//!
//! # List holiday names understood in blocked-day text
//! skipdays holidays
//! ```
//!
//! Logs go to stderr. Use `-v`/`-vv` or `RUST_LOG` to see them.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use clap::{ArgAction, Parser, Subcommand};
use serde_json::json;
use skip_engine::{DateParser, Resolution, SkipCalendar};
use std::io::{self, Read};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "skipdays",
    version,
    about = "Advance a date by N days, skipping blocked days"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the end of a window holding N unblocked days
    Resolve {
        /// Start date (defaults to today, or the config's start_date)
        #[arg(short, long)]
        start: Option<String>,
        /// Number of unblocked days to count
        #[arg(short = 'n', long, allow_hyphen_values = true)]
        days: i64,
        /// Blocked-day line: a date, holiday name, or RRULE (repeatable)
        #[arg(short, long = "blocked")]
        blocked: Vec<String>,
        /// File of blocked-day lines ("-" reads stdin)
        #[arg(long)]
        blocked_file: Option<String>,
        /// JSON options document (start_date, blocked_spec_text, blocked_entries)
        #[arg(short, long)]
        config: Option<String>,
        /// IANA time zone used to pick "today" when no start is given
        #[arg(long)]
        timezone: Option<String>,
        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report blocked-day lines that are not recognized
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List the holiday names understood in blocked-day text
    Holidays,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Resolve {
            start,
            days,
            blocked,
            blocked_file,
            config,
            timezone,
            json,
        } => {
            let mut cal = match config.as_deref() {
                Some(path) => {
                    let text = read_input(Some(path))?;
                    SkipCalendar::from_options_json(&text)
                        .with_context(|| format!("Invalid options in {}", path))?
                }
                None => SkipCalendar::new(),
            };

            let today = today_in(timezone.as_deref())?;
            match start.as_deref() {
                Some(raw) => {
                    let day = DateParser::new(today.year())
                        .parse(raw)
                        .with_context(|| format!("Invalid start date: '{}'", raw))?;
                    cal.set_start_date(day)?;
                }
                None if cal.start_date().is_none() => {
                    debug!(%today, "no start date given, using today");
                    cal.set_start_date(today)?;
                }
                None => {}
            }

            if !blocked.is_empty() {
                cal.parse_spec_text(&blocked.join("\n"));
            }
            if let Some(path) = blocked_file.as_deref() {
                let text = read_input(if path == "-" { None } else { Some(path) })?;
                cal.parse_spec_text(&text);
            }

            for (line, reason) in cal.bad_formats().iter() {
                eprintln!("warning: ignored '{}': {}", line, reason);
            }

            let result = cal.resolve(days).context("Failed to resolve window")?;
            if json {
                println!("{}", render_json(&cal, days, &result)?);
            } else {
                print!("{}", render_text(days, &result));
            }
        }
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            let mut cal = SkipCalendar::new();
            cal.set_start_date(today_in(None)?)?;
            let added = cal.parse_spec_text(&text);

            println!("recognized: {}", added);
            println!("unrecognized: {}", cal.bad_formats().len());
            for (line, reason) in cal.bad_formats().iter() {
                println!("  {}: {}", line, reason);
            }
            if !cal.bad_formats().is_empty() {
                process::exit(1);
            }
        }
        Commands::Holidays => {
            let cal = SkipCalendar::new();
            for name in cal.holiday_table().names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn today_in(timezone: Option<&str>) -> Result<NaiveDate> {
    match timezone {
        Some(name) => {
            let tz: chrono_tz::Tz = name
                .parse()
                .map_err(|e| anyhow::anyhow!("Unknown time zone '{}': {}", name, e))?;
            Ok(Utc::now().with_timezone(&tz).date_naive())
        }
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn render_text(days: i64, result: &Resolution) -> String {
    let mut out = String::new();
    out.push_str(&format!("start:   {}\n", result.window.start()));
    out.push_str(&format!("end:     {}\n", result.end()));
    out.push_str(&format!("days:    {}\n", days));
    out.push_str(&format!("skipped: {}\n", result.skipped.len()));
    for run in result.skipped.spans() {
        if run.len_days() == 1 {
            out.push_str(&format!("  {}\n", run.start()));
        } else {
            // Runs print inclusive of their last day.
            let last = run.end().pred_opt().unwrap_or(run.end());
            out.push_str(&format!("  {} to {}\n", run.start(), last));
        }
    }
    out
}

fn render_json(cal: &SkipCalendar, days: i64, result: &Resolution) -> Result<String> {
    let value = json!({
        "start": result.window.start(),
        "end": result.end(),
        "days": days,
        "skipped": result.skipped,
        "bad_formats": cal.bad_formats(),
    });
    serde_json::to_string_pretty(&value).context("Failed to serialize resolution")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
