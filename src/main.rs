//! timesieve - Keep one item per hour, day, week, month and year.
//!
//! Usage:
//!   tsieve RULES ITEM...           Print rejected items
//!   tsieve -a RULES ITEM...        Print accepted items
//!   tsieve -d RULES ITEM...        Print and delete rejected items
//!   tsieve -m DIR RULES ITEM...    Print and move rejected items into DIR
//!   tsieve --help                  Show help

use std::ffi::OsString;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use timesieve_classify::{Item, Policy, RetentionClassifier};
use timesieve_core::{CollectConfig, Separator, TimeSource};
use timesieve_ops::{Action, ActionConfig, ActionKind, ActionResult, start_action};
use timesieve_scan::{ItemCollector, parse_local_time};

/// Format of `--reference-time`.
const REFERENCE_TIME_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Parser)]
#[command(
    name = "timesieve",
    version,
    about = "Accept or reject items based on age categories",
    long_about = "timesieve sorts items into time buckets and keeps the newest item of \
                  every requested bucket.\n\n\
                  RULES is a comma-separated list of <category><count> tokens, e.g. \
                  `days5,weeks4,recent3` keeps the newest item for each of the last 5 \
                  days and 4 weeks, plus the 3 newest items younger than one hour. \
                  Categories: years, months, weeks, days, hours, recent.\n\n\
                  Rejected items are printed by default; see --accepted.",
    group(ArgGroup::new("time_format").args(["time_from_basename", "time_from_string"]))
)]
struct Cli {
    /// Filter rules, e.g. "days5,weeks4"
    rules: String,

    /// Items to classify: paths, or strings with --time-from-string
    #[arg(required_unless_present = "stdin")]
    items: Vec<OsString>,

    /// Read items from stdin instead of the command line
    #[arg(short, long, conflicts_with = "items")]
    stdin: bool,

    /// Separate items with NUL instead of newline, on input and output
    #[arg(short = '0', long)]
    nullsep: bool,

    /// Output (and act on) accepted instead of rejected items
    #[arg(short, long)]
    accepted: bool,

    /// Reference time in local time (default: now)
    #[arg(short = 't', long, value_name = "YYYYmmDD-HHMMSS")]
    reference_time: Option<String>,

    /// Parse the modification time from the item basename with format FMT
    #[arg(long, value_name = "FMT")]
    time_from_basename: Option<String>,

    /// Treat items as strings and parse their time with format FMT
    #[arg(long, value_name = "FMT", conflicts_with_all = ["delete", "move_to"])]
    time_from_string: Option<String>,

    /// Regex with one capture group selecting the time part of basename/string
    #[arg(long, value_name = "REGEX", requires = "time_format")]
    time_regex: Option<String>,

    /// Delete the output items
    #[arg(short, long, conflicts_with = "move_to")]
    delete: bool,

    /// Move the output items into existing directory DIR
    #[arg(short, long = "move", value_name = "DIR")]
    move_to: Option<PathBuf>,

    /// Delete directories recursively
    #[arg(short, long, requires = "delete")]
    recursive_delete: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    fn separator(&self) -> Separator {
        if self.nullsep {
            Separator::Nul
        } else {
            Separator::Newline
        }
    }

    fn collect_config(&self) -> Result<CollectConfig> {
        let time_source = match (&self.time_from_basename, &self.time_from_string) {
            (Some(fmt), _) => TimeSource::Basename(fmt.clone()),
            (None, Some(fmt)) => TimeSource::Text(fmt.clone()),
            (None, None) => TimeSource::Inode,
        };
        CollectConfig::builder()
            .time_source(time_source)
            .time_regex(self.time_regex.clone())
            .separator(self.separator())
            .build()
            .wrap_err("Invalid item options")
    }

    fn action(&self) -> Result<Option<Action>> {
        let kind = match (self.delete, &self.move_to) {
            (true, _) => ActionKind::Delete,
            (false, Some(_)) => ActionKind::Move,
            (false, None) => return Ok(None),
        };
        let config = ActionConfig::builder()
            .kind(kind)
            .target(self.move_to.clone())
            .recursive(self.recursive_delete)
            .build()
            .wrap_err("Invalid action options")?;
        config
            .action()
            .ok_or_else(|| eyre!("Move requires a target directory"))
            .map(Some)
    }

    /// The `-t` time, or `None` to measure against the current time.
    fn reference_time(&self) -> Result<Option<f64>> {
        self.reference_time
            .as_deref()
            .map(|s| {
                parse_local_time(s, REFERENCE_TIME_FORMAT)
                    .wrap_err_with(|| format!("Invalid reference time '{s}'"))
            })
            .transpose()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let policy: Policy = cli.rules.parse().wrap_err("Invalid rules")?;
    info!(%policy, "using rules");

    let classifier = match cli.reference_time()? {
        Some(time) => RetentionClassifier::new(policy, time),
        None => RetentionClassifier::now(policy),
    };
    info!(reference_time = classifier.reference_time(), "using reference time");

    let action = cli.action()?;
    let collector = ItemCollector::new(cli.collect_config()?)?;

    let items = if cli.stdin {
        let records = collector
            .read_records(io::stdin().lock())
            .wrap_err("Failed to read items from stdin")?;
        collector.collect(&records)?
    } else {
        collector.collect(&cli.items)?
    };
    info!(count = items.len(), "collected items");

    let result = classifier.classify(items)?;
    info!(
        accepted = result.accepted.len(),
        rejected = result.rejected.len(),
        "classified items"
    );

    if let OutputFormat::Json = cli.format {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    let (accepted, rejected) = result.into_parts();
    let selected = if cli.accepted { accepted } else { rejected };
    for item in &selected {
        debug!(item = %item.label(), accepted = cli.accepted, "selected");
    }

    if let OutputFormat::Text = cli.format {
        write_items(&selected, cli.separator())?;
    }

    if let Some(action) = action {
        run_action(&selected, action).await;
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` overrides `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Write items to stdout, each followed by the separator.
fn write_items(items: &[Item], separator: Separator) -> Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    for item in items {
        match item.path() {
            Some(path) => out.write_all(path.as_os_str().as_encoded_bytes())?,
            None => out.write_all(item.label().as_bytes())?,
        }
        out.write_all(&[separator.byte()])?;
    }
    out.flush()?;
    Ok(())
}

/// Run a file system action on the selected items. Failures are logged.
async fn run_action(items: &[Item], action: Action) {
    let entries: Vec<_> = items.iter().filter_map(Item::as_fs).cloned().collect();
    debug!(count = entries.len(), action = %action.kind(), "starting action");

    let mut rx = start_action(entries, action);
    while let Some(result) = rx.recv().await {
        match result {
            ActionResult::Progress(progress) => {
                if let Some(path) = &progress.current {
                    debug!(
                        path = %path.display(),
                        done = progress.completed,
                        total = progress.total,
                        "processing"
                    );
                }
            }
            ActionResult::Complete(complete) => info!("{}", complete.summary()),
        }
    }
}
