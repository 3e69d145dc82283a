//! Snapshot Trace Studio CLI
//!
//! Turns a snapshot deserialization trace and its per-run event logs into
//! an HTML report, a JSON report and a terminal summary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use snapshot_trace_studio::commands::{
    display_schema, display_version, execute_report, validate_args, validate_report_file,
    ReportArgs,
};
use snapshot_trace_studio::parser::DepthEncoding;
use snapshot_trace_studio::utils::config::{load_config, ReportConfig, DEFAULT_RUNS};

/// Snapshot Trace Studio - timing reports for snapshot deserialization
#[derive(Parser, Debug)]
#[command(name = "snapshot-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a report from a trace and its event logs
    Report {
        /// Path to the trace text
        #[arg(short, long, default_value = "trace.txt")]
        trace: PathBuf,

        /// Directory holding events.<run>.txt logs
        #[arg(short, long, default_value = "events")]
        events: PathBuf,

        /// Number of event-log runs to average
        #[arg(short, long, default_value_t = DEFAULT_RUNS)]
        runs: usize,

        /// Output path for the HTML report
        #[arg(long, default_value = "trace.html")]
        html: PathBuf,

        /// Skip the HTML report
        #[arg(long)]
        no_html: bool,

        /// Output path for the JSON report (optional)
        #[arg(short, long)]
        json: Option<PathBuf>,

        /// TOML file with report settings
        #[arg(short, long, env = "SNAPSHOT_TRACE_CONFIG")]
        config: Option<PathBuf>,

        /// How node depth is written in the trace (overrides config)
        #[arg(long, value_enum)]
        depth_encoding: Option<DepthEncoding>,

        /// Minimum object duration in ms for the objects table (overrides config)
        #[arg(long)]
        threshold: Option<f64>,

        /// HTML page title
        #[arg(long)]
        title: Option<String>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            trace,
            events,
            runs,
            html,
            no_html,
            json,
            config,
            depth_encoding,
            threshold,
            title,
            summary,
        } => {
            // File settings first, flags override
            let mut report_config = match config {
                Some(path) => load_config(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => ReportConfig::default(),
            };

            if let Some(encoding) = depth_encoding {
                report_config.depth_encoding = encoding;
            }
            if let Some(threshold) = threshold {
                if !threshold.is_finite() || threshold < 0.0 {
                    anyhow::bail!("threshold must be a non-negative number");
                }
                report_config.object_threshold_ms = threshold;
            }

            let args = ReportArgs {
                trace,
                events_dir: events,
                runs,
                output_html: (!no_html).then_some(html),
                output_json: json,
                config: report_config,
                title,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_report(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
