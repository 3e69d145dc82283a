//! Report command implementation.
//!
//! The report command:
//! 1. Reads and correlates the per-run event logs
//! 2. Parses the trace into a tree and timelines
//! 3. Ranks objects and scripts and groups namespaces
//! 4. Builds the report
//! 5. Writes output files

use super::models::ReportArgs;
use crate::aggregator::aggregate;
use crate::output::{write_html, write_report};
use crate::parser::{parse_trace, to_report, Report};
use crate::render::{generate_html, generate_text_summary, PageConfig};
use crate::timeline::{correlate, parse_event_log, EventLog};
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::time::Instant;

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Report command arguments
///
/// # Returns
/// The report that was written
///
/// # Errors
/// * Missing or unreadable trace and event logs
/// * Incomplete event data across runs
/// * Unrecognized script namespaces
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = ReportArgs {
///     trace: PathBuf::from("trace.txt"),
///     events_dir: PathBuf::from("events"),
///     runs: 10,
///     ..Default::default()
/// };
///
/// execute_report(args)?;
/// ```
pub fn execute_report(args: ReportArgs) -> Result<Report> {
    let start_time = Instant::now();

    info!("Starting report for trace: {}", args.trace.display());

    // Step 1: Correlate event logs
    info!("Step 1/5: Reading {} event logs...", args.runs);
    let logs = load_event_logs(&args)?;
    let events = correlate(&logs).context("Failed to correlate event logs")?;

    debug!("Averaged {} script timestamps over {} runs", events.len(), events.runs());

    // Step 2: Parse trace
    info!("Step 2/5: Parsing trace...");
    let text = fs::read_to_string(&args.trace)
        .with_context(|| format!("Failed to read trace {}", args.trace.display()))?;
    let parsed = parse_trace(&text, &events, args.config.depth_encoding)
        .context("Failed to parse trace")?;

    debug!(
        "Parsed trace: {} nodes (max depth {}), {} backrefs, {} objects, {} scripts",
        parsed.tree.len(),
        parsed.tree.max_depth(),
        parsed.backrefs.len(),
        parsed.objects.len(),
        parsed.scripts.len()
    );

    // Step 3: Aggregate
    info!(
        "Step 3/5: Ranking objects above {}ms and scripts...",
        args.config.object_threshold_ms
    );
    let aggregate = aggregate(parsed.objects.clone(), parsed.scripts.clone(), &args.config)
        .context("Failed to aggregate timelines")?;

    // Step 4: Build report
    info!("Step 4/5: Building report...");
    let report = to_report(&parsed, aggregate, events.runs());

    // Step 5: Write outputs
    info!("Step 5/5: Writing output files...");

    if let Some(json_path) = &args.output_json {
        write_report(&report, json_path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", json_path.display());
    }

    if let Some(html_path) = &args.output_html {
        let page = args
            .title
            .as_ref()
            .map(|title| PageConfig::new().with_title(title.as_str()));
        let html = generate_html(&report, page.as_ref());
        write_html(&html, html_path).context("Failed to write HTML report")?;
        info!("✓ HTML written to: {}", html_path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("SNAPSHOT DESERIALIZATION SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Trace:        {}", args.trace.display());
        println!("Runs:         {}", report.runs);
        println!("Nodes:        {}", parsed.tree.len());
        println!("Object time:  {:.3}ms", report.total_object_time);
        println!("Script time:  {:.3}ms", report.total_script_time);
        println!("\n{}", generate_text_summary(&report, 10));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Report completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Read `events.0.txt` through `events.<runs - 1>.txt`
///
/// **Public** - exposed for callers that correlate on their own
pub fn load_event_logs(args: &ReportArgs) -> Result<Vec<EventLog>> {
    (0..args.runs)
        .map(|run| {
            let path = args.event_log_path(run);
            debug!("Reading event log {}", path.display());
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read event log {}", path.display()))?;
            Ok(parse_event_log(&text))
        })
        .collect()
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if args.runs == 0 {
        anyhow::bail!("runs must be greater than 0");
    }

    if !args.trace.is_file() {
        anyhow::bail!("Trace file not found: {}", args.trace.display());
    }

    if !args.events_dir.is_dir() {
        anyhow::bail!("Events directory not found: {}", args.events_dir.display());
    }

    if args.output_html.is_none() && args.output_json.is_none() && !args.print_summary {
        anyhow::bail!("Nothing to do: enable HTML, JSON or summary output");
    }

    Ok(())
}
