use crate::utils::config::{ReportConfig, DEFAULT_RUNS};
use std::path::PathBuf;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Path to the primary trace text
    pub trace: PathBuf,

    /// Directory holding `events.<run>.txt` logs
    pub events_dir: PathBuf,

    /// Number of event-log runs to average
    pub runs: usize,

    /// Output path for the HTML page (optional)
    pub output_html: Option<PathBuf>,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Threshold, fallback and depth encoding
    pub config: ReportConfig,

    /// HTML page title (optional)
    pub title: Option<String>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            trace: PathBuf::from("trace.txt"),
            events_dir: PathBuf::from("events"),
            runs: DEFAULT_RUNS,
            output_html: Some(PathBuf::from("trace.html")),
            output_json: None,
            config: ReportConfig::default(),
            title: None,
            print_summary: false,
        }
    }
}

impl ReportArgs {
    /// Event log path for one run
    pub fn event_log_path(&self, run: usize) -> PathBuf {
        self.events_dir.join(format!("events.{}.txt", run))
    }
}
