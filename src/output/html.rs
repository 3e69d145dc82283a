//! HTML page output.

use super::prepare_output_path;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a rendered HTML page to a file
///
/// **Public** - main entry point for HTML output
///
/// # Arguments
/// * `html_content` - Page from `render::generate_html`
/// * `output_path` - Path to output HTML file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
///
/// # Example
/// ```ignore
/// let html = generate_html(&report, None);
/// write_html(&html, "trace.html")?;
/// ```
pub fn write_html(html_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing HTML to: {}", output_path.display());
    prepare_output_path(output_path)?;

    let extension = output_path.extension().and_then(|ext| ext.to_str());
    if extension.is_some_and(|ext| ext != "html" && ext != "htm") {
        debug!("Warning: File does not have .html extension: {}", output_path.display());
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(html_content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    let file_size = html_content.len();
    info!(
        "HTML written successfully ({} bytes, {:.2} KB)",
        file_size,
        file_size as f64 / 1024.0
    );

    Ok(())
}
