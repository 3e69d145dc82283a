//! Terminal summary of a report.

use crate::aggregator::percentage;
use crate::parser::Report;

const RESET: &str = "\x1b[0m";

fn get_ansi_color(script_name: &str) -> &'static str {
    if script_name.starts_with("node:") {
        "\x1b[32m" // Green
    } else if script_name.starts_with("ext:") {
        "\x1b[34m" // Blue
    } else {
        "\x1b[90m" // Gray
    }
}

fn truncate_left(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        let tail: String = text.chars().skip(len - (width - 3)).collect();
        format!("...{}", tail)
    } else {
        text.to_string()
    }
}

/// Create a text summary with the slowest scripts, namespace shares and objects
pub fn generate_text_summary(report: &Report, max_lines: usize) -> String {
    let mut lines = Vec::new();

    lines.push("  SLOWEST SCRIPTS (time to deserialize)".to_string());
    lines.push("  ┏━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┳━━━━━━━━━━━━━━┳━━━━━━━━━┓".to_string());
    lines.push(format!("  ┃ {:<42} ┃ {:^12} ┃ {:^7} ┃", "Script (Slowest First)", "TTD (ms)", "%"));
    lines.push("  ┣━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╋━━━━━━━━━━━━━━╋━━━━━━━━━┫".to_string());
    lines.push(format!(
        "  ┃ {:<42} ┃ {:>12.3} ┃ {:>6.1}% ┃",
        "Total", report.total_script_time, 100.0
    ));

    for script in report.scripts.iter().take(max_lines) {
        let name = script.display_name();
        lines.push(format!(
            "  ┃ {}{:<42}{} ┃ {:>12.3} ┃ {:>6.1}% ┃",
            get_ansi_color(name),
            truncate_left(name, 42),
            RESET,
            script.elapsed,
            percentage(script.elapsed, report.total_script_time)
        ));
    }

    lines.push("  ┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┻━━━━━━━━━━━━━━┻━━━━━━━━━┛".to_string());

    if report.scripts.len() > max_lines {
        lines.push(format!(
            "   (Showing top {} of {} scripts)",
            max_lines,
            report.scripts.len()
        ));
    }

    if !report.namespaces.is_empty() {
        lines.push(String::new());
        lines.push("  NAMESPACE SHARE".to_string());

        let mut shares: Vec<(&String, &f64)> = report.namespaces.iter().collect();
        shares.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));

        for (namespace, share) in shares {
            let bar = "█".repeat((share / 2.0).clamp(0.0, 50.0) as usize);
            lines.push(format!("  └─ {:<20} {:50} {:>5.1}%", namespace, bar, share));
        }
    }

    lines.push(String::new());
    lines.push("  SLOWEST OBJECTS".to_string());
    lines.push(format!(
        "  {:>7}  {:>10}  {}",
        "%", "ms", "object"
    ));
    for object in report.objects.iter().take(max_lines) {
        lines.push(format!(
            "  {:>6.2}%  {:>10.3}  {}",
            percentage(object.duration, report.total_object_time),
            object.duration,
            truncate_left(&object.data, 60)
        ));
    }

    lines.join("\n")
}
