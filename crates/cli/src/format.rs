//! Report rendering.

use hellotable::{Report, Result};

/// How the final report is printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Render the report; human output is a short summary since the log already
/// shows every row.
pub fn format_report(report: &Report, mode: OutputMode) -> Result<String> {
    match mode {
        OutputMode::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputMode::Human => {
            let mut out = Vec::new();
            out.push(format!(
                "wrote {} rows, read {} back, {} left after the range drop",
                report.written.len(),
                report.all_rows.len(),
                report.after_delete.len()
            ));
            if let Some(e) = &report.drop_error {
                out.push(format!("row range drop failed: {}", e));
            }
            let samples: Vec<String> = report.samples.iter().map(|s| s.to_string()).collect();
            out.push(format!("sampled keys: [{}]", samples.join(", ")));
            Ok(out.join("\n"))
        }
    }
}

/// Render an error for stderr, prefixed with `(error)`.
pub fn format_error(error: &hellotable::Error) -> String {
    format!("(error) {}", error)
}
