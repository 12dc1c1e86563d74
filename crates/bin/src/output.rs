//! Output formatting helpers for human-readable and JSON output.

use crate::cli::Format;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Human => OutputFormat::Human,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Render a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    // Column widths are the max of header and all row values
    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render = |cells: Vec<&str>| -> String {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        line.join("  ").trim_end().to_string()
    };

    let mut out = render(headers.to_vec());
    for row in rows {
        out.push('\n');
        out.push_str(&render(row.iter().take(col_count).map(String::as_str).collect()));
    }
    out
}

/// Print a table with aligned columns in human-readable format.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if !rows.is_empty() {
        println!("{}", format_table(headers, rows));
    }
}

/// Report the outcome of a single-node command.
pub fn print_change(
    format: OutputFormat,
    action: &str,
    workspace: &str,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => println!("{action}: /{path} ({workspace})"),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "action": action,
                "workspace": workspace,
                "path": path,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}
