//! Book table export (CSV and JSON)

use serde_json::json;
use std::fmt::Write as _;
use std::path::Path;

use crate::core::BookRow;
use crate::error::AppError;

const COLUMNS: [&str; 3] = ["title", "authors", "total_read_time"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// Every value is quoted; embedded quotes are doubled
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub(crate) fn book_table_csv(rows: &[BookRow]) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');
    for row in rows {
        let _ = writeln!(
            out,
            "{},{},{}",
            quote(&row.title),
            quote(row.authors_display()),
            quote(&row.total_read_time.to_string()),
        );
    }
    out
}

/// Array of objects keyed by column name
pub(crate) fn book_table_json(rows: &[BookRow]) -> Result<String, serde_json::Error> {
    let objects: Vec<_> = rows
        .iter()
        .map(|row| {
            json!({
                COLUMNS[0]: row.title,
                COLUMNS[1]: row.authors,
                COLUMNS[2]: row.total_read_time,
            })
        })
        .collect();
    serde_json::to_string_pretty(&objects)
}

pub(crate) fn render_export(rows: &[BookRow], format: ExportFormat) -> Result<String, AppError> {
    match format {
        ExportFormat::Csv => Ok(book_table_csv(rows)),
        ExportFormat::Json => book_table_json(rows).map_err(AppError::from),
    }
}

/// Write an export artifact to `path`, or stdout when there is none
pub(crate) fn write_export(
    rows: &[BookRow],
    format: ExportFormat,
    path: Option<&Path>,
) -> Result<(), AppError> {
    let body = render_export(rows, format)?;
    match path {
        Some(path) => {
            std::fs::write(path, body).map_err(|source| AppError::Export {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::info!(path = %path.display(), rows = rows.len(), "exported book table");
            Ok(())
        }
        None => {
            print!("{body}");
            Ok(())
        }
    }
}
