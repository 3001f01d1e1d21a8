use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("No statistics file given (use --file or set `file` in the config)")]
    NoInput,

    #[error("Cannot open {}: {reason}", path.display())]
    InvalidFile { path: PathBuf, reason: String },

    #[error("Missing table \"{name}\"")]
    MissingRelation { name: &'static str },

    #[error("Table \"{relation}\" has no column \"{column}\"")]
    MissingColumn {
        relation: &'static str,
        column: &'static str,
    },

    #[error("Invalid sort column \"{input}\" (expected title, authors or duration)")]
    InvalidSort { input: String },

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("Failed to write {}: {source}", path.display())]
    Export {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{view} view failed: {reason}")]
    Adapter { view: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0}")]
    Jq(#[from] JqError),
}

#[derive(Debug, Error)]
pub(crate) enum JqError {
    #[error("jq not found. Please install jq to use --jq option.")]
    NotFound,

    #[error("Failed to run jq: {0}")]
    Spawn(std::io::Error),

    #[error("Failed to write to jq stdin: {0}")]
    Stdin(std::io::Error),

    #[error("Failed to wait for jq: {0}")]
    Wait(std::io::Error),

    #[error("Invalid UTF-8 from jq: {0}")]
    Utf8(std::string::FromUtf8Error),

    #[error("jq error: {0}")]
    Filter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_display_invalid_file() {
        let e = AppError::InvalidFile {
            path: PathBuf::from("stats.txt"),
            reason: "not a SQLite database".to_string(),
        };
        assert_eq!(e.to_string(), "Cannot open stats.txt: not a SQLite database");
    }

    #[test]
    fn app_error_display_no_input() {
        assert!(AppError::NoInput.to_string().contains("--file"));
    }

    #[test]
    fn app_error_display_missing_relation() {
        let e = AppError::MissingRelation { name: "book" };
        assert_eq!(e.to_string(), r#"Missing table "book""#);
    }

    #[test]
    fn app_error_display_missing_column() {
        let e = AppError::MissingColumn {
            relation: "page_stat_data",
            column: "duration",
        };
        assert_eq!(
            e.to_string(),
            r#"Table "page_stat_data" has no column "duration""#
        );
    }

    #[test]
    fn app_error_display_sort() {
        let e = AppError::InvalidSort {
            input: "pages".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"Invalid sort column "pages" (expected title, authors or duration)"#
        );
    }

    #[test]
    fn app_error_display_timezone() {
        let e = AppError::InvalidTimezone {
            input: "Mars/Olympus".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid timezone: Mars/Olympus");
    }

    #[test]
    fn app_error_display_adapter() {
        let e = AppError::Adapter {
            view: "weekday",
            reason: "surface closed".to_string(),
        };
        assert_eq!(e.to_string(), "weekday view failed: surface closed");
    }

    #[test]
    fn jq_error_not_found() {
        assert_eq!(
            JqError::NotFound.to_string(),
            "jq not found. Please install jq to use --jq option."
        );
    }

    #[test]
    fn app_error_from_jq_error() {
        let jq = JqError::Filter("bad filter".to_string());
        let app: AppError = jq.into();
        assert_eq!(app.to_string(), "jq error: bad filter");
    }
}
