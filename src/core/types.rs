//! Core data types
//!
//! Source relations decoded from the statistics file and the derived view rows
//! computed from them.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::consts::{SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use crate::error::AppError;

/// One row of the `book` relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Book {
    pub(crate) title: String,
    pub(crate) authors: Option<String>,
    /// Seconds, never negative
    pub(crate) total_read_time: i64,
}

/// One row of the `page_stat_data` relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageStatEvent {
    /// Seconds since the Unix epoch
    pub(crate) start_time: i64,
    /// Seconds, never negative
    pub(crate) duration: i64,
}

/// Immutable snapshot of both source relations for one loaded file
#[derive(Debug, Default, Clone)]
pub(crate) struct Relations {
    pub(crate) books: Vec<Book>,
    pub(crate) events: Vec<PageStatEvent>,
}

/// Allow-listed book table columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum SortKey {
    Title,
    Authors,
    #[default]
    TotalReadTime,
}

impl SortKey {
    /// Column name as stored in the `book` relation
    pub(crate) fn column(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Authors => "authors",
            SortKey::TotalReadTime => "total_read_time",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SortKey::Title),
            "authors" | "author" => Ok(SortKey::Authors),
            "duration" | "time" | "total_read_time" => Ok(SortKey::TotalReadTime),
            _ => Err(AppError::InvalidSort {
                input: s.to_string(),
            }),
        }
    }
}

/// Book table row: all raw rows sharing a title merged into one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct BookRow {
    pub(crate) title: String,
    pub(crate) authors: Option<String>,
    pub(crate) total_read_time: i64,
}

impl BookRow {
    pub(crate) fn authors_display(&self) -> &str {
        self.authors.as_deref().unwrap_or("")
    }
}

/// One slice of the per-book distribution chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct BookSlice {
    pub(crate) title: String,
    pub(crate) hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct DayTotal {
    pub(crate) day: NaiveDate,
    pub(crate) hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CumulativeTotal {
    pub(crate) day: NaiveDate,
    pub(crate) minutes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct WeekdayTotal {
    /// 0 = Sunday .. 6 = Saturday
    pub(crate) weekday: u8,
    pub(crate) label: &'static str,
    pub(crate) hours: f64,
}

pub(crate) fn seconds_to_hours(seconds: i64) -> f64 {
    seconds as f64 / SECONDS_PER_HOUR
}

pub(crate) fn seconds_to_minutes(seconds: i64) -> f64 {
    seconds as f64 / SECONDS_PER_MINUTE
}
