//! Aggregation engine
//!
//! Pure functions turning the source relations plus view parameters into the
//! six derived views. Nothing here performs I/O or keeps state between calls.

use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::consts::{AUTHOR_SEPARATOR, WEEKDAY_LABELS};
use crate::core::types::{
    Book, BookRow, BookSlice, CumulativeTotal, DayTotal, PageStatEvent, SortKey, WeekdayTotal,
    seconds_to_hours, seconds_to_minutes,
};
use crate::utils::Timezone;

/// Total seconds over every book row, unfiltered
pub(crate) fn summary_total(books: &[Book]) -> i64 {
    books
        .iter()
        .fold(0i64, |acc, book| acc.saturating_add(book.total_read_time))
}

/// Per-title accumulator for book grouping
#[derive(Debug, Default)]
struct BookAccumulator {
    authors: Vec<String>,
    total_read_time: i64,
}

impl BookAccumulator {
    fn add_book(&mut self, book: &Book) {
        self.total_read_time = self.total_read_time.saturating_add(book.total_read_time);
        if let Some(authors) = book.authors.as_deref()
            && !authors.is_empty()
            && !self.authors.iter().any(|seen| seen == authors)
        {
            self.authors.push(authors.to_string());
        }
    }

    fn into_row(self, title: &str) -> BookRow {
        let authors = if self.authors.is_empty() {
            None
        } else {
            Some(self.authors.join(AUTHOR_SEPARATOR))
        };
        BookRow {
            title: title.to_string(),
            authors,
            total_read_time: self.total_read_time,
        }
    }
}

/// Group raw book rows by title, keeping first-appearance order
fn group_by_title(books: &[Book]) -> Vec<BookRow> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, BookAccumulator)> = Vec::new();

    for book in books {
        let slot = *index.entry(book.title.as_str()).or_insert_with(|| {
            groups.push((book.title.as_str(), BookAccumulator::default()));
            groups.len() - 1
        });
        groups[slot].1.add_book(book);
    }

    groups
        .into_iter()
        .map(|(title, acc)| acc.into_row(title))
        .collect()
}

/// Grouped rows whose summed duration reaches the threshold (inclusive)
fn grouped_over_threshold(books: &[Book], threshold_secs: i64) -> Vec<BookRow> {
    let mut rows = group_by_title(books);
    rows.retain(|row| row.total_read_time >= threshold_secs);
    rows
}

fn compare_rows(a: &BookRow, b: &BookRow, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a.title.cmp(&b.title),
        SortKey::Authors => a.authors_display().cmp(b.authors_display()),
        SortKey::TotalReadTime => a.total_read_time.cmp(&b.total_read_time),
    }
}

/// Book table: grouped, filtered on the group total and stably sorted
pub(crate) fn book_table(
    books: &[Book],
    threshold_secs: i64,
    sort_key: SortKey,
    ascending: bool,
) -> Vec<BookRow> {
    let mut rows = grouped_over_threshold(books, threshold_secs);
    if ascending {
        rows.sort_by(|a, b| compare_rows(a, b, sort_key));
    } else {
        rows.sort_by(|a, b| compare_rows(b, a, sort_key));
    }
    rows
}

/// Book distribution: same filter as the table, always longest first
pub(crate) fn book_distribution(books: &[Book], threshold_secs: i64) -> Vec<BookSlice> {
    let mut rows = grouped_over_threshold(books, threshold_secs);
    rows.sort_by(|a, b| b.total_read_time.cmp(&a.total_read_time));
    rows.into_iter()
        .map(|row| BookSlice {
            hours: seconds_to_hours(row.total_read_time),
            title: row.title,
        })
        .collect()
}

/// Summed seconds per local day, ascending
fn seconds_by_day(events: &[PageStatEvent], timezone: Timezone) -> BTreeMap<NaiveDate, i64> {
    let mut days: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for event in events {
        let Some(date) = timezone.local_date(event.start_time) else {
            tracing::debug!(start_time = event.start_time, "skipping out-of-range timestamp");
            continue;
        };
        let total = days.entry(date).or_default();
        *total = total.saturating_add(event.duration);
    }
    days
}

/// Hours read per day; days without events are absent
pub(crate) fn daily_totals(events: &[PageStatEvent], timezone: Timezone) -> Vec<DayTotal> {
    seconds_by_day(events, timezone)
        .into_iter()
        .map(|(day, seconds)| DayTotal {
            day,
            hours: seconds_to_hours(seconds),
        })
        .collect()
}

/// Running total of minutes read, one entry per day with events
pub(crate) fn cumulative_totals(
    events: &[PageStatEvent],
    timezone: Timezone,
) -> Vec<CumulativeTotal> {
    let mut running: i64 = 0;
    seconds_by_day(events, timezone)
        .into_iter()
        .map(|(day, seconds)| {
            running = running.saturating_add(seconds);
            CumulativeTotal {
                day,
                minutes: seconds_to_minutes(running),
            }
        })
        .collect()
}

/// Hours read per weekday, Sunday first, zero filled
pub(crate) fn weekday_totals(events: &[PageStatEvent], timezone: Timezone) -> [WeekdayTotal; 7] {
    let mut seconds = [0i64; 7];
    for event in events {
        if let Some(date) = timezone.local_date(event.start_time) {
            let idx = date.weekday().num_days_from_sunday() as usize;
            seconds[idx] = seconds[idx].saturating_add(event.duration);
        }
    }

    std::array::from_fn(|idx| WeekdayTotal {
        weekday: idx as u8,
        label: WEEKDAY_LABELS[idx],
        hours: seconds_to_hours(seconds[idx]),
    })
}
