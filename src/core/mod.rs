//! Core module - source relations, view state and aggregation

mod aggregator;
mod state;
mod types;

pub(crate) use aggregator::{
    book_distribution, book_table, cumulative_totals, daily_totals, summary_total, weekday_totals,
};
pub(crate) use state::ViewState;
pub(crate) use types::{
    Book, BookRow, BookSlice, CumulativeTotal, DayTotal, PageStatEvent, Relations, SortKey,
    WeekdayTotal,
};
