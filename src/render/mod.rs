//! Render dispatcher
//!
//! Recomputes every derived view from the current relations and view state,
//! then pushes each one to its presentation adapter. Chart handles from the
//! previous pass are released before anything new is drawn, and a failing
//! adapter only costs its own view.

mod charts;

use serde::Serialize;

pub(crate) use charts::{
    Chart, ChartKind, ChartSlot, cumulative_chart, daily_chart, distribution_chart, weekday_chart,
};

use crate::core::{
    BookRow, BookSlice, CumulativeTotal, DayTotal, Relations, ViewState, WeekdayTotal,
    book_distribution, book_table, cumulative_totals, daily_totals, summary_total, weekday_totals,
};
use crate::error::AppError;
use crate::utils::Timezone;

/// All six derived views for one render pass
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Views {
    pub(crate) summary_seconds: i64,
    pub(crate) books: Vec<BookRow>,
    pub(crate) distribution: Vec<BookSlice>,
    pub(crate) daily: Vec<DayTotal>,
    pub(crate) cumulative: Vec<CumulativeTotal>,
    pub(crate) weekday: [WeekdayTotal; 7],
}

impl Views {
    pub(crate) fn compute(relations: &Relations, state: &ViewState, timezone: Timezone) -> Self {
        let threshold = state.threshold_secs();
        Views {
            summary_seconds: summary_total(&relations.books),
            books: book_table(
                &relations.books,
                threshold,
                state.sort_key(),
                state.ascending(),
            ),
            distribution: book_distribution(&relations.books, threshold),
            daily: daily_totals(&relations.events, timezone),
            cumulative: cumulative_totals(&relations.events, timezone),
            weekday: weekday_totals(&relations.events, timezone),
        }
    }
}

/// Opaque handle for a drawn chart; must go back to the surface that issued it
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ChartHandle(pub(crate) u64);

/// Summary figure and book table output
pub(crate) trait TableAdapter {
    fn show_summary(&mut self, total_seconds: i64) -> Result<(), AppError>;

    fn show_books(&mut self, rows: &[BookRow], state: &ViewState) -> Result<(), AppError>;
}

/// Something charts can be drawn on
pub(crate) trait ChartSurface {
    fn draw(&mut self, slot: ChartSlot, chart: &Chart) -> Result<ChartHandle, AppError>;

    fn release(&mut self, handle: ChartHandle);
}

/// Views that failed during one render pass
#[derive(Debug, Default)]
pub(crate) struct RenderReport {
    pub(crate) failures: Vec<AppError>,
}

impl RenderReport {
    fn record(&mut self, view: &'static str, result: Result<(), AppError>) {
        if let Err(e) = result {
            tracing::warn!(view, "render failed: {e}");
            self.failures.push(e);
        }
    }

    pub(crate) fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

pub(crate) struct Dispatcher<T: TableAdapter, C: ChartSurface> {
    table: T,
    charts: C,
    handles: [Option<ChartHandle>; 4],
}

impl<T: TableAdapter, C: ChartSurface> Dispatcher<T, C> {
    pub(crate) fn new(table: T, charts: C) -> Self {
        Dispatcher {
            table,
            charts,
            handles: [None, None, None, None],
        }
    }

    fn release_all(&mut self) {
        for slot in &mut self.handles {
            if let Some(handle) = slot.take() {
                self.charts.release(handle);
            }
        }
    }

    fn draw(&mut self, slot: ChartSlot, chart: Option<Chart>) -> Result<(), AppError> {
        debug_assert!(self.handles[slot.index()].is_none());
        let Some(chart) = chart else {
            return Ok(());
        };
        let handle = self.charts.draw(slot, &chart)?;
        self.handles[slot.index()] = Some(handle);
        Ok(())
    }

    /// Full render pass: teardown, recompute, push
    pub(crate) fn render(
        &mut self,
        relations: &Relations,
        state: &ViewState,
        timezone: Timezone,
    ) -> RenderReport {
        self.release_all();

        let views = Views::compute(relations, state, timezone);
        let mut report = RenderReport::default();

        report.record("summary", self.table.show_summary(views.summary_seconds));
        report.record("books", self.table.show_books(&views.books, state));

        let charts = [
            (ChartSlot::Distribution, distribution_chart(&views.distribution)),
            (ChartSlot::Daily, daily_chart(&views.daily)),
            (ChartSlot::Cumulative, cumulative_chart(&views.cumulative)),
            (ChartSlot::Weekday, weekday_chart(&views.weekday)),
        ];
        for (slot, chart) in charts {
            let result = self.draw(slot, chart);
            report.record(slot.name(), result);
        }

        report
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &T {
        &self.table
    }

    #[cfg(test)]
    pub(crate) fn charts(&self) -> &C {
        &self.charts
    }
}

impl<T: TableAdapter, C: ChartSurface> Drop for Dispatcher<T, C> {
    fn drop(&mut self) {
        self.release_all();
    }
}
