use comfy_table::{Cell, Color};
use std::io::Write;

use crate::core::{BookRow, SortKey, ViewState};
use crate::error::AppError;
use crate::output::format::{
    NumberFormat, create_styled_table, format_decimal, format_hours, header_cell, right_cell,
    styled_cell,
};
use crate::render::TableAdapter;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) use_color: bool,
    pub(crate) compact: bool,
    pub(crate) number_format: NumberFormat,
}

/// Summary figure and book table drawn with comfy-table
pub(crate) struct TerminalTable<W: Write> {
    out: W,
    options: TableOptions,
}

impl<W: Write> TerminalTable<W> {
    pub(crate) fn new(out: W, options: TableOptions) -> Self {
        TerminalTable { out, options }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

fn write_failed(view: &'static str, e: std::io::Error) -> AppError {
    AppError::Adapter {
        view,
        reason: e.to_string(),
    }
}

/// Column header with the active sort marker
fn sort_label(label: &str, key: SortKey, state: &ViewState) -> String {
    if state.sort_key() != key {
        return label.to_string();
    }
    let arrow = if state.ascending() { '▲' } else { '▼' };
    format!("{label} {arrow}")
}

fn threshold_note(state: &ViewState) -> String {
    let minutes = state.threshold_secs() / 60;
    if minutes == 0 {
        String::new()
    } else {
        format!(" (at least {minutes} min)")
    }
}

fn build_book_table(rows: &[BookRow], state: &ViewState, options: TableOptions) -> String {
    let c = options.use_color;
    let nf = options.number_format;

    let mut table = create_styled_table();
    let mut header = vec![header_cell(&sort_label("Title", SortKey::Title, state), c)];
    if !options.compact {
        header.push(header_cell(&sort_label("Authors", SortKey::Authors, state), c));
    }
    header.push(header_cell(
        &sort_label("Hours", SortKey::TotalReadTime, state),
        c,
    ));
    table.set_header(header);

    for row in rows {
        let mut cells = vec![Cell::new(&row.title)];
        if !options.compact {
            cells.push(Cell::new(row.authors_display()));
        }
        cells.push(right_cell(&format_hours(row.total_read_time, nf), None, false));
        table.add_row(cells);
    }

    let cyan = c.then_some(Color::Cyan);
    let total: i64 = rows.iter().map(|r| r.total_read_time).sum();
    let mut total_row = vec![styled_cell(&format!("TOTAL ({})", rows.len()), cyan, true)];
    if !options.compact {
        total_row.push(Cell::new(""));
    }
    total_row.push(right_cell(&format_hours(total, nf), cyan, true));
    table.add_row(total_row);

    table.to_string()
}

impl<W: Write> TableAdapter for TerminalTable<W> {
    fn show_summary(&mut self, total_seconds: i64) -> Result<(), AppError> {
        let hours = format_hours(total_seconds, self.options.number_format);
        let value = if self.options.use_color {
            format!("\x1b[1;32m{hours} hours\x1b[0m")
        } else {
            format!("{hours} hours")
        };
        writeln!(self.out, "\n  Total Reading Time\n  {value}\n")
            .map_err(|e| write_failed("summary", e))
    }

    fn show_books(&mut self, rows: &[BookRow], state: &ViewState) -> Result<(), AppError> {
        let table = build_book_table(rows, state, self.options);
        writeln!(self.out, "  Books{}\n", threshold_note(state))
            .and_then(|()| writeln!(self.out, "{table}"))
            .map_err(|e| write_failed("books", e))
    }
}

/// One-line count summary under a table
pub(crate) fn summary_line(books: usize, events: usize, nf: NumberFormat) -> String {
    format!(
        "{} books, {} reading events",
        format_decimal(books as f64, 0, nf),
        format_decimal(events as f64, 0, nf)
    )
}
