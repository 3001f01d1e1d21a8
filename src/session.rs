//! Interactive session
//!
//! Owns the loaded relations, the current view state and the dispatcher.
//! Every accepted event ends in one full render pass.

use std::path::{Path, PathBuf};

use crate::core::{BookRow, Relations, SortKey, ViewState, book_table};
use crate::error::AppError;
use crate::render::{ChartSurface, Dispatcher, RenderReport, TableAdapter};
use crate::source::Engine;
use crate::utils::Timezone;

/// User actions that change what is displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    FileSelected(PathBuf),
    ThresholdChanged(i64),
    SortSelected(SortKey),
    Refresh,
}

pub(crate) struct Session<T: TableAdapter, C: ChartSurface> {
    engine: Engine,
    relations: Relations,
    source: Option<PathBuf>,
    state: ViewState,
    defaults: ViewState,
    timezone: Timezone,
    dispatcher: Dispatcher<T, C>,
}

impl<T: TableAdapter, C: ChartSurface> Session<T, C> {
    /// `defaults` is the view state every newly loaded file starts from
    pub(crate) fn new(
        engine: Engine,
        dispatcher: Dispatcher<T, C>,
        defaults: ViewState,
        timezone: Timezone,
    ) -> Self {
        Session {
            engine,
            relations: Relations::default(),
            source: None,
            state: defaults,
            defaults,
            timezone,
            dispatcher,
        }
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }

    pub(crate) fn relations(&self) -> &Relations {
        &self.relations
    }

    pub(crate) fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub(crate) fn state(&self) -> &ViewState {
        &self.state
    }

    /// Book table under the current state, as exported
    pub(crate) fn book_rows(&self) -> Vec<BookRow> {
        book_table(
            &self.relations.books,
            self.state.threshold_secs(),
            self.state.sort_key(),
            self.state.ascending(),
        )
    }

    /// Apply one event and re-render.
    ///
    /// A file that fails to load leaves the previous relations and state in
    /// place and nothing is redrawn.
    pub(crate) fn handle(&mut self, event: Event) -> Result<RenderReport, AppError> {
        match event {
            Event::FileSelected(path) => {
                let loaded = self.engine.load(&path)?;
                tracing::debug!(
                    path = %path.display(),
                    tables = loaded.tables.len(),
                    issues = loaded.issues.len(),
                    "file selected ({:.2}ms)",
                    loaded.elapsed_ms
                );
                self.relations = loaded.relations;
                self.source = Some(path);
                self.state = self.defaults;
            }
            Event::ThresholdChanged(minutes) => self.state.set_min_minutes(minutes),
            Event::SortSelected(key) => self.state.select_sort(key),
            Event::Refresh => {}
        }
        Ok(self
            .dispatcher
            .render(&self.relations, &self.state, self.timezone))
    }

    #[cfg(test)]
    pub(crate) fn dispatcher(&self) -> &Dispatcher<T, C> {
        &self.dispatcher
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! SQLite statistics files for session and shell tests

    use rusqlite::Connection;
    use std::path::PathBuf;
    use tempfile::TempDir;

    pub(crate) const SCHEMA: &str = "
        CREATE TABLE book (id INTEGER PRIMARY KEY, title TEXT, authors TEXT, total_read_time INTEGER);
        CREATE TABLE page_stat_data (id_book INTEGER, page INTEGER, start_time INTEGER, duration INTEGER);
    ";

    pub(crate) fn write_db(dir: &TempDir, name: &str, rows: &str) -> PathBuf {
        let path = dir.path().join(name);
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(rows).unwrap();
        path
    }

    /// Two titles, three events on 2024-01-01 and 2024-01-02 (UTC)
    pub(crate) fn sample_db(dir: &TempDir) -> PathBuf {
        write_db(
            dir,
            "statistics.sqlite3",
            "
            INSERT INTO book (title, authors, total_read_time) VALUES
                ('Dune', 'Frank Herbert', 5400),
                ('Emma', 'Jane Austen', 600);
            INSERT INTO page_stat_data (id_book, page, start_time, duration) VALUES
                (1, 1, 1704067200, 1800),
                (1, 2, 1704070800, 1800),
                (2, 1, 1704153600, 600);
            ",
        )
    }
}
