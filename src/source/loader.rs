//! Statistics file loader

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use super::Engine;
use super::schema::{BOOK, PAGE_STAT_DATA, RelationSpec, check_relation, list_tables};
use crate::core::{Book, PageStatEvent, Relations};
use crate::error::AppError;

const SQLITE_HEADER: &[u8; 16] = b"SQLite format 3\0";

/// Result of loading one statistics file
#[derive(Debug, Default)]
pub(crate) struct LoadResult {
    pub(crate) relations: Relations,
    /// Tables present in the file
    pub(crate) tables: Vec<String>,
    /// Problems that left a relation empty without failing the load
    pub(crate) issues: Vec<AppError>,
    pub(crate) elapsed_ms: f64,
}

fn invalid_file(path: &Path, reason: impl ToString) -> AppError {
    AppError::InvalidFile {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Reject anything that does not start with the SQLite header before handing it to the engine
fn check_header(path: &Path) -> Result<(), AppError> {
    let mut file = File::open(path).map_err(|e| invalid_file(path, e))?;
    let mut header = [0u8; 16];
    file.read_exact(&mut header)
        .map_err(|_| invalid_file(path, "not a SQLite database"))?;
    if &header != SQLITE_HEADER {
        return Err(invalid_file(path, "not a SQLite database"));
    }
    Ok(())
}

/// Whole number from a loosely typed column; NULL and unparsable values count as 0
fn integer_value(value: ValueRef<'_>) -> i64 {
    match value {
        ValueRef::Integer(i) => i,
        ValueRef::Real(f) => f as i64,
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .map_or(0, |f| f as i64),
        ValueRef::Null | ValueRef::Blob(_) => 0,
    }
}

/// Epoch seconds keep their sign so pre-1970 events stay on their own day
fn timestamp_value(value: ValueRef<'_>) -> i64 {
    integer_value(value)
}

/// Durations never go below 0
fn seconds_value(value: ValueRef<'_>) -> i64 {
    integer_value(value).max(0)
}

fn text_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

/// Rows without a title cannot be grouped with anything and are skipped
fn load_books(conn: &Connection) -> rusqlite::Result<Vec<Book>> {
    let mut stmt = conn.prepare("SELECT title, authors, total_read_time FROM book")?;
    let rows = stmt.query_map([], |row| {
        let Some(title) = text_value(row.get_ref(0)?) else {
            return Ok(None);
        };
        Ok(Some(Book {
            title,
            authors: text_value(row.get_ref(1)?),
            total_read_time: seconds_value(row.get_ref(2)?),
        }))
    })?;

    let mut books = Vec::new();
    let mut untitled = 0usize;
    for row in rows {
        match row? {
            Some(book) => books.push(book),
            None => untitled += 1,
        }
    }
    if untitled > 0 {
        tracing::debug!(skipped = untitled, "skipped book rows without a title");
    }
    Ok(books)
}

fn load_events(conn: &Connection) -> rusqlite::Result<Vec<PageStatEvent>> {
    let mut stmt = conn.prepare("SELECT start_time, duration FROM page_stat_data")?;
    let rows = stmt.query_map([], |row| {
        Ok(PageStatEvent {
            start_time: timestamp_value(row.get_ref(0)?),
            duration: seconds_value(row.get_ref(1)?),
        })
    })?;
    rows.collect()
}

/// Load one relation; any failure is recorded and the relation comes back empty
fn load_relation<T>(
    conn: &Connection,
    tables: &[String],
    spec: RelationSpec,
    issues: &mut Vec<AppError>,
    load: fn(&Connection) -> rusqlite::Result<Vec<T>>,
) -> Vec<T> {
    let result = check_relation(conn, tables, spec)
        .and_then(|()| load(conn).map_err(AppError::from));
    match result {
        Ok(rows) => {
            tracing::debug!(relation = spec.name, rows = rows.len(), "loaded relation");
            rows
        }
        Err(e) => {
            tracing::warn!(relation = spec.name, "{e}; dependent views will be empty");
            issues.push(e);
            Vec::new()
        }
    }
}

impl Engine {
    /// Open a statistics file read-only and decode both relations
    pub(crate) fn load(&self, path: &Path) -> Result<LoadResult, AppError> {
        let start = Instant::now();
        check_header(path)?;

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|e| invalid_file(path, e))?;

        let tables = list_tables(&conn).map_err(|e| invalid_file(path, e))?;
        tracing::debug!(?tables, "tables found");

        let mut issues = Vec::new();
        let books = load_relation(&conn, &tables, BOOK, &mut issues, load_books);
        let events = load_relation(&conn, &tables, PAGE_STAT_DATA, &mut issues, load_events);

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(
            path = %path.display(),
            books = books.len(),
            events = events.len(),
            "loaded statistics file ({elapsed_ms:.2}ms)"
        );

        Ok(LoadResult {
            relations: Relations { books, events },
            tables,
            issues,
            elapsed_ms,
        })
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::core::{SortKey, book_table, daily_totals};
    use crate::utils::Timezone;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn write_db(dir: &TempDir, sql: &str) -> std::path::PathBuf {
        let path = dir.path().join("statistics.sqlite3");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(sql).unwrap();
        path
    }

    const SCHEMA: &str = "
        CREATE TABLE book (id INTEGER PRIMARY KEY, title TEXT, authors TEXT, total_read_time INTEGER);
        CREATE TABLE page_stat_data (id_book INTEGER, page INTEGER, start_time INTEGER, duration INTEGER);
    ";

    #[test]
    fn loads_both_relations_in_row_order() {
        let dir = TempDir::new().unwrap();
        let path = write_db(
            &dir,
            &format!(
                "{SCHEMA}
                INSERT INTO book (title, authors, total_read_time) VALUES ('A', 'X', 3600), ('B', NULL, 7200);
                INSERT INTO page_stat_data VALUES (1, 1, 1704067200, 1800), (2, 3, 1704153600, 3600);"
            ),
        );

        let engine = Engine::init().unwrap();
        let loaded = engine.load(&path).unwrap();
        assert!(loaded.issues.is_empty());
        assert_eq!(loaded.tables, vec!["book", "page_stat_data"]);
        assert_eq!(
            loaded.relations.books,
            vec![
                Book {
                    title: "A".to_string(),
                    authors: Some("X".to_string()),
                    total_read_time: 3600
                },
                Book {
                    title: "B".to_string(),
                    authors: None,
                    total_read_time: 7200
                },
            ]
        );
        assert_eq!(loaded.relations.events.len(), 2);
        assert_eq!(loaded.relations.events[0].start_time, 1_704_067_200);
    }

    #[test]
    fn coerces_loose_values() {
        let dir = TempDir::new().unwrap();
        let path = write_db(
            &dir,
            &format!(
                "{SCHEMA}
                INSERT INTO book (title, authors, total_read_time) VALUES (NULL, 'X', NULL), ('B', 'Y', -20), ('C', 'Z', '90');"
            ),
        );

        let loaded = Engine::init().unwrap().load(&path).unwrap();
        let books = &loaded.relations.books;
        // the NULL-title row is dropped
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "B");
        assert_eq!(books[0].total_read_time, 0);
        assert_eq!(books[1].total_read_time, 90);
    }

    #[test]
    fn untitled_rows_do_not_merge_with_real_titles() {
        let dir = TempDir::new().unwrap();
        let path = write_db(
            &dir,
            &format!(
                "{SCHEMA}
                INSERT INTO book (title, authors, total_read_time) VALUES
                    ('unknown', 'Real Author', 600),
                    (NULL, 'Other', 1200);"
            ),
        );

        let loaded = Engine::init().unwrap().load(&path).unwrap();
        let rows = book_table(&loaded.relations.books, 0, SortKey::Title, true);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "unknown");
        assert_eq!(rows[0].authors.as_deref(), Some("Real Author"));
        assert_eq!(rows[0].total_read_time, 600);
        assert!(loaded.issues.is_empty());
    }

    #[test]
    fn pre_epoch_start_times_keep_their_day() {
        let dir = TempDir::new().unwrap();
        let path = write_db(
            &dir,
            &format!(
                "{SCHEMA}
                INSERT INTO page_stat_data (id_book, page, start_time, duration) VALUES (1, 1, -86400, 3600);"
            ),
        );

        let loaded = Engine::init().unwrap().load(&path).unwrap();
        let events = &loaded.relations.events;
        assert_eq!(events[0].start_time, -86400);
        assert_eq!(events[0].duration, 3600);

        let daily = daily_totals(events, Timezone::Named(chrono_tz::UTC));
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].day, NaiveDate::from_ymd_opt(1969, 12, 31).unwrap());
        assert_eq!(daily[0].hours, 1.0);
    }

    #[test]
    fn missing_relation_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_db(
            &dir,
            "CREATE TABLE book (title TEXT, authors TEXT, total_read_time INTEGER);
             INSERT INTO book VALUES ('A', 'X', 60);",
        );

        let loaded = Engine::init().unwrap().load(&path).unwrap();
        assert_eq!(loaded.relations.books.len(), 1);
        assert!(loaded.relations.events.is_empty());
        assert_eq!(loaded.issues.len(), 1);
        assert!(matches!(
            loaded.issues[0],
            AppError::MissingRelation {
                name: "page_stat_data"
            }
        ));
    }

    #[test]
    fn missing_column_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_db(
            &dir,
            "CREATE TABLE book (title TEXT, total_read_time INTEGER);
             CREATE TABLE page_stat_data (start_time INTEGER, duration INTEGER);
             INSERT INTO page_stat_data VALUES (0, 5);",
        );

        let loaded = Engine::init().unwrap().load(&path).unwrap();
        assert!(loaded.relations.books.is_empty());
        assert_eq!(loaded.relations.events.len(), 1);
        assert!(matches!(
            loaded.issues[0],
            AppError::MissingColumn {
                relation: "book",
                column: "authors"
            }
        ));
    }

    #[test]
    fn rejects_non_sqlite_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "title,authors\nA,X\n").unwrap();

        let err = Engine::init().unwrap().load(&path).unwrap_err();
        assert!(matches!(err, AppError::InvalidFile { .. }));
        assert!(err.to_string().contains("not a SQLite database"));
    }

    #[test]
    fn rejects_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Engine::init()
            .unwrap()
            .load(&dir.path().join("absent.sqlite3"))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFile { .. }));
    }

    #[test]
    fn timestamp_value_keeps_sign() {
        assert_eq!(timestamp_value(ValueRef::Integer(-86400)), -86400);
        assert_eq!(timestamp_value(ValueRef::Text(b"-3600")), -3600);
        assert_eq!(timestamp_value(ValueRef::Null), 0);
    }

    #[test]
    fn seconds_value_clamps_and_parses() {
        assert_eq!(seconds_value(ValueRef::Integer(-5)), 0);
        assert_eq!(seconds_value(ValueRef::Real(12.9)), 12);
        assert_eq!(seconds_value(ValueRef::Text(b" 30 ")), 30);
        assert_eq!(seconds_value(ValueRef::Text(b"abc")), 0);
        assert_eq!(seconds_value(ValueRef::Null), 0);
    }
}
