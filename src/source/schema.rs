use rusqlite::Connection;

use crate::error::AppError;

/// A relation the viewer reads, with the columns it needs
#[derive(Debug, Clone, Copy)]
pub(super) struct RelationSpec {
    pub(super) name: &'static str,
    pub(super) columns: &'static [&'static str],
}

pub(super) const BOOK: RelationSpec = RelationSpec {
    name: "book",
    columns: &["title", "authors", "total_read_time"],
};

pub(super) const PAGE_STAT_DATA: RelationSpec = RelationSpec {
    name: "page_stat_data",
    columns: &["start_time", "duration"],
};

/// Names of all tables in the database
pub(super) fn list_tables(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}

fn list_columns(conn: &Connection, relation: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let rows = stmt.query_map([relation], |row| row.get::<_, String>(0))?;
    rows.collect()
}

/// Check a relation exists and carries every column the viewer reads
pub(super) fn check_relation(
    conn: &Connection,
    tables: &[String],
    spec: RelationSpec,
) -> Result<(), AppError> {
    if !tables.iter().any(|t| t.eq_ignore_ascii_case(spec.name)) {
        return Err(AppError::MissingRelation { name: spec.name });
    }

    let columns = list_columns(conn, spec.name)?;
    for &column in spec.columns {
        if !columns.iter().any(|c| c.eq_ignore_ascii_case(column)) {
            return Err(AppError::MissingColumn {
                relation: spec.name,
                column,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn_with(sql: &str) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(sql).unwrap();
        conn
    }

    #[test]
    fn lists_tables_sorted() {
        let conn = conn_with("CREATE TABLE page_stat_data (x); CREATE TABLE book (y);");
        assert_eq!(list_tables(&conn).unwrap(), vec!["book", "page_stat_data"]);
    }

    #[test]
    fn accepts_complete_relation() {
        let conn = conn_with(
            "CREATE TABLE book (id INTEGER, title TEXT, authors TEXT, total_read_time INTEGER);",
        );
        let tables = list_tables(&conn).unwrap();
        assert!(check_relation(&conn, &tables, BOOK).is_ok());
    }

    #[test]
    fn reports_missing_relation() {
        let conn = conn_with("CREATE TABLE book (title, authors, total_read_time);");
        let tables = list_tables(&conn).unwrap();
        let err = check_relation(&conn, &tables, PAGE_STAT_DATA).unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingRelation {
                name: "page_stat_data"
            }
        ));
    }

    #[test]
    fn reports_missing_column() {
        let conn = conn_with("CREATE TABLE page_stat_data (id_book, start_time);");
        let tables = list_tables(&conn).unwrap();
        let err = check_relation(&conn, &tables, PAGE_STAT_DATA).unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingColumn {
                relation: "page_stat_data",
                column: "duration"
            }
        ));
    }
}
