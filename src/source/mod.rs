//! Statistics file source
//!
//! Opens the e-reader's SQLite statistics database and decodes its two
//! relations into an immutable in-memory snapshot.

mod loader;
mod schema;

use rusqlite::Connection;

pub(crate) use loader::LoadResult;

use crate::error::AppError;

/// Initialized query engine
///
/// A file can only be loaded through an `Engine`, so nothing reaches the
/// loader before the SQLite library has been probed.
#[derive(Debug)]
pub(crate) struct Engine {
    version: String,
}

impl Engine {
    pub(crate) fn init() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()?;
        let version: String = conn.query_row("SELECT sqlite_version()", [], |row| row.get(0))?;
        tracing::debug!(%version, "SQLite engine ready");
        Ok(Engine { version })
    }

    pub(crate) fn version(&self) -> &str {
        &self.version
    }
}
