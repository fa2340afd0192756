pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("No such table: {table}")]
    SchemaMissing { table: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },
}

/// Classify raw sqlite failures once, at the storage boundary.
///
/// A write against a table that does not exist surfaces as `SchemaMissing`,
/// so callers branch on the variant rather than inspecting error strings.
impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(_, Some(msg)) = &err {
            if let Some(table) = msg.strip_prefix("no such table: ") {
                return DatabaseError::SchemaMissing {
                    table: table.to_string(),
                };
            }
        }
        DatabaseError::Sqlite(err)
    }
}
