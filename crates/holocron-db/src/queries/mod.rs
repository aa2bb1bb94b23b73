//! Database query modules.
//!
//! Every operation takes the storage context (`&rusqlite::Connection`)
//! explicitly:
//! - users: account CRUD
//! - favorites: favorites and the per-user back-reference
//! - characters: characters and the per-species back-reference
//! - planets, vehicles, species: catalog CRUD

pub mod characters;
pub mod favorites;
pub mod planets;
pub mod species;
pub mod users;
pub mod vehicles;

use holocron_core::Error;
use rusqlite::ffi;

/// Translate a failed write into the catalog error taxonomy.
///
/// Unique violations become `ConstraintViolation` (SQLite reports them as
/// `UNIQUE constraint failed: table.column`), foreign key violations become
/// `Reference`, and NOT NULL violations become `Validation`.
pub(crate) fn map_write_error(entity: &str, e: rusqlite::Error) -> Error {
    if let rusqlite::Error::SqliteFailure(ref failure, ref message) = e {
        let message = message.as_deref().unwrap_or_default();
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                let column = message.rsplit(": ").next().unwrap_or(message);
                let (table, field) = column.split_once('.').unwrap_or((entity, column));
                return Error::constraint(table, field);
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return Error::reference(format!(
                    "{entity} references a record that does not exist"
                ));
            }
            ffi::SQLITE_CONSTRAINT_NOTNULL => {
                let column = message.rsplit(": ").next().unwrap_or(message);
                return Error::validation(format!("{column} is required"));
            }
            _ => {}
        }
    }
    Error::database(e.to_string())
}

/// Convert a JSON-encodable column value, mapping failures to `Internal`.
pub(crate) fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> holocron_core::Result<String> {
    Ok(serde_json::to_string(value)?)
}
