//! Parcel table installation.
//!
//! The tracker owns exactly one table, so there is no migration chain: the
//! schema script is idempotent and the installed version is mirrored to
//! `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Installs the parcel schema when missing.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `DbError::Sqlite` when the schema script fails.
pub fn install_schema(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    if current_version == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{current_user_version, install_schema, SCHEMA_VERSION};
    use rusqlite::Connection;

    #[test]
    fn install_schema_sets_user_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), 0);

        install_schema(&mut conn).unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn install_schema_twice_keeps_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        install_schema(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO parcel (client, status, address, created_at)
             VALUES (1, 'registered', 'a', '2024-01-01T00:00:00Z');",
            [],
        )
        .unwrap();

        install_schema(&mut conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM parcel;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
