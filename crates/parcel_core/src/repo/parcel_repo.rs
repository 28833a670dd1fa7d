//! Parcel repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Map `Parcel` values to and from rows of the `parcel` table.
//! - Enforce the `registered` guard for address changes and deletes.
//!
//! # Invariants
//! - Every statement is parameterized; caller values never reach SQL text.
//! - Guarded writes that match zero rows are silent no-ops.
//! - Any status text a write accepts is readable back unchanged.

use crate::db::DbError;
use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use log::debug;
use rusqlite::{ffi, params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARCEL_TABLE: &str = "parcel";
const PARCEL_COLUMNS: [&str; 5] = ["number", "client", "status", "address", "created_at"];

const PARCEL_SELECT_SQL: &str = "SELECT
    number,
    client,
    status,
    address,
    created_at
FROM parcel";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for parcel persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Single-row fetch matched no row.
    NotFound(ParcelNumber),
    /// Insert collided with an existing key.
    UniqueConstraintViolation(String),
    /// Any other storage failure, passed through unchanged.
    Storage(DbError),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(number) => write!(f, "parcel not found: {number}"),
            Self::UniqueConstraintViolation(message) => {
                write!(f, "unique constraint violation: {message}")
            }
            Self::Storage(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

/// Repository interface for parcel CRUD operations.
pub trait ParcelRepository {
    /// Inserts a parcel and returns its storage-assigned number.
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber>;
    /// Loads one parcel by number.
    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel>;
    /// Loads every parcel of a client, in no particular order.
    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>>;
    /// Overwrites status unconditionally.
    fn set_status(&self, number: ParcelNumber, status: &ParcelStatus) -> RepoResult<()>;
    /// Overwrites address only while the parcel is `registered`.
    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()>;
    /// Removes the parcel only while it is `registered`.
    fn delete(&self, number: ParcelNumber) -> RepoResult<()>;
}

/// SQLite-backed parcel repository borrowing a caller-owned connection.
pub struct SqliteParcelRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParcelRepository<'conn> {
    /// Creates a repository over any connection that carries the `parcel` table.
    ///
    /// The connection may come from `open_db` or from another program; only
    /// the table shape is checked.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_parcel_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ParcelRepository for SqliteParcelRepository<'_> {
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO parcel (
                number,
                client,
                status,
                address,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
        )?;

        stmt.execute(params![
            parcel.number,
            parcel.client,
            parcel.status.as_str(),
            parcel.address.as_str(),
            parcel.created_at.as_str(),
        ])
        .map_err(map_insert_error)?;

        let number = self.conn.last_insert_rowid();
        debug!("event=parcel_add module=repo status=ok number={number}");
        Ok(number)
    }

    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARCEL_SELECT_SQL} WHERE number = ?1;"))?;

        let mut rows = stmt.query([number])?;
        match rows.next()? {
            Some(row) => parse_parcel_row(row),
            None => Err(RepoError::NotFound(number)),
        }
    }

    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARCEL_SELECT_SQL} WHERE client = ?1;"))?;

        let mut rows = stmt.query([client])?;
        let mut parcels = Vec::new();
        while let Some(row) = rows.next()? {
            parcels.push(parse_parcel_row(row)?);
        }

        Ok(parcels)
    }

    fn set_status(&self, number: ParcelNumber, status: &ParcelStatus) -> RepoResult<()> {
        let mut stmt = self
            .conn
            .prepare("UPDATE parcel SET status = ?1 WHERE number = ?2;")?;

        let changed = stmt.execute(params![status.as_str(), number])?;
        debug!("event=parcel_set_status module=repo status=ok number={number} rows_affected={changed}");
        Ok(())
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        let mut stmt = self.conn.prepare(
            "UPDATE parcel
             SET address = ?1
             WHERE number = ?2
               AND status = ?3;",
        )?;

        let changed = stmt.execute(params![
            address,
            number,
            ParcelStatus::Registered.as_str()
        ])?;
        debug!("event=parcel_set_address module=repo status=ok number={number} rows_affected={changed}");
        Ok(())
    }

    fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        let mut stmt = self.conn.prepare(
            "DELETE FROM parcel
             WHERE number = ?1
               AND status = ?2;",
        )?;

        let changed = stmt.execute(params![number, ParcelStatus::Registered.as_str()])?;
        debug!("event=parcel_delete module=repo status=ok number={number} rows_affected={changed}");
        Ok(())
    }
}

fn map_insert_error(err: rusqlite::Error) -> RepoError {
    if let rusqlite::Error::SqliteFailure(code, message) = &err {
        if code.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            || code.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
        {
            return RepoError::UniqueConstraintViolation(
                message.clone().unwrap_or_else(|| code.to_string()),
            );
        }
    }
    RepoError::from(err)
}

fn parse_parcel_row(row: &Row<'_>) -> RepoResult<Parcel> {
    Ok(Parcel {
        number: Some(row.get("number")?),
        client: row.get("client")?,
        status: ParcelStatus::from(row.get::<_, String>("status")?),
        address: row.get("address")?,
        created_at: row.get("created_at")?,
    })
}

fn ensure_parcel_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, PARCEL_TABLE)? {
        return Err(RepoError::MissingRequiredTable(PARCEL_TABLE));
    }

    for column in PARCEL_COLUMNS {
        if !table_has_column(conn, PARCEL_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: PARCEL_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
