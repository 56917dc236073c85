// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup.
//!
//! Every connection enforces foreign keys and waits on competing writers.
//! File databases additionally run in WAL mode so readers never block the
//! single allocation writer.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Schema migrations, embedded at compile time.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a writer waits for another connection's transaction to finish.
pub const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Where a database lives, which decides the journal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// A shared-cache in-memory database, one per adapter.
    Memory,
    /// A database file on disk shared by every process that opens it.
    File,
}

impl StorageKind {
    fn pragmas(self) -> Vec<String> {
        let mut pragmas: Vec<String> = vec![
            String::from("PRAGMA foreign_keys = ON"),
            format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"),
        ];
        if self == Self::File {
            pragmas.push(String::from("PRAGMA journal_mode = WAL"));
        }
        pragmas
    }
}

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Opens a connection, applies the connection pragmas and migrates the
/// schema to the latest version.
///
/// # Errors
///
/// Returns an error if the connection, a pragma or a migration fails, or if
/// foreign keys are still unenforced afterwards.
pub fn open(database_url: &str, kind: StorageKind) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, ?kind, "Opening allocation database");

    let mut conn: SqliteConnection = connect(database_url, kind)?;

    let applied: usize = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::Migration(e.to_string()))?
        .len();
    debug!(applied, "Schema migrations applied");

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}

/// Opens a connection to a database whose schema is already current.
///
/// Only the connection pragmas are applied; migrations are left to
/// [`open`].
///
/// # Errors
///
/// Returns an error if the connection or a pragma fails, or if foreign keys
/// are unenforced.
pub fn connect(database_url: &str, kind: StorageKind) -> Result<SqliteConnection, PersistenceError> {
    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::Connection(e.to_string()))?;

    for pragma in kind.pragmas() {
        diesel::sql_query(pragma.as_str())
            .execute(&mut conn)
            .map_err(|e| PersistenceError::Pragma(format!("{pragma}: {e}")))?;
    }

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}

/// Returns the row ID of the last insert on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Fails unless the connection enforces foreign keys.
///
/// Assignment and request rows reference employees and projects; without
/// enforcement a dangling reference would be accepted silently.
///
/// # Errors
///
/// Returns `ForeignKeysDisabled` if enforcement is off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let pragma: ForeignKeysPragma =
        diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;

    if pragma.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeysDisabled);
    }
    Ok(())
}
