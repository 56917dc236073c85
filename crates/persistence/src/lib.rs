// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence for the allocation engine.
//!
//! [`Persistence`] owns one Diesel connection and implements the engine's
//! `UnitOfWork`. Each unit of work is one database transaction:
//!
//! - `serialized` opens an immediate (write-locking) transaction and bumps
//!   the employee's `allocation_version` before running the work, so two
//!   connections acting on the same employee queue behind each other.
//! - `atomically` opens an ordinary transaction for reads and catalog writes.
//!
//! Returning `Err` from the work rolls the transaction back.
//!
//! ## Testing
//!
//! - `new_in_memory()` gives every caller its own shared-cache database
//! - Concurrency tests use a temporary file with two connections

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

use diesel::{Connection, SqliteConnection};
use skillbridge::{CoreError, Stores, UnitOfWork};
use skillbridge_audit::AuditEvent;
use skillbridge_domain::{Employee, Project};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

pub use error::PersistenceError;

use backend::sqlite::StorageKind;
use store::{SqliteStore, TxError};

/// Suffix for shared-cache memory database names, so that every in-memory
/// adapter gets a private database.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter backed by a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Opens a private in-memory allocation store.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let url: String = format!("file:skillbridge_mem_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::sqlite::open(&url, StorageKind::Memory)?;
        Ok(Self { conn })
    }

    /// Opens or creates an allocation store backed by the file at `path`.
    ///
    /// Several adapters may open the same file; writers wait on each other
    /// for up to `BUSY_TIMEOUT_MS`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InvalidPath(path.as_ref().to_string_lossy().into_owned())
        })?;

        let conn: SqliteConnection = backend::sqlite::open(path_str, StorageKind::File)?;
        Ok(Self { conn })
    }

    /// Opens another connection to a file already initialized by
    /// [`Persistence::new_with_file`].
    ///
    /// The schema is not migrated, so this is cheap enough to call once per
    /// request.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or foreign keys are not
    /// enforced.
    pub fn connect_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InvalidPath(path.as_ref().to_string_lossy().into_owned())
        })?;

        let conn: SqliteConnection = backend::sqlite::connect(path_str, StorageKind::File)?;
        Ok(Self { conn })
    }

    /// Re-checks that the connection still enforces foreign keys.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ForeignKeysDisabled` if enforcement is off.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Directory seeding
    // ========================================================================

    /// Adds an employee to the directory and returns the assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the manager does not exist.
    pub fn create_employee(&mut self, employee: &Employee) -> Result<i64, PersistenceError> {
        mutations::directory::insert_employee(&mut self.conn, employee)
    }

    /// Adds a project to the catalog and returns the assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken.
    pub fn create_project(&mut self, project: &Project) -> Result<i64, PersistenceError> {
        mutations::directory::insert_project(&mut self.conn, project)
    }

    /// Looks up an employee by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_employee_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<Employee>, PersistenceError> {
        queries::directory::find_employee_by_email(&mut self.conn, email)
    }

    /// Returns how many serialized units of work have touched an employee.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the employee does not exist.
    pub fn allocation_version(&mut self, employee_id: i64) -> Result<i64, PersistenceError> {
        queries::directory::allocation_version(&mut self.conn, employee_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("employee {employee_id}")))
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    /// Lists audit events that are not scoped to an employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_global_audit_events(&mut self) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::list_global_events(&mut self.conn)
    }
}

impl UnitOfWork for Persistence {
    fn serialized<T, F>(&mut self, employee_id: i64, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn Stores) -> Result<T, CoreError>,
    {
        debug!(employee_id, "Opening serialized unit of work");
        self.conn
            .immediate_transaction::<T, TxError, _>(|conn| {
                mutations::directory::bump_allocation_version(conn, employee_id)?;
                let mut store: SqliteStore<'_> = SqliteStore { conn };
                Ok(work(&mut store)?)
            })
            .map_err(CoreError::from)
    }

    fn atomically<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn Stores) -> Result<T, CoreError>,
    {
        self.conn
            .transaction::<T, TxError, _>(|conn| {
                let mut store: SqliteStore<'_> = SqliteStore { conn };
                Ok(work(&mut store)?)
            })
            .map_err(CoreError::from)
    }
}
