// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Where request handlers get a database connection from.
//!
//! Diesel calls block, so every unit of work runs on tokio's blocking pool.
//! A file database hands each request its own connection; `SQLite`'s
//! immediate transactions then serialize writers per employee while readers
//! proceed under WAL. An in-memory database has a single connection that
//! requests take turns on.

use skillbridge_api::ApiError;
use skillbridge_persistence::Persistence;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::error;

/// Connection source shared by all handlers.
#[derive(Clone)]
pub enum Storage {
    /// One in-memory database behind a single connection.
    Memory(Arc<Mutex<Persistence>>),
    /// A migrated database file; each unit of work connects separately.
    File(Arc<PathBuf>),
}

impl Storage {
    /// Shares an in-memory database.
    #[must_use]
    pub fn memory(persistence: Persistence) -> Self {
        Self::Memory(Arc::new(Mutex::new(persistence)))
    }

    /// Serves a database file that [`Persistence::new_with_file`] has
    /// already initialized.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(Arc::new(path.into()))
    }

    /// Runs `work` against a connection on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns whatever `work` returns, or `ApiError::Internal` if no
    /// connection could be obtained.
    pub async fn run<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Persistence) -> Result<T, ApiError> + Send + 'static,
    {
        let storage: Self = self.clone();
        tokio::task::spawn_blocking(move || storage.run_blocking(work))
            .await
            .map_err(|e| {
                error!(error = %e, "Storage task did not complete");
                ApiError::Internal {
                    message: format!("storage task failed: {e}"),
                }
            })?
    }

    fn run_blocking<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Persistence) -> Result<T, ApiError>,
    {
        match self {
            Self::Memory(shared) => {
                let mut persistence = shared.lock().map_err(|_| ApiError::Internal {
                    message: String::from("in-memory database lock poisoned"),
                })?;
                work(&mut persistence)
            }
            Self::File(path) => {
                let mut persistence: Persistence =
                    Persistence::connect_file(path.as_path()).map_err(|e| {
                        error!(error = %e, path = %path.display(), "Cannot connect to database");
                        ApiError::Internal {
                            message: e.to_string(),
                        }
                    })?;
                work(&mut persistence)
            }
        }
    }
}
