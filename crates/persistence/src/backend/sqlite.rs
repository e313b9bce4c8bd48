// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` state store.
//!
//! One row per certificate holding its fingerprint and the record as JSON,
//! plus a single metadata row. A save replaces every row inside one
//! immediate transaction, which gives the same all-or-nothing guarantee as
//! the JSON file store's rename.

use crate::diesel_schema::{certificates, state_meta};
use crate::document::STATE_FORMAT_VERSION;
use crate::error::PersistenceError;
use crate::lock::StateLock;
use diesel::prelude::*;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use epc_sync::{PersistedState, RunSnapshot, StateStore, StoreError};
use epc_sync_domain::CertificateRecord;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

/// Embedded schema migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Counter for unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

type CertificateRow = (String, String, String);

/// Opens a connection and brings the schema up to date.
///
/// # Arguments
///
/// * `database_url` - The `SQLite` database URL (a file path or an
///   in-memory URL)
///
/// # Errors
///
/// Returns an error if connection or migration fails.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, "Initializing SQLite state database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Enables WAL mode for file-based databases.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // NOTE: PRAGMA is raw SQL, Diesel has no PRAGMA DSL
    diesel::sql_query("PRAGMA journal_mode = WAL").execute(conn)?;
    Ok(())
}

/// State store backed by a `SQLite` database.
pub struct SqliteStateStore {
    conn: SqliteConnection,
    location: String,
    // Declared last so the connection is closed before the lock is released.
    _lock: Option<StateLock>,
}

impl SqliteStateStore {
    /// Opens (or creates) the database file and takes the state lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is held, or the database cannot be
    /// opened or migrated.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path: &Path = path.as_ref();
        let location: String = path
            .to_str()
            .ok_or_else(|| {
                PersistenceError::InitializationError(String::from("Invalid database path"))
            })?
            .to_string();
        let lock: StateLock = StateLock::acquire(path)?;

        let mut conn: SqliteConnection = initialize_database(&location)?;
        enable_wal_mode(&mut conn)?;

        Ok(Self {
            conn,
            location,
            _lock: Some(lock),
        })
    }

    /// Creates a store over a fresh private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let location: String = format!("file:epc_state_{db_id}?mode=memory&cache=shared");
        let conn: SqliteConnection = initialize_database(&location)?;

        Ok(Self {
            conn,
            location,
            _lock: None,
        })
    }

    fn corrupt(&self, reason: impl Into<String>) -> PersistenceError {
        PersistenceError::Corrupt {
            path: self.location.clone(),
            reason: reason.into(),
        }
    }

    fn read(&mut self) -> Result<Option<PersistedState>, PersistenceError> {
        let meta: Option<(i32, i64)> = state_meta::table
            .select((state_meta::format_version, state_meta::record_count))
            .first::<(i32, i64)>(&mut self.conn)
            .optional()?;
        let Some((version, record_count)) = meta else {
            info!(location = %self.location, "No previous state found");
            return Ok(None);
        };
        if u32::try_from(version).ok() != Some(STATE_FORMAT_VERSION) {
            return Err(self.corrupt(format!("unsupported state version {version}")));
        }

        let rows: Vec<CertificateRow> = certificates::table
            .select((
                certificates::id,
                certificates::fingerprint,
                certificates::record,
            ))
            .order(certificates::id.asc())
            .load::<CertificateRow>(&mut self.conn)?;
        if i64::try_from(rows.len()).ok() != Some(record_count) {
            return Err(self.corrupt(format!(
                "expected {record_count} records, found {}",
                rows.len()
            )));
        }

        let mut records: Vec<CertificateRecord> = Vec::with_capacity(rows.len());
        for (id, fingerprint, json) in rows {
            let record: CertificateRecord = serde_json::from_str(&json)
                .map_err(|err| self.corrupt(format!("record '{id}': {err}")))?;
            if record.id().value() != id || record.fingerprint().as_str() != fingerprint {
                return Err(self.corrupt(format!("record '{id}' does not match its row")));
            }
            records.push(record);
        }

        let state: PersistedState =
            PersistedState::from_records(records).map_err(|err| self.corrupt(err.to_string()))?;
        debug!(location = %self.location, records = state.len(), "Read state database");
        Ok(Some(state))
    }

    fn write(&mut self, snapshot: &RunSnapshot) -> Result<(), PersistenceError> {
        let saved_at: String = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let version: i32 = i32::try_from(STATE_FORMAT_VERSION)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let rows: Vec<CertificateRow> = snapshot
            .records()
            .map(|record| {
                Ok((
                    record.id().value().to_string(),
                    record.fingerprint().as_str().to_string(),
                    serde_json::to_string(record)?,
                ))
            })
            .collect::<Result<Vec<CertificateRow>, serde_json::Error>>()?;
        let record_count: i64 = i64::try_from(rows.len())
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

        self.conn
            .immediate_transaction::<_, PersistenceError, _>(|conn| {
                diesel::delete(certificates::table).execute(conn)?;
                for (id, fingerprint, record) in &rows {
                    diesel::insert_into(certificates::table)
                        .values((
                            certificates::id.eq(id.as_str()),
                            certificates::fingerprint.eq(fingerprint.as_str()),
                            certificates::record.eq(record.as_str()),
                        ))
                        .execute(conn)?;
                }
                diesel::replace_into(state_meta::table)
                    .values((
                        state_meta::id.eq(1),
                        state_meta::format_version.eq(version),
                        state_meta::saved_at.eq(saved_at.as_str()),
                        state_meta::record_count.eq(record_count),
                    ))
                    .execute(conn)?;
                Ok(())
            })?;

        info!(location = %self.location, records = record_count, "Saved state");
        Ok(())
    }
}

impl StateStore for SqliteStateStore {
    fn load(&mut self) -> Result<Option<PersistedState>, StoreError> {
        self.read().map_err(StoreError::from)
    }

    fn save(&mut self, snapshot: &RunSnapshot) -> Result<(), StoreError> {
        self.write(snapshot).map_err(StoreError::from)
    }
}
