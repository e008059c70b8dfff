//! SQLite persistence for hytrack.
//!
//! Completed sessions are plain appends into a single table; nothing in the
//! daemon updates or deletes rows once written.

use rusqlite::{params, Connection, OpenFlags};
use std::path::PathBuf;

use crate::recorder::{SessionRecord, SessionStore};

pub struct Db {
    path: PathBuf,
}

impl Db {
    pub fn new(path: PathBuf) -> Result<Self, String> {
        let db = Self { path };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<(), String> {
        self.with_connection(|conn| {
            conn.execute_batch(
                "BEGIN;
                 CREATE TABLE IF NOT EXISTS sessions (
                    subject_id       TEXT NOT NULL,
                    login_at         TEXT,
                    logout_at        TEXT NOT NULL,
                    duration_seconds INTEGER,
                    unknown_start    INTEGER NOT NULL DEFAULT 0,
                    recorded_at      TEXT NOT NULL
                 );
                 CREATE INDEX IF NOT EXISTS idx_sessions_subject_logout
                    ON sessions (subject_id, logout_at DESC);
                 COMMIT;",
            )
            .map_err(|err| format!("Failed to initialize schema: {}", err))?;
            Ok(())
        })
    }

    fn with_connection<T>(
        &self,
        op: impl FnOnce(&mut Connection) -> Result<T, String>,
    ) -> Result<T, String> {
        let mut conn = self.open()?;
        op(&mut conn)
    }

    fn open(&self) -> Result<Connection, String> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("Failed to create session data dir: {}", err))?;
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

        let conn = Connection::open_with_flags(&self.path, flags)
            .map_err(|err| format!("Failed to open sqlite db: {}", err))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|err| format!("Failed to enable WAL: {}", err))?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|err| format!("Failed to set synchronous: {}", err))?;
        conn.pragma_update(None, "busy_timeout", 5000)
            .map_err(|err| format!("Failed to set busy_timeout: {}", err))?;

        Ok(conn)
    }
}

impl SessionStore for Db {
    fn record(&self, record: &SessionRecord) -> Result<(), String> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO sessions \
                    (subject_id, login_at, logout_at, duration_seconds, unknown_start, recorded_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.subject_id,
                    record.login_at.map(|value| value.to_rfc3339()),
                    record.logout_at.to_rfc3339(),
                    record.duration_seconds,
                    record.unknown_start,
                    record.recorded_at.to_rfc3339()
                ],
            )
            .map_err(|err| format!("Failed to insert session record: {}", err))?;
            Ok(())
        })
    }
}
