// SQLite-backed dataset: finished records plus the queue of pages to scrape.

use crate::details::PageType;
use crate::error::{BoxError, Result};
use crate::model::OutputRecord;
use crate::traits::{EmitMeta, OutputSink, QueuedRequest, RequestQueue};
use async_trait::async_trait;
use rusqlite::{Connection, params};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct Dataset {
    conn: Mutex<Connection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub label: String,
    pub kind: String,
    pub payload: Value,
    pub created_at: i64,
}

fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

impl Dataset {
    pub fn drop(path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        let dataset = Dataset {
            conn: Mutex::new(conn),
        };
        dataset.init_schema()?;
        Ok(dataset)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means another thread panicked mid-statement;
        // SQLite itself is still consistent.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn init_schema(&self) -> Result<()> {
        self.conn().execute_batch(
            "
CREATE TABLE IF NOT EXISTS records (
    id TEXT PRIMARY KEY,
    label TEXT NOT NULL,
    kind TEXT NOT NULL CHECK(kind IN ('post', 'profile', 'place', 'hashtag')),
    request_id TEXT NOT NULL,
    url TEXT NOT NULL,
    payload TEXT NOT NULL,     -- JSON
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT UNIQUE NOT NULL,
    page_type TEXT NOT NULL CHECK(page_type IN ('PLACE', 'PROFILE', 'HASHTAG', 'POST')),
    status TEXT NOT NULL DEFAULT 'pending' CHECK(status IN ('pending', 'handled')),
    created_at INTEGER NOT NULL,
    handled_at INTEGER
);

CREATE INDEX IF NOT EXISTS idx_records_kind ON records(kind);
CREATE INDEX IF NOT EXISTS idx_requests_status ON requests(status);
            ",
        )?;
        Ok(())
    }

    // Record operations
    pub fn insert_record(&self, label: &str, record: &OutputRecord) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let payload = serde_json::to_string(record)?;
        let debug = record.debug();

        self.conn().execute(
            "INSERT INTO records (id, label, kind, request_id, url, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &id,
                label,
                record.kind(),
                &debug.request_id,
                &debug.url,
                payload,
                current_timestamp(),
            ],
        )?;

        Ok(id)
    }

    pub fn records(&self, kind: Option<&str>) -> Result<Vec<StoredRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, label, kind, payload, created_at FROM records
             WHERE ?1 IS NULL OR kind = ?1
             ORDER BY created_at, rowid",
        )?;

        let rows = stmt.query_map(params![kind], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, label, kind, payload, created_at) = row?;
            records.push(StoredRecord {
                id,
                label,
                kind,
                payload: serde_json::from_str(&payload)?,
                created_at,
            });
        }
        Ok(records)
    }

    pub fn record_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // Request queue operations
    pub fn enqueue(&self, request: &QueuedRequest) -> Result<bool> {
        let inserted = self.conn().execute(
            "INSERT OR IGNORE INTO requests (url, page_type, created_at) VALUES (?1, ?2, ?3)",
            params![&request.url, request.page_type.as_str(), current_timestamp()],
        )?;
        Ok(inserted == 1)
    }

    pub fn pending_requests(&self) -> Result<Vec<QueuedRequest>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT url, page_type FROM requests WHERE status = 'pending' ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut requests = Vec::new();
        for row in rows {
            let (url, page_type) = row?;
            requests.push(QueuedRequest {
                url,
                page_type: page_type.parse::<PageType>()?,
            });
        }
        Ok(requests)
    }

    pub fn mark_handled(&self, url: &str) -> Result<bool> {
        let updated = self.conn().execute(
            "UPDATE requests SET status = 'handled', handled_at = ?1 WHERE url = ?2 AND status = 'pending'",
            params![current_timestamp(), url],
        )?;
        Ok(updated == 1)
    }
}

#[async_trait]
impl OutputSink for Dataset {
    async fn emit(&self, record: &OutputRecord, meta: &EmitMeta) -> std::result::Result<(), BoxError> {
        self.insert_record(&meta.label, record)?;
        Ok(())
    }
}

#[async_trait]
impl RequestQueue for Dataset {
    async fn add_request(&self, request: QueuedRequest) -> std::result::Result<bool, BoxError> {
        Ok(self.enqueue(&request)?)
    }
}
