//! SQLite persistence for list items, queued emails and the tool invocation log.
//!
//! The agent loop never touches these tables directly. List items and emails
//! are mutated only by their tools; invocation records are appended only by
//! the [`ToolExecutor`](crate::agent::ToolExecutor). Every write is its own
//! unit of durability: nothing is rolled back when a later step of a turn fails.

mod query;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use serde::Serialize;
use thiserror::Error;

pub use query::{LogQuery, MAX_DAYS, PAGE_SIZES};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    Poisoned,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS list_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    item TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS emails (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recipient TEXT NOT NULL,
    subject TEXT NOT NULL,
    content TEXT NOT NULL,
    status TEXT DEFAULT 'pending',
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS tool_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tool_name TEXT NOT NULL,
    input_params TEXT,
    output_result TEXT,
    execution_time FLOAT,
    timestamp TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
"#;

/// Status assigned to every newly queued email.
pub const EMAIL_STATUS_PENDING: &str = "pending";

/// A persisted list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub id: i64,
    pub item: String,
    pub created_at: String,
}

/// An email waiting to be sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueuedEmail {
    pub id: i64,
    pub recipient: String,
    pub subject: String,
    pub content: String,
    pub status: String,
    pub created_at: String,
}

/// Audit entry for one tool execution, as written by the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvocation {
    pub tool_name: String,
    /// Stringified tool arguments
    pub input_params: String,
    /// Stringified result, or `ERROR: <message>` on failure
    pub output_result: String,
    /// Wall-clock execution time in seconds
    pub execution_time: f64,
    /// UTC timestamp (`%Y-%m-%d %H:%M:%S`) captured when the call started
    pub timestamp: String,
}

/// A stored invocation record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInvocationRecord {
    pub id: i64,
    pub tool_name: String,
    pub input_params: String,
    pub output_result: String,
    pub execution_time: f64,
    pub timestamp: String,
}

/// Handle to the application database.
///
/// Shared between tools and the executor behind an `Arc`. Access is
/// serialized by an internal mutex; callers never hold the lock across an
/// `.await`.
#[derive(Debug)]
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        tracing::info!("Opened database at {}", path.display());
        Self::init(conn)
    }

    /// Open a private in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    // ─────────────────────────────────────────────────────────────────────
    // List items
    // ─────────────────────────────────────────────────────────────────────

    /// Append an item and return the full list in insertion order.
    pub fn add_list_item(&self, item: &str) -> Result<Vec<String>, StoreError> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO list_items (item) VALUES (?1)", params![item])?;
        Self::item_names(&conn)
    }

    /// All item texts in insertion order.
    pub fn list_item_names(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn()?;
        Self::item_names(&conn)
    }

    fn item_names(conn: &Connection) -> Result<Vec<String>, StoreError> {
        let mut stmt = conn.prepare("SELECT item FROM list_items ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Full list rows, newest first.
    pub fn list_items(&self) -> Result<Vec<ListItem>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, item, created_at FROM list_items ORDER BY created_at DESC, id DESC",
        )?;
        let items = stmt
            .query_map([], |row| {
                Ok(ListItem {
                    id: row.get(0)?,
                    item: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Emails
    // ─────────────────────────────────────────────────────────────────────

    /// Queue an email with `pending` status. Returns the new row id.
    pub fn queue_email(
        &self,
        recipient: &str,
        subject: &str,
        content: &str,
    ) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO emails (recipient, subject, content) VALUES (?1, ?2, ?3)",
            params![recipient, subject, content],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All queued emails, newest first.
    pub fn emails(&self) -> Result<Vec<QueuedEmail>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, recipient, subject, content, status, created_at
             FROM emails ORDER BY created_at DESC, id DESC",
        )?;
        let emails = stmt
            .query_map([], |row| {
                Ok(QueuedEmail {
                    id: row.get(0)?,
                    recipient: row.get(1)?,
                    subject: row.get(2)?,
                    content: row.get(3)?,
                    status: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(emails)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Invocation log
    // ─────────────────────────────────────────────────────────────────────

    /// Append one invocation record. Returns the new row id.
    pub fn record_invocation(&self, record: &NewInvocation) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO tool_logs
                (tool_name, input_params, output_result, execution_time, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.tool_name,
                record.input_params,
                record.output_result,
                record.execution_time,
                record.timestamp,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Query the invocation log, newest first.
    pub fn invocations(&self, query: &LogQuery) -> Result<Vec<ToolInvocationRecord>, StoreError> {
        query.validate()?;
        let offset = query.offset()?;

        let mut sql = String::from(
            "SELECT id, tool_name, input_params, output_result, execution_time, timestamp
             FROM tool_logs
             WHERE timestamp >= datetime('now', ?1)",
        );
        let mut args: Vec<String> = vec![format!("-{} days", query.days)];

        if let Some(filter) = query.tool_filter.as_deref().filter(|f| !f.is_empty()) {
            sql.push_str(" AND tool_name LIKE ?2");
            args.push(format!("%{}%", filter));
        }

        sql.push_str(&format!(
            " ORDER BY timestamp DESC, id DESC LIMIT {} OFFSET {}",
            query.per_page, offset
        ));

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(rusqlite::params_from_iter(args.iter()), |row| {
                Ok(ToolInvocationRecord {
                    id: row.get(0)?,
                    tool_name: row.get(1)?,
                    input_params: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    output_result: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    execution_time: row.get::<_, Option<f64>>(4)?.unwrap_or_default(),
                    timestamp: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Number of invocation records, regardless of age. Mainly for tests and diagnostics.
    pub fn invocation_count(&self) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM tool_logs", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Current UTC time in SQLite's `CURRENT_TIMESTAMP` format.
pub fn now_string() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tool_name: &str, timestamp: String) -> NewInvocation {
        NewInvocation {
            tool_name: tool_name.to_string(),
            input_params: "{}".to_string(),
            output_result: "ok".to_string(),
            execution_time: 0.01,
            timestamp,
        }
    }

    #[test]
    fn add_list_item_returns_items_in_insertion_order() {
        let store = Store::open_in_memory().expect("open store");
        store.add_list_item("milk").expect("add milk");
        let items = store.add_list_item("eggs").expect("add eggs");
        assert_eq!(items, vec!["milk", "eggs"]);
        assert_eq!(
            store.list_item_names().expect("names"),
            vec!["milk", "eggs"]
        );
    }

    #[test]
    fn list_items_view_is_newest_first_with_ids() {
        let store = Store::open_in_memory().expect("open store");
        store.add_list_item("first").expect("add");
        store.add_list_item("second").expect("add");

        let rows = store.list_items().expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item, "second");
        assert_eq!(rows[1].item, "first");
        assert!(rows[0].id > rows[1].id);
        assert!(!rows[0].created_at.is_empty());
    }

    #[test]
    fn queued_email_defaults_to_pending() {
        let store = Store::open_in_memory().expect("open store");
        let id = store.queue_email("a@b.com", "Hi", "body").expect("queue");

        let emails = store.emails().expect("emails");
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].id, id);
        assert_eq!(emails[0].recipient, "a@b.com");
        assert_eq!(emails[0].status, EMAIL_STATUS_PENDING);
    }

    #[test]
    fn invocation_log_filters_by_name_substring() {
        let store = Store::open_in_memory().expect("open store");
        store.record_invocation(&record("get_weather", now_string())).expect("log");
        store.record_invocation(&record("add_list_item", now_string())).expect("log");
        store.record_invocation(&record("get_list_items", now_string())).expect("log");

        let query = LogQuery {
            tool_filter: Some("list".to_string()),
            ..LogQuery::default()
        };
        let records = store.invocations(&query).expect("query");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.tool_name.contains("list")));
        // Same timestamp: newest id first
        assert_eq!(records[0].tool_name, "get_list_items");
    }

    #[test]
    fn invocation_log_excludes_records_older_than_day_range() {
        let store = Store::open_in_memory().expect("open store");
        let old = (chrono::Utc::now() - chrono::Duration::days(10))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        store.record_invocation(&record("get_weather", old)).expect("log");
        store.record_invocation(&record("get_weather", now_string())).expect("log");

        let week = store.invocations(&LogQuery::default()).expect("query");
        assert_eq!(week.len(), 1);

        let month = LogQuery {
            days: 30,
            ..LogQuery::default()
        };
        assert_eq!(store.invocations(&month).expect("query").len(), 2);
        assert_eq!(store.invocation_count().expect("count"), 2);
    }

    #[test]
    fn invocation_log_paginates() {
        let store = Store::open_in_memory().expect("open store");
        for _ in 0..12 {
            store.record_invocation(&record("get_weather", now_string())).expect("log");
        }

        let first = LogQuery {
            per_page: 10,
            page: 1,
            ..LogQuery::default()
        };
        let second = LogQuery { page: 2, ..first.clone() };
        assert_eq!(store.invocations(&first).expect("page 1").len(), 10);
        assert_eq!(store.invocations(&second).expect("page 2").len(), 2);
    }

    #[test]
    fn invalid_log_query_is_rejected() {
        let store = Store::open_in_memory().expect("open store");
        let query = LogQuery {
            per_page: 7,
            ..LogQuery::default()
        };
        assert!(matches!(
            store.invocations(&query),
            Err(StoreError::InvalidQuery(_))
        ));
    }

    #[test]
    fn out_of_range_page_is_rejected() {
        let store = Store::open_in_memory().expect("open store");
        store
            .record_invocation(&record("get_weather", now_string()))
            .expect("record");
        let query = LogQuery {
            per_page: 10,
            page: usize::MAX,
            ..LogQuery::default()
        };
        assert!(matches!(
            store.invocations(&query),
            Err(StoreError::InvalidQuery(_))
        ));
    }

    #[test]
    fn records_survive_reopening_the_database() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app.db");

        {
            let store = Store::open(&path).expect("open store");
            store.record_invocation(&record("get_weather", now_string())).expect("log");
            store.add_list_item("milk").expect("add");
        }

        let reopened = Store::open(&path).expect("reopen store");
        assert_eq!(reopened.invocation_count().expect("count"), 1);
        assert_eq!(reopened.list_item_names().expect("names"), vec!["milk"]);
    }
}
