use crate::model::{Answer, Question, ResultView, User, UserRecord};
use crate::storage::schema;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Storage gateway. Owns every read and write against the SQLite file;
/// all JSON columns are (de)serialized here so the rest of the system only
/// sees typed values. Each call is a single auto-committing statement.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Creates tables and indexes if absent and seeds the default question
    /// set when the singleton table is empty. Safe to call on every start.
    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(schema::DDL)?;

        let existing: i64 = conn.query_row("SELECT COUNT(*) FROM questions", [], |r| r.get(0))?;
        if existing == 0 {
            let payload = serde_json::to_string(&schema::default_questions())?;
            conn.execute(
                "INSERT INTO questions(id, payload) VALUES(1, ?1)",
                params![payload],
            )?;
        }
        Ok(())
    }

    pub fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, is_admin FROM users WHERE email = ?1",
        )?;
        let mut rows = stmt.query(params![email])?;
        if let Some(row) = rows.next()? {
            Ok(Some(UserRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
                is_admin: row.get(4)?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Inserts a user and returns its public projection. A duplicate email
    /// surfaces as a UNIQUE violation; callers can classify it with
    /// [`is_unique_violation`].
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> anyhow::Result<User> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users(name, email, password_hash, is_admin) VALUES(?1, ?2, ?3, ?4)",
            params![name, email, password_hash, is_admin],
        )?;
        let id = conn.last_insert_rowid();
        let user = conn.query_row(
            "SELECT id, name, email, is_admin FROM users WHERE id = ?1",
            params![id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    is_admin: row.get(3)?,
                })
            },
        )?;
        Ok(user)
    }

    /// Unconditional flag update; an absent id is a no-op, not an error.
    pub fn set_admin(&self, user_id: i64, is_admin: bool) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE users SET is_admin = ?1 WHERE id = ?2",
            params![is_admin, user_id],
        )?;
        Ok(())
    }

    /// Appends a result row. Existence of `user_id` is the caller's
    /// concern; the declared relationship is best-effort here.
    pub fn save_result(&self, user_id: i64, answers: &[Answer], score: i64) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO results(user_id, answers, score) VALUES(?1, ?2, ?3)",
            params![user_id, serde_json::to_string(answers)?, score],
        )?;
        Ok(())
    }

    /// Results joined with their submitter, newest first, optionally
    /// bounded inclusively on `created_at`. A row whose stored answers do
    /// not parse comes back with `answers: None` rather than failing the
    /// whole listing.
    pub fn list_results(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> anyhow::Result<Vec<ResultView>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT r.id, r.user_id, u.name, u.email, r.answers, r.score, r.created_at
             FROM results r JOIN users u ON u.id = r.user_id
             WHERE (?1 IS NULL OR datetime(r.created_at) >= datetime(?1))
               AND (?2 IS NULL OR datetime(r.created_at) <= datetime(?2))
             ORDER BY datetime(r.created_at) DESC, r.id DESC",
        )?;

        let rows = stmt.query_map(
            params![from.map(sqlite_timestamp), to.map(sqlite_timestamp)],
            |row| {
                let raw_answers: String = row.get(4)?;
                Ok(ResultView {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    name: row.get(2)?,
                    email: row.get(3)?,
                    answers: parse_answers(&raw_answers),
                    score: row.get(5)?,
                    created_at: row.get(6)?,
                })
            },
        )?;

        let mut results = Vec::new();
        for r in rows {
            results.push(r?);
        }
        Ok(results)
    }

    /// The active question set. Empty when the singleton row is missing or
    /// its payload does not parse; after `init_schema` neither should
    /// happen.
    pub fn get_questions(&self) -> anyhow::Result<Vec<Question>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT payload FROM questions WHERE id = 1")?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            let payload: String = row.get(0)?;
            match serde_json::from_str(&payload) {
                Ok(questions) => Ok(questions),
                Err(e) => {
                    tracing::warn!(error = %e, "question payload does not parse, treating as empty");
                    Ok(Vec::new())
                }
            }
        } else {
            Ok(Vec::new())
        }
    }

    /// Full overwrite of the singleton question set; bumps `updated_at`.
    /// Last writer wins on concurrent edits.
    pub fn set_questions(&self, questions: &[Question]) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO questions(id, payload, updated_at) VALUES(1, ?1, datetime('now'))
             ON CONFLICT(id) DO UPDATE SET payload=excluded.payload, updated_at=excluded.updated_at",
            params![serde_json::to_string(questions)?],
        )?;
        Ok(())
    }
}

/// True when the error chain bottoms out in a SQLite UNIQUE/constraint
/// failure, which for this schema can only be the users.email index.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn sqlite_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn parse_answers(raw: &str) -> Option<Vec<Answer>> {
    match serde_json::from_str(raw) {
        Ok(answers) => Some(answers),
        Err(e) => {
            tracing::warn!(error = %e, "stored answers do not parse");
            None
        }
    }
}
