use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub scale: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub value: i64,
}

/// Admin question input before sanitization. Fields are kept loose on
/// purpose: a missing or non-numeric id falls back to the question's
/// position, a missing or non-numeric scale falls back to the default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionDraft {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub scale: Option<serde_json::Value>,
}

/// Public projection of a user row.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

/// Full user row as stored. Only the storage gateway and the auth service
/// ever see the password hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Caller identity resolved from a session token. Never carries the
/// password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&UserRecord> for Session {
    fn from(u: &UserRecord) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            is_admin: u.is_admin,
        }
    }
}

/// A stored result joined with the submitting user, for reporting.
/// `answers` is `None` when the stored JSON does not parse.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub answers: Option<Vec<Answer>>,
    pub score: i64,
    pub created_at: String,
}
