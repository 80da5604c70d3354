use crate::model::Question;

pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  email TEXT NOT NULL UNIQUE,
  password_hash TEXT NOT NULL,
  is_admin INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS results (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id INTEGER NOT NULL REFERENCES users(id),
  answers TEXT NOT NULL,
  score INTEGER NOT NULL,
  created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_results_user ON results(user_id);

CREATE TABLE IF NOT EXISTS questions (
  id INTEGER PRIMARY KEY CHECK (id = 1),
  payload TEXT NOT NULL,
  updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Seeded on first initialization when the questions table is empty.
pub fn default_questions() -> Vec<Question> {
    vec![
        Question {
            id: 1,
            text: "I often recommend this service to people around me".to_string(),
            scale: 5,
        },
        Question {
            id: 2,
            text: "I am satisfied with the overall quality".to_string(),
            scale: 5,
        },
        Question {
            id: 3,
            text: "I will keep using this service in the future".to_string(),
            scale: 5,
        },
    ]
}
