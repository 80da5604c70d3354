use crate::errors::ServiceError;
use crate::model::{Question, QuestionDraft, ResultView, Session};
use crate::storage::store::Store;
use chrono::{DateTime, Utc};

const MAX_TEXT_CHARS: usize = 300;
const MIN_SCALE: i64 = 2;
const MAX_SCALE: i64 = 10;
const DEFAULT_SCALE: i64 = 5;

/// Reporting and questionnaire editing. Every operation requires an admin
/// session.
#[derive(Clone)]
pub struct AdminService {
    store: Store,
}

impl AdminService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All stored results, newest first, optionally bounded inclusively on
    /// submission time.
    pub fn list_results(
        &self,
        session: &Session,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<ResultView>, ServiceError> {
        require_admin(session)?;
        Ok(self.store.list_results(from, to)?)
    }

    /// The current question set, for the editor view.
    pub fn questions(&self, session: &Session) -> Result<Vec<Question>, ServiceError> {
        require_admin(session)?;
        Ok(self.store.get_questions()?)
    }

    /// Sanitizes the drafts and replaces the active set wholesale. Returns
    /// the set as stored.
    pub fn replace_questions(
        &self,
        session: &Session,
        drafts: &[QuestionDraft],
    ) -> Result<Vec<Question>, ServiceError> {
        require_admin(session)?;
        if drafts.is_empty() {
            return Err(ServiceError::InvalidInput);
        }
        let sanitized: Vec<Question> = drafts
            .iter()
            .enumerate()
            .map(|(idx, d)| sanitize_question(idx, d))
            .collect();
        self.store.set_questions(&sanitized)?;
        Ok(sanitized)
    }
}

fn require_admin(session: &Session) -> Result<(), ServiceError> {
    if session.is_admin {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

fn sanitize_question(idx: usize, draft: &QuestionDraft) -> Question {
    let id = draft
        .id
        .as_ref()
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(idx as i64 + 1);
    let text: String = draft
        .text
        .as_deref()
        .unwrap_or("")
        .chars()
        .take(MAX_TEXT_CHARS)
        .collect();
    let scale = draft
        .scale
        .as_ref()
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(DEFAULT_SCALE)
        .clamp(MIN_SCALE, MAX_SCALE);
    Question { id, text, scale }
}
