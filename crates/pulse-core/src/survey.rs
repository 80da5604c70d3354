use crate::errors::ServiceError;
use crate::model::{Answer, Question, Session};
use crate::notify::{dispatch, Notification, Notifier};
use crate::storage::store::Store;
use std::collections::HashMap;
use std::sync::Arc;

/// Questionnaire flow: fetch the active set, score a submission, persist
/// it, and notify the admin address after the write.
#[derive(Clone)]
pub struct SurveyService {
    store: Store,
    notifier: Arc<dyn Notifier>,
    notify_to: String,
}

impl SurveyService {
    pub fn new(store: Store, notifier: Arc<dyn Notifier>, notify_to: impl Into<String>) -> Self {
        Self {
            store,
            notifier,
            notify_to: notify_to.into(),
        }
    }

    pub fn active_questions(&self) -> Result<Vec<Question>, ServiceError> {
        Ok(self.store.get_questions()?)
    }

    /// Validates and scores a submission for the session's user. Every
    /// answer is matched to its question by id and clamped into
    /// `[1, scale]`; an answer whose id has no matching question is
    /// clamped against the default scale of 5 and still persisted.
    pub fn submit(&self, session: &Session, answers: &[Answer]) -> Result<i64, ServiceError> {
        let questions = self.store.get_questions()?;
        if answers.len() != questions.len() {
            return Err(ServiceError::InvalidAnswers);
        }

        let scale_by_id: HashMap<i64, i64> =
            questions.iter().map(|q| (q.id, q.scale)).collect();
        let sanitized: Vec<Answer> = answers
            .iter()
            .map(|a| {
                let scale = scale_by_id.get(&a.id).copied().unwrap_or(5);
                Answer {
                    id: a.id,
                    value: a.value.clamp(1, scale.max(1)),
                }
            })
            .collect();
        let score: i64 = sanitized.iter().map(|a| a.value).sum();

        self.store.save_result(session.id, &sanitized, score)?;

        // Only after the result is durably saved.
        dispatch(
            Arc::clone(&self.notifier),
            submission_notice(&self.notify_to, &session.email, score, &sanitized),
        );
        Ok(score)
    }
}

fn submission_notice(to: &str, submitter: &str, score: i64, answers: &[Answer]) -> Notification {
    let values = answers
        .iter()
        .map(|a| format!("q{}:{}", a.id, a.value))
        .collect::<Vec<_>>()
        .join(", ");
    Notification {
        to: to.to_string(),
        subject: "[Pulse] New survey submission".to_string(),
        body: format!("User: {submitter}\nScore: {score}\nAnswers: {values}"),
    }
}
