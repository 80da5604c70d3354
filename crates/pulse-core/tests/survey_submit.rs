use async_trait::async_trait;
use pulse_core::errors::ServiceError;
use pulse_core::model::{Answer, Question, Session};
use pulse_core::notify::{Notification, Notifier};
use pulse_core::storage::store::Store;
use pulse_core::survey::SurveyService;
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration};

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, note: &Notification) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(note.clone());
        Ok(())
    }
}

struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _note: &Notification) -> anyhow::Result<()> {
        anyhow::bail!("relay unreachable")
    }
}

fn setup(notifier: Arc<dyn Notifier>) -> anyhow::Result<(Store, SurveyService, Session)> {
    let store = Store::memory()?;
    store.init_schema()?;
    let user = store.create_user("Ana", "ana@example.com", "h", false)?;
    let session = Session {
        id: user.id,
        name: user.name,
        email: user.email,
        is_admin: false,
    };
    let survey = SurveyService::new(store.clone(), notifier, "admin@example.com");
    Ok((store, survey, session))
}

async fn wait_for_notification(recorder: &RecordingNotifier) -> Notification {
    for _ in 0..100 {
        if let Some(note) = recorder.sent.lock().unwrap().first().cloned() {
            return note;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("notification was never dispatched");
}

#[tokio::test]
async fn test_count_mismatch_is_rejected_and_nothing_is_persisted() -> anyhow::Result<()> {
    let recorder = Arc::new(RecordingNotifier::default());
    let (store, survey, session) = setup(recorder.clone())?;

    // Default set has 3 questions; submit 2 answers.
    let err = survey
        .submit(&session, &[Answer { id: 1, value: 3 }, Answer { id: 2, value: 3 }])
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidAnswers));

    assert!(store.list_results(None, None)?.is_empty());
    sleep(Duration::from_millis(50)).await;
    assert!(recorder.sent.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_values_are_clamped_into_question_scale() -> anyhow::Result<()> {
    let recorder = Arc::new(RecordingNotifier::default());
    let (store, survey, session) = setup(recorder)?;
    store.set_questions(&[
        Question { id: 1, text: "a".into(), scale: 5 },
        Question { id: 2, text: "b".into(), scale: 10 },
    ])?;

    let score = survey.submit(
        &session,
        &[Answer { id: 1, value: 9 }, Answer { id: 2, value: -3 }],
    )?;
    // 9 clamps to 5 on a 1..5 scale, -3 clamps to 1.
    assert_eq!(score, 6);

    let rows = store.list_results(None, None)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].answers.as_deref(),
        Some([Answer { id: 1, value: 5 }, Answer { id: 2, value: 1 }].as_slice())
    );
    assert_eq!(rows[0].score, 6);
    Ok(())
}

#[tokio::test]
async fn test_unknown_question_id_clamps_against_default_scale() -> anyhow::Result<()> {
    let recorder = Arc::new(RecordingNotifier::default());
    let (store, survey, session) = setup(recorder)?;
    store.set_questions(&[
        Question { id: 1, text: "a".into(), scale: 9 },
        Question { id: 2, text: "b".into(), scale: 9 },
    ])?;

    let score = survey.submit(
        &session,
        &[Answer { id: 1, value: 8 }, Answer { id: 99, value: 8 }],
    )?;
    // id 99 has no question, so its value clamps to the default scale 5.
    assert_eq!(score, 13);

    let rows = store.list_results(None, None)?;
    assert_eq!(
        rows[0].answers.as_deref(),
        Some([Answer { id: 1, value: 8 }, Answer { id: 99, value: 5 }].as_slice())
    );
    Ok(())
}

#[tokio::test]
async fn test_notification_carries_submitter_score_and_values() -> anyhow::Result<()> {
    let recorder = Arc::new(RecordingNotifier::default());
    let (store, survey, session) = setup(recorder.clone())?;
    store.set_questions(&[Question { id: 1, text: "a".into(), scale: 5 }])?;

    survey.submit(&session, &[Answer { id: 1, value: 4 }])?;

    let note = wait_for_notification(&recorder).await;
    assert_eq!(note.to, "admin@example.com");
    assert!(note.body.contains("ana@example.com"));
    assert!(note.body.contains("Score: 4"));
    assert!(note.body.contains("q1:4"));
    Ok(())
}

#[tokio::test]
async fn test_notifier_failure_never_reaches_the_caller() -> anyhow::Result<()> {
    let (store, survey, session) = setup(Arc::new(FailingNotifier))?;
    store.set_questions(&[Question { id: 1, text: "a".into(), scale: 5 }])?;

    let score = survey.submit(&session, &[Answer { id: 1, value: 2 }])?;
    assert_eq!(score, 2);

    // The result is durably saved even though delivery will fail.
    sleep(Duration::from_millis(50)).await;
    assert_eq!(store.list_results(None, None)?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_active_questions_passthrough() -> anyhow::Result<()> {
    let recorder = Arc::new(RecordingNotifier::default());
    let (store, survey, _) = setup(recorder)?;

    assert_eq!(survey.active_questions()?.len(), 3);
    let replacement = vec![Question { id: 1, text: "only".into(), scale: 3 }];
    store.set_questions(&replacement)?;
    assert_eq!(survey.active_questions()?, replacement);
    Ok(())
}
