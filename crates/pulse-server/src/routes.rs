use crate::error::ApiError;
use crate::state::{AppState, SharedState};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use pulse_core::errors::ServiceError;
use pulse_core::model::{Answer, QuestionDraft, Session};
use pulse_core::report::csv;
use pulse_core::session::SessionStore;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

const SESSION_COOKIE: &str = "pulse_session";

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/me", get(me))
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/test", get(questions).post(submit))
        .route("/api/admin/results", get(admin_results))
        .route("/api/admin/questions", get(admin_questions).post(admin_replace_questions))
        .with_state(state)
}

#[derive(Deserialize)]
struct RegisterBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
struct LoginBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
struct SubmitBody {
    answers: Vec<Answer>,
}

#[derive(Deserialize)]
struct ReplaceQuestionsBody {
    questions: Vec<QuestionDraft>,
}

async fn me(State(state): State<SharedState>, headers: HeaderMap) -> Json<serde_json::Value> {
    let session = current_session(&state, &headers);
    Json(json!({ "user": session }))
}

async fn register(
    State(state): State<SharedState>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.auth.register(&body.name, &body.email, &body.password)?;
    let token = state.sessions.create(session);
    Ok((session_cookie(&token), Json(json!({ "ok": true }))))
}

async fn login(
    State(state): State<SharedState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.auth.login(&body.email, &body.password)?;
    let token = state.sessions.create(session);
    Ok((session_cookie(&token), Json(json!({ "ok": true }))))
}

async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.sessions.destroy(token);
    }
    (clear_session_cookie(), Json(json!({ "ok": true })))
}

async fn questions(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_session(&state, &headers)?;
    let questions = state.survey.active_questions()?;
    Ok(Json(json!({ "questions": questions })))
}

async fn submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<SubmitBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = require_session(&state, &headers)?;
    let score = state.survey.submit(&session, &body.answers)?;
    Ok(Json(json!({ "ok": true, "score": score })))
}

async fn admin_results(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let session = require_session(&state, &headers)?;
    let from = parse_bound(params.get("from"))?;
    let to = parse_bound(params.get("to"))?;
    let rows = state.admin.list_results(&session, from, to)?;

    if params.get("csv").map(String::as_str) == Some("1") {
        let csv_headers = [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"results.csv\"",
            ),
        ];
        return Ok((csv_headers, csv::render_results(&rows)).into_response());
    }
    Ok(Json(rows).into_response())
}

async fn admin_questions(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = require_session(&state, &headers)?;
    let questions = state.admin.questions(&session)?;
    Ok(Json(json!({ "questions": questions })))
}

async fn admin_replace_questions(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<ReplaceQuestionsBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = require_session(&state, &headers)?;
    state.admin.replace_questions(&session, &body.questions)?;
    Ok(Json(json!({ "ok": true })))
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
}

fn current_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    state.sessions.get(session_token(headers)?)
}

fn require_session(state: &AppState, headers: &HeaderMap) -> Result<Session, ApiError> {
    current_session(state, headers).ok_or(ApiError(ServiceError::Unauthorized))
}

fn session_cookie(token: &str) -> [(header::HeaderName, String); 1] {
    [(
        header::SET_COOKIE,
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax"),
    )]
}

fn clear_session_cookie() -> [(header::HeaderName, String); 1] {
    [(
        header::SET_COOKIE,
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0"),
    )]
}

/// Accepts RFC3339, `YYYY-MM-DDTHH:MM[:SS]` (HTML datetime-local),
/// `YYYY-MM-DD HH:MM:SS`, or a bare date (midnight). Empty means no bound.
fn parse_bound(raw: Option<&String>) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(raw) = raw.map(|s| s.trim()).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(Some(Utc.from_utc_datetime(&naive)));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))));
    }
    Err(ApiError(ServiceError::InvalidInput))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bound_formats() {
        assert!(parse_bound(None).unwrap().is_none());
        assert!(parse_bound(Some(&"  ".to_string())).unwrap().is_none());

        let midnight = parse_bound(Some(&"2026-08-01".to_string())).unwrap().unwrap();
        assert_eq!(midnight, Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap());

        let local = parse_bound(Some(&"2026-08-01T10:30".to_string())).unwrap().unwrap();
        assert_eq!(local, Utc.with_ymd_and_hms(2026, 8, 1, 10, 30, 0).unwrap());

        assert!(parse_bound(Some(&"yesterday".to_string())).is_err());
    }
}
