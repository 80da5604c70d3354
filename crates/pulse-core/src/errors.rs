use thiserror::Error;

/// Service-level failure taxonomy. Business-rule failures carry a distinct
/// kind; unexpected persistence failures are funneled into `Storage` and
/// reported generically at the boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("missing or malformed input")]
    InvalidInput,

    /// Deliberately covers both "no such user" and "wrong password" so the
    /// two are indistinguishable to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailTaken,

    #[error("answer set does not match the active questionnaire")]
    InvalidAnswers,

    #[error("no active session")]
    Unauthorized,

    #[error("admin access required")]
    Forbidden,

    #[error("storage failure: {0}")]
    Storage(anyhow::Error),
}

impl ServiceError {
    /// Stable wire code for the HTTP layer. Storage detail never crosses
    /// the boundary.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidCredentials => "invalid_credentials",
            Self::EmailTaken => "email_taken",
            Self::InvalidAnswers => "invalid_answers",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Storage(_) => "server_error",
        }
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(e: anyhow::Error) -> Self {
        Self::Storage(e)
    }
}
