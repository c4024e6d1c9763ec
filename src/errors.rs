use axum::http::StatusCode;

/// Failures the habit core reports back to the caller. None of them leave
/// the store in a changed state.
#[derive(Debug, thiserror::Error)]
pub enum HabitError {
    #[error("habit name must not be empty")]
    EmptyName,
    #[error("no habit ids left to allocate")]
    IdsExhausted,
    #[error("invalid file format: {0}")]
    InvalidFormat(String),
    #[error("invalid file format: document is not valid JSON ({0})")]
    MalformedDocument(#[from] serde_json::Error),
    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("invalid file format: habit #{index} is malformed ({source})")]
    InvalidRecord {
        index: usize,
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<HabitError> for AppError {
    fn from(err: HabitError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
