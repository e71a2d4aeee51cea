use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::data::LoadError;

pub type QuizResult<T> = Result<T, QuizError>;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Question {0} not found")]
    QuestionNotFound(i64),

    #[error("Option {0} not found")]
    OptionNotFound(i64),

    #[error("Option {option_id} does not belong to question {question_id}")]
    OptionMismatch { question_id: i64, option_id: i64 },

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Misconfigured(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl QuizError {
    pub fn status(&self) -> StatusCode {
        match self {
            QuizError::QuestionNotFound(_) | QuizError::OptionNotFound(_) => StatusCode::NOT_FOUND,
            QuizError::OptionMismatch { .. } | QuizError::InvalidQuestion(_) => {
                StatusCode::BAD_REQUEST
            }
            QuizError::Forbidden(_) => StatusCode::FORBIDDEN,
            QuizError::Misconfigured(_)
            | QuizError::Database(_)
            | QuizError::Pool(_)
            | QuizError::Load(_)
            | QuizError::Io(_)
            | QuizError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
