use chrono::{DateTime, Utc};
use serde::Serialize;

/// One submitted answer. Write-only: nothing in the quiz flow reads these back.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerAttempt {
    pub id: i64,
    pub question_id: i64,
    pub selected_option_id: i64,
    pub correct: bool,
    pub elapsed_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}
