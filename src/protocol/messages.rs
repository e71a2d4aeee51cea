//! JSON bodies exchanged between the quiz client and the HTTP service.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Header carrying the shared secret for the test reset endpoint.
pub const RESET_SECRET_HEADER: &str = "x-reset-secret";

/// Number of questions served when the request does not say.
pub const DEFAULT_LIMIT: u32 = 1;

/// Query string of `GET /api/questions`. `limit` is kept as text so that a
/// malformed value falls back to the default instead of rejecting the
/// request.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionsQuery {
    pub limit: Option<String>,
}

impl QuestionsQuery {
    pub fn limit(&self) -> u32 {
        parse_limit(self.limit.as_deref())
    }
}

/// Body of `POST /api/answers` and `POST /api/questions/check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswer {
    pub question_id: i64,
    pub selected_option_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<i64>,
}

/// Whether a selection was right and which option was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerCheck {
    pub correct: bool,
    pub correct_option_id: Option<i64>,
}

/// Response of `POST /api/answers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_option_id: Option<i64>,
    pub explanation: Option<String>,
}

impl AnswerFeedback {
    pub fn new(check: AnswerCheck, explanation: Option<String>) -> Self {
        Self {
            correct: check.correct,
            correct_option_id: check.correct_option_id,
            explanation,
        }
    }

    /// What the client reports when the submission itself failed.
    pub fn failed() -> Self {
        Self {
            correct: false,
            correct_option_id: None,
            explanation: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetResponse {
    pub ok: bool,
}

/// Read a question count the way a lenient integer parser would: leading
/// digits count, anything else (missing, non-numeric, zero, negative)
/// becomes [`DEFAULT_LIMIT`].
pub fn parse_limit(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_LIMIT;
    };

    let raw = raw.trim_start();
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    let digits: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();

    match digits.parse::<u64>() {
        Ok(0) | Err(_) => DEFAULT_LIMIT,
        Ok(n) => u32::try_from(n).unwrap_or(u32::MAX),
    }
}
