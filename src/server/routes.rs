use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use tracing::{info, warn};

use crate::error::QuizResult;
use crate::models::PublicQuestion;
use crate::protocol::{
    AnswerCheck, AnswerFeedback, QuestionsQuery, RESET_SECRET_HEADER, ResetResponse, SubmitAnswer,
};
use crate::seed;

use super::reset::validate_reset_request;
use super::state::AppState;

/// `GET /api/questions?limit=N`
pub async fn questions_handler(
    State(state): State<AppState>,
    Query(query): Query<QuestionsQuery>,
) -> QuizResult<Json<Vec<PublicQuestion>>> {
    let questions = state.service.random_questions(query.limit()).await?;
    Ok(Json(questions))
}

/// `POST /api/answers`
pub async fn answers_handler(
    State(state): State<AppState>,
    Json(body): Json<SubmitAnswer>,
) -> QuizResult<Json<AnswerFeedback>> {
    let feedback = state.service.submit_answer(body).await?;
    Ok(Json(feedback))
}

/// `POST /api/questions/check`: the bare comparison, without explanation.
pub async fn check_handler(
    State(state): State<AppState>,
    Json(body): Json<SubmitAnswer>,
) -> QuizResult<Json<AnswerCheck>> {
    let check = state
        .service
        .check_answer(body.question_id, body.selected_option_id)
        .await?;
    Ok(Json(check))
}

/// `POST /api/test/reset`
pub async fn reset_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> QuizResult<Json<ResetResponse>> {
    let provided = headers
        .get(RESET_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Err(e) = validate_reset_request(&state.config, provided) {
        warn!("Rejected test reset: {e}");
        return Err(e);
    }

    let store = state.service.store().clone();
    let config = state.config.clone();
    let report = tokio::task::spawn_blocking(move || seed::reset_test(&store, &config)).await??;
    info!(questions = report.inserted, "Test database reset");

    Ok(Json(ResetResponse { ok: true }))
}
