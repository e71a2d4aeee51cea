use chrono::Utc;
use rusqlite::{Connection, params};

use crate::models::AnswerAttempt;

pub fn record_attempt(
    conn: &Connection,
    question_id: i64,
    selected_option_id: i64,
    correct: bool,
    elapsed_ms: Option<i64>,
) -> rusqlite::Result<AnswerAttempt> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO answer_attempts (question_id, selected_option_id, correct, elapsed_ms, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![question_id, selected_option_id, correct, elapsed_ms, created_at],
    )?;

    Ok(AnswerAttempt {
        id: conn.last_insert_rowid(),
        question_id,
        selected_option_id,
        correct,
        elapsed_ms,
        created_at,
    })
}
