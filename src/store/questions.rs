use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{QuizError, QuizResult};
use crate::models::{Choice, NewQuestion, Question, QuestionSummary};

struct QuestionRow {
    id: i64,
    stem: String,
    explanation: Option<String>,
    tags: Option<Vec<String>>,
}

fn question_row(row: &Row) -> rusqlite::Result<QuestionRow> {
    let tags: Option<String> = row.get(3)?;
    let tags = tags
        .map(|raw| serde_json::from_str::<Vec<String>>(&raw))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(QuestionRow {
        id: row.get(0)?,
        stem: row.get(1)?,
        explanation: row.get(2)?,
        tags,
    })
}

fn choice_row(row: &Row) -> rusqlite::Result<Choice> {
    Ok(Choice {
        id: row.get(0)?,
        question_id: row.get(1)?,
        text: row.get(2)?,
        is_correct: row.get(3)?,
    })
}

fn options_for(conn: &Connection, question_id: i64) -> rusqlite::Result<Vec<Choice>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, question_id, text, is_correct FROM options WHERE question_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map([question_id], choice_row)?;
    rows.collect()
}

fn with_options(conn: &Connection, row: QuestionRow) -> rusqlite::Result<Question> {
    let options = options_for(conn, row.id)?;
    Ok(Question {
        id: row.id,
        stem: row.stem,
        explanation: row.explanation,
        tags: row.tags,
        options,
    })
}

/// `limit` questions in database-random order. Every row is scored, so the
/// cost grows with the table.
pub fn random_questions(conn: &Connection, limit: u32) -> rusqlite::Result<Vec<Question>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, stem, explanation, tags FROM questions ORDER BY RANDOM() LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit], question_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(|row| with_options(conn, row)).collect()
}

pub fn find_question(conn: &Connection, id: i64) -> rusqlite::Result<Option<Question>> {
    let row = conn
        .query_row(
            "SELECT id, stem, explanation, tags FROM questions WHERE id = ?1",
            [id],
            question_row,
        )
        .optional()?;

    row.map(|row| with_options(conn, row)).transpose()
}

pub fn find_question_id_by_stem(conn: &Connection, stem: &str) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM questions WHERE stem = ?1 ORDER BY id LIMIT 1",
        [stem],
        |row| row.get(0),
    )
    .optional()
}

pub fn find_option(conn: &Connection, id: i64) -> rusqlite::Result<Option<Choice>> {
    conn.query_row(
        "SELECT id, question_id, text, is_correct FROM options WHERE id = ?1",
        [id],
        choice_row,
    )
    .optional()
}

/// The option flagged correct for `question_id`, if there is one.
pub fn correct_option(conn: &Connection, question_id: i64) -> rusqlite::Result<Option<Choice>> {
    conn.query_row(
        "SELECT id, question_id, text, is_correct FROM options
         WHERE question_id = ?1 AND is_correct = 1
         ORDER BY id LIMIT 1",
        [question_id],
        choice_row,
    )
    .optional()
}

pub fn list_summaries(conn: &Connection) -> rusqlite::Result<Vec<QuestionSummary>> {
    let mut stmt = conn.prepare("SELECT id, stem FROM questions ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(QuestionSummary {
            id: row.get(0)?,
            stem: row.get(1)?,
        })
    })?;
    rows.collect()
}

pub fn count_questions(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))
}

fn encode_tags(question: &NewQuestion) -> QuizResult<Option<String>> {
    question
        .tags
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| QuizError::InvalidQuestion(e.to_string()))
}

fn insert_options(conn: &Connection, question_id: i64, question: &NewQuestion) -> QuizResult<()> {
    let mut stmt = conn
        .prepare_cached("INSERT INTO options (question_id, text, is_correct) VALUES (?1, ?2, ?3)")?;
    for option in &question.options {
        stmt.execute(params![question_id, option.text, option.is_correct])?;
    }
    Ok(())
}

/// Insert a question and its options. Callers wrap this in a transaction
/// when several writes must land together.
pub fn insert_question(conn: &Connection, question: &NewQuestion) -> QuizResult<i64> {
    question.validate().map_err(QuizError::InvalidQuestion)?;

    conn.execute(
        "INSERT INTO questions (stem, explanation, tags) VALUES (?1, ?2, ?3)",
        params![question.stem, question.explanation, encode_tags(question)?],
    )?;
    let id = conn.last_insert_rowid();
    insert_options(conn, id, question)?;

    Ok(id)
}

/// Overwrite explanation, tags and options of an existing question.
pub fn replace_question(conn: &Connection, id: i64, question: &NewQuestion) -> QuizResult<()> {
    question.validate().map_err(QuizError::InvalidQuestion)?;

    conn.execute("DELETE FROM options WHERE question_id = ?1", [id])?;
    let updated = conn.execute(
        "UPDATE questions SET explanation = ?1, tags = ?2 WHERE id = ?3",
        params![question.explanation, encode_tags(question)?, id],
    )?;
    if updated == 0 {
        return Err(QuizError::QuestionNotFound(id));
    }
    insert_options(conn, id, question)?;

    Ok(())
}

/// Remove every attempt, option and question, in dependency order.
pub fn delete_all(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM answer_attempts", [])?;
    conn.execute("DELETE FROM options", [])?;
    conn.execute("DELETE FROM questions", [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewChoice;
    use crate::store::test_support::temp_store;

    fn http_question() -> NewQuestion {
        NewQuestion {
            stem: "下面哪个是 HTTP 状态码 200 的含义？".to_string(),
            explanation: Some("200 表示请求成功".to_string()),
            tags: Some(vec!["http".to_string()]),
            options: vec![
                NewChoice {
                    text: "未找到".to_string(),
                    is_correct: false,
                },
                NewChoice {
                    text: "成功".to_string(),
                    is_correct: true,
                },
            ],
        }
    }

    #[test]
    fn test_insert_and_find() {
        let (store, _dir) = temp_store("questions");
        let conn = store.conn().unwrap();

        let id = insert_question(&conn, &http_question()).unwrap();
        let question = find_question(&conn, id).unwrap().unwrap();

        assert_eq!(question.stem, http_question().stem);
        assert_eq!(question.tags, Some(vec!["http".to_string()]));
        assert_eq!(question.options.len(), 2);
        assert!(question.options.iter().all(|o| o.question_id == id));

        let correct = correct_option(&conn, id).unwrap().unwrap();
        assert_eq!(correct.text, "成功");
        assert_eq!(find_option(&conn, correct.id).unwrap(), Some(correct));
    }

    #[test]
    fn test_missing_rows_are_none() {
        let (store, _dir) = temp_store("missing");
        let conn = store.conn().unwrap();

        assert_eq!(find_question(&conn, 42).unwrap(), None);
        assert_eq!(find_option(&conn, 42).unwrap(), None);
        assert_eq!(correct_option(&conn, 42).unwrap(), None);
        assert!(random_questions(&conn, 5).unwrap().is_empty());
    }

    #[test]
    fn test_random_questions_respects_limit() {
        let (store, _dir) = temp_store("random");
        let conn = store.conn().unwrap();
        for i in 0..5 {
            let mut question = http_question();
            question.stem = format!("question {i}");
            insert_question(&conn, &question).unwrap();
        }

        assert_eq!(random_questions(&conn, 3).unwrap().len(), 3);
        assert_eq!(random_questions(&conn, 10).unwrap().len(), 5);
        assert!(
            random_questions(&conn, 5)
                .unwrap()
                .iter()
                .all(|q| q.options.len() == 2)
        );
    }

    #[test]
    fn test_replace_question_swaps_options() {
        let (store, _dir) = temp_store("replace");
        let conn = store.conn().unwrap();
        let id = insert_question(&conn, &http_question()).unwrap();

        let mut updated = http_question();
        updated.explanation = None;
        updated.options.push(NewChoice {
            text: "重定向".to_string(),
            is_correct: false,
        });
        replace_question(&conn, id, &updated).unwrap();

        let question = find_question(&conn, id).unwrap().unwrap();
        assert_eq!(question.explanation, None);
        assert_eq!(question.options.len(), 3);
        assert_eq!(find_question_id_by_stem(&conn, &updated.stem).unwrap(), Some(id));
    }

    #[test]
    fn test_insert_rejects_invalid_question() {
        let (store, _dir) = temp_store("invalid");
        let conn = store.conn().unwrap();

        let mut question = http_question();
        question.options[0].is_correct = true;
        assert!(matches!(
            insert_question(&conn, &question),
            Err(QuizError::InvalidQuestion(_))
        ));
        assert_eq!(count_questions(&conn).unwrap(), 0);
    }

    #[test]
    fn test_delete_all() {
        let (store, _dir) = temp_store("delete");
        let conn = store.conn().unwrap();
        insert_question(&conn, &http_question()).unwrap();

        delete_all(&conn).unwrap();
        assert_eq!(count_questions(&conn).unwrap(), 0);
        assert!(list_summaries(&conn).unwrap().is_empty());
    }
}
