//! Question serving and answer checking.
//!
//! Each call is self-contained: no state survives between requests other
//! than what the database holds.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{QuizError, QuizResult};
use crate::models::{PublicQuestion, Question, QuestionSummary};
use crate::protocol::{AnswerCheck, AnswerFeedback, SubmitAnswer};
use crate::store::{self, Store};

#[derive(Clone)]
pub struct QuizService {
    store: Store,
    record_attempts: bool,
}

impl QuizService {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            record_attempts: false,
        }
    }

    /// Also append an attempt row for every submitted answer.
    pub fn with_attempt_log(mut self, enabled: bool) -> Self {
        self.record_attempts = enabled;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    async fn blocking<T, F>(&self, f: F) -> QuizResult<T>
    where
        F: FnOnce(&Connection) -> QuizResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            let conn = store.conn()?;
            f(&conn)
        })
        .await?
    }

    /// Up to `limit` random questions without correctness flags. An empty
    /// table gives an empty list.
    pub async fn random_questions(&self, limit: u32) -> QuizResult<Vec<PublicQuestion>> {
        let questions = self
            .blocking(move |conn| Ok(store::random_questions(conn, limit)?))
            .await?;
        debug!(limit, served = questions.len(), "Serving random questions");

        Ok(questions.iter().map(Question::to_public).collect())
    }

    pub async fn check_answer(
        &self,
        question_id: i64,
        selected_option_id: i64,
    ) -> QuizResult<AnswerCheck> {
        self.blocking(move |conn| check_answer_on(conn, question_id, selected_option_id))
            .await
    }

    pub async fn find_question(&self, id: i64) -> QuizResult<Option<Question>> {
        self.blocking(move |conn| Ok(store::find_question(conn, id)?))
            .await
    }

    /// Check the answer and attach the question's explanation.
    pub async fn submit_answer(&self, submission: SubmitAnswer) -> QuizResult<AnswerFeedback> {
        let record = self.record_attempts;
        let (question_id, option_id) = (submission.question_id, submission.selected_option_id);
        let feedback = self
            .blocking(move |conn| {
                let check = check_answer_on(
                    conn,
                    submission.question_id,
                    submission.selected_option_id,
                )?;
                let explanation = store::find_question(conn, submission.question_id)?
                    .and_then(|q| q.explanation);

                if record {
                    store::record_attempt(
                        conn,
                        submission.question_id,
                        submission.selected_option_id,
                        check.correct,
                        submission.elapsed_ms,
                    )?;
                }

                Ok(AnswerFeedback::new(check, explanation))
            })
            .await?;

        info!(
            question_id,
            option_id,
            correct = feedback.correct,
            "Answer submitted"
        );
        Ok(feedback)
    }

    pub async fn list_questions(&self) -> QuizResult<Vec<QuestionSummary>> {
        self.blocking(|conn| Ok(store::list_summaries(conn)?)).await
    }
}

/// The selected option must exist and belong to `question_id`; the answer
/// is correct when that option carries the correctness flag.
fn check_answer_on(
    conn: &Connection,
    question_id: i64,
    selected_option_id: i64,
) -> QuizResult<AnswerCheck> {
    let selected = store::find_option(conn, selected_option_id)?
        .ok_or(QuizError::OptionNotFound(selected_option_id))?;

    if selected.question_id != question_id {
        return Err(QuizError::OptionMismatch {
            question_id,
            option_id: selected_option_id,
        });
    }

    let correct_option_id = store::correct_option(conn, question_id)?.map(|c| c.id);

    Ok(AnswerCheck {
        correct: selected.is_correct,
        correct_option_id,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::models::{NewChoice, NewQuestion};
    use crate::store::test_support::temp_store;

    fn seeded_service(name: &str) -> (QuizService, i64, tempfile::TempDir) {
        let (store, dir) = temp_store(name);
        let id = store::insert_question(
            &store.conn().unwrap(),
            &NewQuestion {
                stem: "（E2E）下面哪个是 HTTP 状态码 200 的含义？".to_string(),
                explanation: Some("200 表示请求成功".to_string()),
                tags: None,
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
            },
        )
        .unwrap();
        (QuizService::new(store), id, dir)
    }

    async fn option_ids(service: &QuizService, question_id: i64) -> (i64, i64) {
        let question = service.find_question(question_id).await.unwrap().unwrap();
        (question.options[0].id, question.options[1].id)
    }

    #[tokio::test]
    async fn test_check_answer() {
        let (service, qid, _dir) = seeded_service("check");
        let (wrong, right) = option_ids(&service, qid).await;

        let check = service.check_answer(qid, right).await.unwrap();
        assert_eq!(
            check,
            AnswerCheck {
                correct: true,
                correct_option_id: Some(right)
            }
        );

        let check = service.check_answer(qid, wrong).await.unwrap();
        assert_eq!(
            check,
            AnswerCheck {
                correct: false,
                correct_option_id: Some(right)
            }
        );
    }

    #[tokio::test]
    async fn test_check_answer_is_idempotent() {
        let (service, qid, _dir) = seeded_service("idempotent");
        let (wrong, _) = option_ids(&service, qid).await;

        let first = service.check_answer(qid, wrong).await.unwrap();
        for _ in 0..3 {
            assert_eq!(service.check_answer(qid, wrong).await.unwrap(), first);
        }
    }

    #[tokio::test]
    async fn test_unknown_option_is_not_found() {
        let (service, qid, _dir) = seeded_service("unknown");
        assert_matches!(
            service.check_answer(qid, 9999).await,
            Err(QuizError::OptionNotFound(9999))
        );
    }

    #[tokio::test]
    async fn test_option_from_other_question_is_rejected() {
        let (service, qid, _dir) = seeded_service("mismatch");
        let (_, right) = option_ids(&service, qid).await;

        assert_matches!(
            service.check_answer(qid + 1, right).await,
            Err(QuizError::OptionMismatch { .. })
        );
    }

    #[tokio::test]
    async fn test_submit_answer_attaches_explanation() {
        let (service, qid, _dir) = seeded_service("submit");
        let (_, right) = option_ids(&service, qid).await;

        let feedback = service
            .submit_answer(SubmitAnswer {
                question_id: qid,
                selected_option_id: right,
                elapsed_ms: None,
            })
            .await
            .unwrap();

        assert!(feedback.correct);
        assert_eq!(feedback.correct_option_id, Some(right));
        assert_eq!(feedback.explanation.as_deref(), Some("200 表示请求成功"));
    }

    #[tokio::test]
    async fn test_attempts_are_logged_only_when_enabled() {
        let (service, qid, _dir) = seeded_service("attempts");
        let (wrong, _) = option_ids(&service, qid).await;
        let submission = SubmitAnswer {
            question_id: qid,
            selected_option_id: wrong,
            elapsed_ms: Some(1200),
        };
        let count = |service: &QuizService| -> i64 {
            service
                .store()
                .conn()
                .unwrap()
                .query_row("SELECT COUNT(*) FROM answer_attempts", [], |row| row.get(0))
                .unwrap()
        };

        service.submit_answer(submission.clone()).await.unwrap();
        assert_eq!(count(&service), 0);

        let service = service.with_attempt_log(true);
        service.submit_answer(submission).await.unwrap();
        assert_eq!(count(&service), 1);
    }

    #[tokio::test]
    async fn test_public_questions_hide_correctness() {
        let (service, _, _dir) = seeded_service("public");

        let questions = service.random_questions(1).await.unwrap();
        assert_eq!(questions.len(), 1);

        let json = serde_json::to_string(&questions).unwrap();
        assert!(!json.contains("isCorrect"));
    }
}
