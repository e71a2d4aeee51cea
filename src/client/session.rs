//! One player's quiz session: the question on screen, the chosen option and
//! the verdict, driven by a [`DataSource`].

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::models::PublicQuestion;
use crate::protocol::{AnswerFeedback, SubmitAnswer};

use super::source::DataSource;

/// How long a correct verdict stays on screen before the next question.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnswerStatus {
    #[default]
    Idle,
    Correct,
    Wrong,
}

pub struct QuizSession<S> {
    source: S,
    question: Option<PublicQuestion>,
    selected: Option<i64>,
    status: AnswerStatus,
    feedback: Option<AnswerFeedback>,
    error: Option<String>,
    loading: bool,
    shown_at: Option<Instant>,
    // Every correct answer schedules one reload; none are cancelled.
    pending_advances: Vec<Instant>,
}

impl<S: DataSource> QuizSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            question: None,
            selected: None,
            status: AnswerStatus::Idle,
            feedback: None,
            error: None,
            loading: false,
            shown_at: None,
            pending_advances: Vec::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn question(&self) -> Option<&PublicQuestion> {
        self.question.as_ref()
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    pub fn status(&self) -> AnswerStatus {
        self.status
    }

    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_pending_advance(&self) -> bool {
        !self.pending_advances.is_empty()
    }

    /// Fetch one question and reset the answer state. A failed fetch clears
    /// the question and records the error.
    pub async fn load_next(&mut self) {
        self.loading = true;
        self.error = None;
        self.status = AnswerStatus::Idle;
        self.selected = None;
        self.feedback = None;

        match self.source.fetch_questions(1).await {
            Ok(questions) => {
                self.question = questions.into_iter().next();
                self.shown_at = Some(Instant::now());
                if self.question.is_none() {
                    debug!("No question available");
                }
            }
            Err(e) => {
                warn!("Failed to load question: {e}");
                self.question = None;
                self.error = Some(e.to_string());
            }
        }

        self.loading = false;
    }

    /// Submit `option_id` for the current question. Returns `None` when no
    /// question is loaded. A correct answer schedules a reload
    /// [`AUTO_ADVANCE_DELAY`] later; a failed submission counts as wrong.
    pub async fn choose(&mut self, option_id: i64) -> Option<AnswerFeedback> {
        let question_id = self.question.as_ref()?.id;
        self.selected = Some(option_id);

        let elapsed_ms = self
            .shown_at
            .map(|t| i64::try_from(t.elapsed().as_millis()).unwrap_or(i64::MAX));
        let submission = SubmitAnswer {
            question_id,
            selected_option_id: option_id,
            elapsed_ms,
        };

        let feedback = match self.source.submit_answer(submission).await {
            Ok(feedback) => {
                self.error = None;
                feedback
            }
            Err(e) => {
                warn!(question_id, option_id, "Failed to submit answer: {e}");
                self.error = Some(e.to_string());
                AnswerFeedback::failed()
            }
        };

        if feedback.correct {
            self.status = AnswerStatus::Correct;
            self.pending_advances.push(Instant::now() + AUTO_ADVANCE_DELAY);
        } else {
            self.status = AnswerStatus::Wrong;
        }
        self.feedback = Some(feedback.clone());

        Some(feedback)
    }

    /// Run every scheduled reload whose deadline is at or before `now`.
    /// Returns whether anything was reloaded.
    pub async fn advance_if_due(&mut self, now: Instant) -> bool {
        let due = self.pending_advances.iter().filter(|at| **at <= now).count();
        if due == 0 {
            return false;
        }
        self.pending_advances.retain(|at| *at > now);

        for _ in 0..due {
            self.load_next().await;
        }
        true
    }

    pub async fn tick(&mut self) -> bool {
        self.advance_if_due(Instant::now()).await
    }
}
