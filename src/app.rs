use crossterm::event::KeyCode;

use crate::client::{AnswerStatus, DataSource, QuizSession};
use crate::ui::{RadioGroup, RadioOption};

/// Terminal quiz state: the session plus the option selector on screen and a
/// running score.
pub struct App<S> {
    session: QuizSession<S>,
    group: RadioGroup<i64>,
    answered: usize,
    correct: usize,
    mock: bool,
    pub should_quit: bool,
}

impl<S: DataSource> App<S> {
    pub fn new(session: QuizSession<S>, mock: bool) -> Self {
        Self {
            session,
            group: RadioGroup::check(Vec::new()),
            answered: 0,
            correct: 0,
            mock,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &QuizSession<S> {
        &self.session
    }

    pub fn group(&self) -> &RadioGroup<i64> {
        &self.group
    }

    pub fn is_mock(&self) -> bool {
        self.mock
    }

    pub fn score(&self) -> (usize, usize) {
        (self.correct, self.answered)
    }

    pub async fn load_next(&mut self) {
        self.session.load_next().await;
        self.rebuild_group();
    }

    /// Fire a due auto-advance, if any.
    pub async fn tick(&mut self) {
        if self.session.tick().await {
            self.rebuild_group();
        }
    }

    /// Returns true if the app should exit.
    pub async fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('r') | KeyCode::Char('R')
                if !self.session.is_loading() =>
            {
                self.load_next().await;
                return false;
            }
            _ => {}
        }

        if let Some(option_id) = self.group.handle_key(key) {
            self.answer(option_id).await;
        }
        false
    }

    async fn answer(&mut self, option_id: i64) {
        let Some(feedback) = self.session.choose(option_id).await else {
            return;
        };

        self.answered += 1;
        if self.session.status() == AnswerStatus::Correct {
            self.correct += 1;
        }
        self.group.set_correct_value(feedback.correct_option_id);
        self.group.set_disabled(true);
    }

    fn rebuild_group(&mut self) {
        let options = self
            .session
            .question()
            .map(|q| {
                q.options
                    .iter()
                    .map(|o| RadioOption::new(o.id, o.text.clone()))
                    .collect()
            })
            .unwrap_or_default();
        self.group = RadioGroup::check(options);
    }
}
