//! Quiz client.
//!
//! A [`QuizSession`] loads one question at a time from a [`DataSource`],
//! either the HTTP service or an offline mock, and auto-advances after a
//! correct answer.

mod client;
mod session;
mod source;

pub use client::{run, run_with};
pub use session::{AUTO_ADVANCE_DELAY, AnswerStatus, QuizSession};
pub use source::{ClientError, DataSource, HttpSource, MOCK_QUESTION_ID, MockSource, Source};
