//! # quiz-service
//!
//! A single-choice quiz: questions with one correct option each, stored in
//! SQLite, served over a small JSON HTTP API and played from the terminal.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_service::{Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     server::run(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! The pieces also work on their own: [`QuizService`] answers questions
//! against a [`Store`], and [`client::QuizSession`] drives one player
//! against any [`client::DataSource`].

pub mod app;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod models;
pub mod protocol;
pub mod seed;
pub mod server;
pub mod service;
pub mod store;
pub mod terminal;
pub mod ui;

pub use config::Config;
pub use data::{LoadError, load_questions_from_json};
pub use error::{QuizError, QuizResult};
pub use models::{AnswerAttempt, Choice, NewChoice, NewQuestion, PublicQuestion, Question};
pub use service::QuizService;
pub use store::Store;
