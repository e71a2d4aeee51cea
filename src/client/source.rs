//! Where the quiz client gets its questions from.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::models::{PublicChoice, PublicQuestion};
use crate::protocol::{AnswerFeedback, SubmitAnswer};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with {0}")]
    Status(StatusCode),

    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_questions(&self, limit: u32) -> Result<Vec<PublicQuestion>, ClientError>;

    async fn submit_answer(&self, submission: SubmitAnswer)
    -> Result<AnswerFeedback, ClientError>;
}

/// Talks to the HTTP service.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    base: Url,
}

impl HttpSource {
    /// `base` is the API root, e.g. `http://localhost:3000/api`.
    pub fn new(base: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_questions(&self, limit: u32) -> Result<Vec<PublicQuestion>, ClientError> {
        let url = self.base.join("questions")?;
        debug!("GET {url} limit={limit}");

        let response = self
            .http
            .get(url)
            .query(&[("limit", limit)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        Ok(response.json().await?)
    }

    async fn submit_answer(
        &self,
        submission: SubmitAnswer,
    ) -> Result<AnswerFeedback, ClientError> {
        let url = self.base.join("answers")?;
        debug!("POST {url}");

        let response = self.http.post(url).json(&submission).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}

pub const MOCK_QUESTION_ID: i64 = 999;

/// Offline stand-in with a single canned question. Its rule is fixed: the
/// second listed option is the correct one.
#[derive(Debug, Clone, Default)]
pub struct MockSource;

impl MockSource {
    pub fn question() -> PublicQuestion {
        PublicQuestion {
            id: MOCK_QUESTION_ID,
            stem: "（Mock）下面哪个是 HTTP 状态码 200 的含义？".to_string(),
            explanation: Some("200 表示请求成功".to_string()),
            tags: None,
            options: vec![
                PublicChoice {
                    id: 1,
                    text: "成功".to_string(),
                },
                PublicChoice {
                    id: 2,
                    text: "未找到".to_string(),
                },
            ],
        }
    }
}

#[async_trait]
impl DataSource for MockSource {
    async fn fetch_questions(&self, _limit: u32) -> Result<Vec<PublicQuestion>, ClientError> {
        Ok(vec![Self::question()])
    }

    async fn submit_answer(
        &self,
        submission: SubmitAnswer,
    ) -> Result<AnswerFeedback, ClientError> {
        let question = Self::question();
        let correct_option_id = question.options.get(1).map(|o| o.id);

        Ok(AnswerFeedback {
            correct: correct_option_id == Some(submission.selected_option_id),
            correct_option_id,
            explanation: question.explanation,
        })
    }
}

/// The data source, picked once when the client starts.
#[derive(Debug, Clone)]
pub enum Source {
    Live(HttpSource),
    Mock(MockSource),
}

impl Source {
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        if config.quiz_mock {
            Ok(Source::Mock(MockSource))
        } else {
            Ok(Source::Live(HttpSource::new(&config.quiz_api_base)?))
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, Source::Mock(_))
    }
}

#[async_trait]
impl DataSource for Source {
    async fn fetch_questions(&self, limit: u32) -> Result<Vec<PublicQuestion>, ClientError> {
        match self {
            Source::Live(source) => source.fetch_questions(limit).await,
            Source::Mock(source) => source.fetch_questions(limit).await,
        }
    }

    async fn submit_answer(
        &self,
        submission: SubmitAnswer,
    ) -> Result<AnswerFeedback, ClientError> {
        match self {
            Source::Live(source) => source.submit_answer(submission).await,
            Source::Mock(source) => source.submit_answer(submission).await,
        }
    }
}
