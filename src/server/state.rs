use std::sync::Arc;

use crate::config::Config;
use crate::error::QuizResult;
use crate::service::QuizService;
use crate::store::Store;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: QuizService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(service: QuizService, config: Arc<Config>) -> Self {
        Self { service, config }
    }

    /// Open the configured database and build the service on top of it.
    pub fn from_config(config: Arc<Config>) -> QuizResult<Self> {
        let store = Store::open(config.database_path())?;
        let service = QuizService::new(store).with_attempt_log(config.record_attempts);
        Ok(Self::new(service, config))
    }
}
