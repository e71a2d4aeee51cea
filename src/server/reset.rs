use crate::config::Config;
use crate::error::{QuizError, QuizResult};

/// Gatekeeping for `POST /api/test/reset`, checked in this order:
/// endpoint enabled, secret configured, secret matches, database name
/// contains "test".
pub fn validate_reset_request(config: &Config, provided_secret: Option<&str>) -> QuizResult<()> {
    if !config.enable_test_endpoint {
        return Err(QuizError::Forbidden(
            "Test endpoint disabled (ENABLE_TEST_ENDPOINT not set)".to_string(),
        ));
    }

    let Some(secret) = config.reset_secret() else {
        return Err(QuizError::Misconfigured(
            "Test reset secret not configured on server".to_string(),
        ));
    };

    match provided_secret {
        Some(provided) if !provided.is_empty() && provided == secret => {}
        _ => {
            return Err(QuizError::Forbidden(
                "Invalid or missing reset secret".to_string(),
            ));
        }
    }

    if !config.database_name().to_lowercase().contains("test") {
        return Err(QuizError::Forbidden(
            "Refuse to reset non-test database (database name must include 'test')".to_string(),
        ));
    }

    Ok(())
}
