use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::NewQuestion;

const SEED_DATASET: &str = include_str!("../../data/seed.json");
const TEST_DATASET: &str = include_str!("../../data/seed-test.json");

/// Error loading a question dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        source: serde_json::Error,
    },

    #[error("invalid question in {origin}: {reason}")]
    Invalid { origin: String, reason: String },
}

/// Load questions from a JSON file shaped like `data/seed.json`.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<NewQuestion>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_questions(&json_content, &path.display().to_string())
}

/// The general-purpose dataset bundled with the binary.
pub fn seed_dataset() -> Result<Vec<NewQuestion>, LoadError> {
    parse_questions(SEED_DATASET, "data/seed.json")
}

/// The fixture dataset written by the test reset.
pub fn test_dataset() -> Result<Vec<NewQuestion>, LoadError> {
    parse_questions(TEST_DATASET, "data/seed-test.json")
}

fn parse_questions(json: &str, origin: &str) -> Result<Vec<NewQuestion>, LoadError> {
    let questions: Vec<NewQuestion> =
        serde_json::from_str(json).map_err(|source| LoadError::Parse {
            origin: origin.to_string(),
            source,
        })?;

    for question in &questions {
        question.validate().map_err(|reason| LoadError::Invalid {
            origin: origin.to_string(),
            reason,
        })?;
    }

    Ok(questions)
}
