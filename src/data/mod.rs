mod loader;

pub use loader::{load_questions_from_json, seed_dataset, test_dataset, LoadError};
