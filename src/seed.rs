//! Seeding and test-database reset.
//!
//! Every entry point refuses to touch a production database unless
//! `QUIZ_ALLOW_PROD_SEED=true`.

use rusqlite::Connection;
use tracing::info;

use crate::config::Config;
use crate::data::{seed_dataset, test_dataset};
use crate::error::{QuizError, QuizResult};
use crate::models::{NewChoice, NewQuestion};
use crate::store::{self, Store};

pub const BASE_QUESTION_STEM: &str = "Hello World - 基础题";

/// What a seeding run wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub updated: usize,
}

impl SeedReport {
    fn merge(self, other: SeedReport) -> SeedReport {
        SeedReport {
            inserted: self.inserted + other.inserted,
            updated: self.updated + other.updated,
        }
    }
}

/// Present in every environment, including production.
pub fn base_question() -> NewQuestion {
    NewQuestion {
        stem: BASE_QUESTION_STEM.to_string(),
        explanation: Some("这是一个基础题目，所有环境都会包含这条数据。".to_string()),
        tags: Some(vec!["基础".to_string()]),
        options: vec![
            NewChoice {
                text: "Hello".to_string(),
                is_correct: false,
            },
            NewChoice {
                text: "World".to_string(),
                is_correct: true,
            },
        ],
    }
}

pub fn ensure_not_prod(config: &Config) -> QuizResult<()> {
    let looks_like_prod = config.is_production() || config.database_name().contains("prod");
    if looks_like_prod && !config.quiz_allow_prod_seed {
        return Err(QuizError::Forbidden(
            "Refusing to run seed/reset against production database".to_string(),
        ));
    }
    Ok(())
}

fn seed_system_on(conn: &Connection) -> QuizResult<SeedReport> {
    if store::find_question_id_by_stem(conn, BASE_QUESTION_STEM)?.is_some() {
        info!("Base question already exists");
        return Ok(SeedReport::default());
    }

    store::insert_question(conn, &base_question())?;
    info!("Created base question");
    Ok(SeedReport {
        inserted: 1,
        updated: 0,
    })
}

/// Insert or overwrite each question, matching existing rows by stem.
fn upsert_on(conn: &Connection, questions: &[NewQuestion]) -> QuizResult<SeedReport> {
    let mut report = SeedReport::default();

    for question in questions {
        match store::find_question_id_by_stem(conn, &question.stem)? {
            Some(id) => {
                store::replace_question(conn, id, question)?;
                report.updated += 1;
                info!(question_id = id, "Updated test question {}", question.stem);
            }
            None => {
                let id = store::insert_question(conn, question)?;
                report.inserted += 1;
                info!(question_id = id, "Inserted test question {}", question.stem);
            }
        }
    }

    Ok(report)
}

/// Idempotently make sure the base question exists.
pub fn seed_system(store: &Store, config: &Config) -> QuizResult<SeedReport> {
    ensure_not_prod(config)?;

    let mut conn = store.conn()?;
    let tx = conn.transaction()?;
    let report = seed_system_on(&tx)?;
    tx.commit()?;

    Ok(report)
}

/// Upsert the bundled test fixture.
pub fn seed_test(store: &Store, config: &Config) -> QuizResult<SeedReport> {
    ensure_not_prod(config)?;
    let fixture = test_dataset()?;

    let mut conn = store.conn()?;
    let tx = conn.transaction()?;
    let report = upsert_on(&tx, &fixture)?;
    tx.commit()?;

    Ok(report)
}

/// Wipe attempts, options and questions, then write the base question and
/// the test fixture. Runs as one transaction, so a failure leaves the old
/// data in place.
pub fn reset_test(store: &Store, config: &Config) -> QuizResult<SeedReport> {
    ensure_not_prod(config)?;
    let fixture = test_dataset()?;
    info!("Wiping and reseeding test data in {}", store.path().display());

    let mut conn = store.conn()?;
    let tx = conn.transaction()?;
    store::delete_all(&tx)?;
    let report = seed_system_on(&tx)?.merge(upsert_on(&tx, &fixture)?);
    tx.commit()?;

    info!(inserted = report.inserted, "Test reset finished");
    Ok(report)
}

/// Plain insert of every question; duplicates by stem are not detected.
pub fn import(store: &Store, config: &Config, questions: &[NewQuestion]) -> QuizResult<SeedReport> {
    ensure_not_prod(config)?;

    let mut conn = store.conn()?;
    let tx = conn.transaction()?;
    for question in questions {
        let id = store::insert_question(&tx, question)?;
        info!(question_id = id, "Inserted question");
    }
    tx.commit()?;

    Ok(SeedReport {
        inserted: questions.len(),
        updated: 0,
    })
}

/// Insert the bundled general dataset.
pub fn import_bundled(store: &Store, config: &Config) -> QuizResult<SeedReport> {
    import(store, config, &seed_dataset()?)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::store::test_support::temp_store;

    fn test_config() -> Config {
        Config::from_env_map([("APP_ENV", "test"), ("DATABASE_NAME", "quiz_test")]).unwrap()
    }

    fn question_count(store: &Store) -> i64 {
        store::count_questions(&store.conn().unwrap()).unwrap()
    }

    #[test]
    fn test_seed_system_is_idempotent() {
        let (store, _dir) = temp_store("quiz_test");
        let config = test_config();

        assert_eq!(seed_system(&store, &config).unwrap().inserted, 1);
        assert_eq!(seed_system(&store, &config).unwrap().inserted, 0);
        assert_eq!(question_count(&store), 1);
    }

    #[test]
    fn test_seed_test_updates_existing_rows() {
        let (store, _dir) = temp_store("quiz_test");
        let config = test_config();
        let fixture_len = test_dataset().unwrap().len();

        let first = seed_test(&store, &config).unwrap();
        assert_eq!(first.inserted, fixture_len);

        let second = seed_test(&store, &config).unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.updated, fixture_len);
        assert_eq!(question_count(&store), fixture_len as i64);
    }

    #[test]
    fn test_reset_is_stable() {
        let (store, _dir) = temp_store("quiz_test");
        let config = test_config();
        import_bundled(&store, &config).unwrap();
        let expected = test_dataset().unwrap().len() as i64 + 1;

        reset_test(&store, &config).unwrap();
        assert_eq!(question_count(&store), expected);

        reset_test(&store, &config).unwrap();
        assert_eq!(question_count(&store), expected);

        let conn = store.conn().unwrap();
        assert!(
            store::find_question_id_by_stem(&conn, BASE_QUESTION_STEM)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn test_production_is_refused() {
        let (store, _dir) = temp_store("quiz");

        let config = Config::from_env_map([("APP_ENV", "production")]).unwrap();
        assert_matches!(seed_system(&store, &config), Err(QuizError::Forbidden(_)));

        let config = Config::from_env_map([("DATABASE_NAME", "quiz_prod")]).unwrap();
        assert_matches!(reset_test(&store, &config), Err(QuizError::Forbidden(_)));
        assert_eq!(question_count(&store), 0);
    }

    #[test]
    fn test_production_allowed_with_override() {
        let (store, _dir) = temp_store("quiz");
        let config = Config::from_env_map([
            ("APP_ENV", "production"),
            ("QUIZ_ALLOW_PROD_SEED", "true"),
        ])
        .unwrap();

        assert!(seed_system(&store, &config).is_ok());
    }

    #[test]
    fn test_loose_override_does_not_allow_production() {
        let (store, _dir) = temp_store("quiz");
        let config = Config::from_env_map([
            ("APP_ENV", "production"),
            ("QUIZ_ALLOW_PROD_SEED", "1"),
        ])
        .unwrap();

        assert_matches!(seed_system(&store, &config), Err(QuizError::Forbidden(_)));
        assert_eq!(question_count(&store), 0);
    }

    #[test]
    fn test_import_rolls_back_on_invalid_question() {
        let (store, _dir) = temp_store("quiz_test");
        let config = test_config();

        let mut questions = seed_dataset().unwrap();
        questions.push(NewQuestion {
            stem: "broken".to_string(),
            explanation: None,
            tags: None,
            options: vec![],
        });

        assert_matches!(
            import(&store, &config, &questions),
            Err(QuizError::InvalidQuestion(_))
        );
        assert_eq!(question_count(&store), 0);
    }
}
