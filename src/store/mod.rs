//! SQLite persistence.
//!
//! The database owns all persistent state. A [`Store`] is a cheap handle
//! around an r2d2 pool; every statement runs in autocommit mode except the
//! multi-step writes in [`crate::seed`], which take an explicit transaction.

mod attempts;
mod questions;
mod schema;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::{QuizError, QuizResult};

pub use attempts::record_attempt;
pub use questions::{
    correct_option, count_questions, delete_all, find_option, find_question,
    find_question_id_by_stem, insert_question, list_summaries, random_questions,
    replace_question,
};
pub use schema::SCHEMA_VERSION;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

const POOL_SIZE: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct Store {
    pool: DbPool,
    path: PathBuf,
}

impl Store {
    /// Open (creating if needed) the database file and make sure the schema
    /// exists.
    pub fn open(path: impl AsRef<Path>) -> QuizResult<Self> {
        let path = path.as_ref().to_path_buf();
        if is_in_memory(&path) {
            return Err(QuizError::Misconfigured(format!(
                "in-memory database {} is not supported; point DATABASE_URL at a file",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(&path).with_init(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")
        });
        let pool = Pool::builder().max_size(POOL_SIZE).build(manager)?;

        let store = Self { pool, path };
        let conn = store.conn()?;
        schema::bootstrap(&conn)?;
        drop(conn);
        info!("Opened database {}", store.path.display());

        Ok(store)
    }

    pub fn conn(&self) -> QuizResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// Every pooled connection to one of these would see its own empty database.
fn is_in_memory(path: &Path) -> bool {
    let raw = path.to_string_lossy();
    raw == ":memory:" || raw.starts_with("file::memory:") || raw.contains("mode=memory")
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use super::Store;

    /// A store in a fresh temporary directory. Keep the `TempDir` alive for
    /// as long as the store is used.
    pub fn temp_store(name: &str) -> (Store, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join(format!("{name}.db"))).unwrap();
        (store, dir)
    }
}
