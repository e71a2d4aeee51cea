use rusqlite::Connection;
use tracing::debug;

pub const SCHEMA_VERSION: i32 = 1;

// At most one correct option per question is enforced by the partial
// unique index.
const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS questions (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        stem        TEXT NOT NULL,
        explanation TEXT,
        tags        TEXT,
        created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_questions_stem ON questions(stem);

    CREATE TABLE IF NOT EXISTS options (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        question_id INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
        text        TEXT NOT NULL,
        is_correct  INTEGER NOT NULL DEFAULT 0 CHECK (is_correct IN (0, 1))
    );

    CREATE INDEX IF NOT EXISTS idx_options_question ON options(question_id);

    CREATE UNIQUE INDEX IF NOT EXISTS idx_options_one_correct
        ON options(question_id) WHERE is_correct = 1;

    CREATE TABLE IF NOT EXISTS answer_attempts (
        id                 INTEGER PRIMARY KEY AUTOINCREMENT,
        question_id        INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
        selected_option_id INTEGER NOT NULL REFERENCES options(id) ON DELETE CASCADE,
        correct            INTEGER NOT NULL,
        elapsed_ms         INTEGER,
        created_at         TEXT NOT NULL
    );
";

pub fn bootstrap(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)?;

    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        debug!("Schema upgraded from version {version} to {SCHEMA_VERSION}");
    }

    Ok(())
}
