//! Process configuration.
//!
//! Everything the server, the seeding commands and the terminal client need
//! from the environment is read here, once, into a [`Config`] that is then
//! passed around explicitly.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::error::{QuizError, QuizResult};

const DEFAULT_APP_ENV: &str = "development";
const DEFAULT_DATABASE_NAME: &str = "quiz_dev";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173,http://localhost:4173";
const DEFAULT_API_BASE: &str = "http://localhost:3000/api";
const CONFIG_FILE: &str = "quiz.toml";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `APP_ENV`: development, test or production.
    pub app_env: String,
    /// `DATABASE_URL`: `sqlite://<path>` or a bare file path.
    pub database_url: Option<String>,
    /// `DATABASE_DIR`: where `<DATABASE_NAME>.db` lives when no URL is set.
    pub database_dir: PathBuf,
    /// `DATABASE_NAME`
    pub database_name: Option<String>,
    /// `ENABLE_TEST_ENDPOINT`: only the exact value `true` enables it.
    #[serde(deserialize_with = "exact_true")]
    pub enable_test_endpoint: bool,
    /// `TEST_RESET_SECRET`
    pub test_reset_secret: Option<String>,
    /// `FRONTEND_ORIGIN`, comma separated.
    pub frontend_origin: String,
    /// `PORT`
    pub port: u16,
    /// `RECORD_ATTEMPTS`
    pub record_attempts: bool,
    /// `QUIZ_ALLOW_PROD_SEED`: only the exact value `true` allows it.
    #[serde(deserialize_with = "exact_true")]
    pub quiz_allow_prod_seed: bool,
    /// `QUIZ_MOCK`
    pub quiz_mock: bool,
    /// `QUIZ_API_BASE`
    pub quiz_api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_env: DEFAULT_APP_ENV.to_string(),
            database_url: None,
            database_dir: PathBuf::from("."),
            database_name: None,
            enable_test_endpoint: false,
            test_reset_secret: None,
            frontend_origin: DEFAULT_FRONTEND_ORIGINS.to_string(),
            port: DEFAULT_PORT,
            record_attempts: false,
            quiz_allow_prod_seed: false,
            quiz_mock: false,
            quiz_api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Config {
    /// Load `.env.<APP_ENV>.local`, then `.env`, then read the environment.
    ///
    /// Variables already present in the process win over both files, and
    /// the local file wins over `.env`. An optional `quiz.toml` in the
    /// working directory supplies values the environment does not set.
    pub fn load() -> QuizResult<Self> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_APP_ENV.to_string());

        let local = format!(".env.{app_env}.local");
        for file in [local.as_str(), ".env"] {
            match dotenvy::from_filename(file) {
                Ok(path) => info!("Loaded environment from {}", path.display()),
                Err(e) if e.not_found() => debug!("{file} not present"),
                Err(e) => {
                    return Err(QuizError::Misconfigured(format!("failed to read {file}: {e}")));
                }
            }
        }

        let mut builder = config::Config::builder();
        if Path::new(CONFIG_FILE).exists() {
            builder = builder.add_source(config::File::with_name(CONFIG_FILE));
        }
        builder = builder.add_source(config::Environment::default());

        Self::build(builder)
    }

    /// Build a config from an explicit variable map instead of the process
    /// environment. Keys use the environment spelling (`DATABASE_URL`).
    pub fn from_env_map<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> QuizResult<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let builder =
            config::Config::builder().add_source(config::Environment::default().source(Some(map)));

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> QuizResult<Self> {
        builder
            .build()
            .and_then(|c| c.try_deserialize::<Config>())
            .map_err(|e| QuizError::Misconfigured(format!("invalid configuration: {e}")))
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// Where the SQLite file lives. `DATABASE_URL` wins over
    /// `DATABASE_DIR`/`DATABASE_NAME`.
    pub fn database_path(&self) -> PathBuf {
        match self.database_url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(url) => path_from_url(url),
            None => self.database_dir.join(format!("{}.db", self.database_name())),
        }
    }

    /// The logical database name: `DATABASE_NAME` if set, otherwise the file
    /// stem of the database URL.
    pub fn database_name(&self) -> String {
        if let Some(name) = self.database_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }

        self.database_url
            .as_deref()
            .map(path_from_url)
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string())
    }

    /// Configured reset secret, treating an empty value as unset.
    pub fn reset_secret(&self) -> Option<&str> {
        self.test_reset_secret.as_deref().filter(|s| !s.is_empty())
    }

    pub fn frontend_origins(&self) -> Vec<String> {
        self.frontend_origin
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Guard flags in front of destructive operations. Anything other than the
/// literal `true` (or a boolean `true` from `quiz.toml`) reads as off, so
/// `1`, `yes` or `TRUE` neither enable the guard nor fail the load.
fn exact_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Text(text) => text == "true",
        Flag::Other(_) => false,
    })
}

fn path_from_url(url: &str) -> PathBuf {
    let url = url.trim();
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    let rest = rest.split('?').next().unwrap_or(rest);
    PathBuf::from(rest)
}
