use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use quiz_service::{Config, QuizService, Store, client, load_questions_from_json, logging, seed, server};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Play in the terminal
    Play {
        /// Use the built-in offline question instead of the API
        #[arg(long)]
        mock: bool,
        /// API root, e.g. http://localhost:3000/api (overrides QUIZ_API_BASE)
        #[arg(long)]
        api_base: Option<String>,
    },
    /// Seed the database for an environment
    Seed {
        #[arg(value_enum)]
        target: SeedTarget,
    },
    /// Insert questions from a JSON file
    Import {
        /// JSON file to load the questions from
        file: PathBuf,
    },
    /// Print every stored question
    List,
    /// Create the database file and schema
    CreateDb,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SeedTarget {
    Dev,
    Test,
    Prod,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = Config::load().context("Failed to load configuration")?;

    match args.command {
        Command::Serve { port } => {
            logging::init();
            if let Some(port) = port {
                config.port = port;
            }
            server::run(config).await?;
        }
        Command::Play { mock, api_base } => {
            logging::init_for_tui();
            config.quiz_mock |= mock;
            if let Some(base) = api_base {
                config.quiz_api_base = base;
            }
            client::run(&config).await?;
        }
        Command::Seed { target } => {
            logging::init();
            let store = open_store(&config)?;
            let report = match target {
                SeedTarget::Dev => seed::seed_system(&store, &config)?,
                SeedTarget::Test => seed::reset_test(&store, &config)?,
                SeedTarget::Prod => {
                    if !config.quiz_allow_prod_seed {
                        bail!("Refusing to seed production without QUIZ_ALLOW_PROD_SEED=true");
                    }
                    seed::seed_system(&store, &config)?
                }
            };
            info!(
                inserted = report.inserted,
                updated = report.updated,
                "Seed {target:?} finished"
            );
        }
        Command::Import { file } => {
            logging::init();
            let questions = load_questions_from_json(&file)
                .with_context(|| format!("Failed to load questions from {}", file.display()))?;
            let store = open_store(&config)?;
            let report = seed::import(&store, &config, &questions)?;
            info!(inserted = report.inserted, "Imported {}", file.display());
        }
        Command::List => {
            logging::init();
            let service = QuizService::new(open_store(&config)?);
            let questions = service.list_questions().await?;
            if questions.is_empty() {
                println!("No questions found");
            }
            for question in questions {
                println!("{}\t{}", question.id, question.stem);
            }
        }
        Command::CreateDb => {
            logging::init();
            let store = open_store(&config)?;
            println!("Database ready at {}", store.path().display());
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<Store> {
    let path = config.database_path();
    Store::open(&path).with_context(|| format!("Failed to open database {}", path.display()))
}
