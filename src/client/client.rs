//! Interactive terminal client.

use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;

use crate::app::App;
use crate::config::Config;
use crate::terminal::TerminalGuard;
use crate::ui;

use super::session::QuizSession;
use super::source::{ClientError, DataSource, Source};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Play against the source selected by `config` (`QUIZ_MOCK` or
/// `QUIZ_API_BASE`).
pub async fn run(config: &Config) -> Result<(), ClientError> {
    let source = Source::from_config(config)?;
    let mock = source.is_mock();
    info!(mock, "Starting quiz client");

    run_with(source, mock).await
}

pub async fn run_with<S: DataSource>(source: S, mock: bool) -> Result<(), ClientError> {
    let mut app = App::new(QuizSession::new(source), mock);
    let mut terminal = TerminalGuard::enter()?;

    terminal.draw(|frame| ui::render(frame, &app))?;
    app.load_next().await;

    loop {
        if app.should_quit {
            break;
        }

        app.tick().await;
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Poll so pending auto-advances still fire without input.
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if app.handle_key(key.code).await {
                    break;
                }
            }
        }
    }

    Ok(())
}
