//! Family TUI - Terminal User Interface for congregation family records
//!
//! A Ratatui-based TUI for browsing families and editing a family's
//! household data through the family API.
//!
//! Usage: `family-tui [FAMILY_ID]`. With an identifier the edit form for that
//! family opens directly; without one the family list is shown.

mod api;
mod app;
mod config;
mod controller;
mod platform;
mod state;
mod ui;

use anyhow::{Context, Result};
use api::ApiClient;
use app::App;
use config::TuiConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Event poll interval; also bounds how late a finished fetch is shown
const POLL_INTERVAL: Duration = Duration::from_millis(50);

const LOG_FILE_NAME: &str = "family-tui.log";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = TuiConfig::load().context("Failed to load configuration")?;
    let address = config.api_address();
    let client = ApiClient::new(&address)?;
    tracing::info!("Using family API at {}", client.base_url());

    let family_id = std::env::args().nth(1);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let mut app = App::new(Arc::new(client), config, address);
    app.start(family_id);
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

/// Log to a file in the data directory. The terminal belongs to the UI, so
/// when no file can be opened logging stays off.
fn init_logging() {
    let Some(file) = TuiConfig::log_dir().and_then(|dir| open_log_file(&dir)) else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "family_tui=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
}

fn open_log_file(dir: &Path) -> Option<File> {
    fs::create_dir_all(dir).ok()?;
    File::create(dir.join(LOG_FILE_NAME)).ok()
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Expire toasts and apply finished fetches
        app.tick();

        // Draw the UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Handle crossterm events
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                // Global quit: Ctrl+C
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                // Handle key event
                app.handle_key(key).await?;
            }
        }

        // Check if app wants to quit
        if app.should_quit() {
            return Ok(());
        }
    }
}
