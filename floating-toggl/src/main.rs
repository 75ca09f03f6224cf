mod cli;
mod config;
mod credential_store;
mod logging;
mod presentation;
mod runtime;
mod suggestions;
mod ui;
mod view_model;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;

use cli::{Cli, Commands};
use config::FloatingConfig;
use credential_store::{CredentialStore, FileCredentialStore};
use presentation::UiState;
use runtime::{run_app, TimeTrackingApi, TogglApi};
use view_model::ViewModel;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let config = FloatingConfig::load()?;
            let _log_guard = logging::enable_logging(&credential_store::root_path()?.join("logs"))
                .context("Failed to set up logging")?;
            run_tui(&config).await
        }
        Commands::SetToken { token } => {
            let token = token.trim();
            if token.is_empty() {
                anyhow::bail!("Token must not be empty");
            }
            let mut store = FileCredentialStore::in_config_dir()?;
            store.set(token)?;
            println!("API token saved to {}", store.path().display());
            Ok(())
        }
        Commands::Logout => {
            let mut store = FileCredentialStore::in_config_dir()?;
            store.delete()?;
            println!("API token removed.");
            Ok(())
        }
        Commands::ConfigPath => {
            let path = FloatingConfig::ensure_exists()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

async fn run_tui(config: &FloatingConfig) -> Result<()> {
    let store = FileCredentialStore::in_config_dir()?;
    let mut vm = ViewModel::new(Box::new(store), config.debounce());
    let mut ui_state = UiState::new();
    let api: Arc<dyn TimeTrackingApi> = Arc::new(TogglApi::new(config.api_url.clone()));

    tracing::info!(api_url = %config.api_url, "starting floating-toggl");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(
        &mut terminal,
        &mut vm,
        &mut ui_state,
        api,
        config.refresh_interval(),
    )
    .await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = ?err, "event loop failed");
    }
    res
}
