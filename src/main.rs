use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use muxtree::app::{App, Collaborators};
use muxtree::cache::CacheStore;
use muxtree::cli::{format_command_list, Cli, Invocation};
use muxtree::config::Config;
use muxtree::event_loop::run_app;
use muxtree::logging::init_logging;
use muxtree::recency::RecencyStore;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mode = match cli.invocation()? {
        Invocation::ListCommands => {
            print!("{}", format_command_list());
            return Ok(());
        }
        Invocation::Tui(mode) => mode,
    };

    if let Err(err) = init_logging() {
        eprintln!("muxtree: logging disabled: {err:#}");
    }

    // Check if we're in a proper terminal
    if !io::stdin().is_terminal() {
        anyhow::bail!("muxtree must be run in an interactive terminal");
    }

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(modifier) = cli.super_key {
        config.quick_select = modifier;
    }
    let cache = CacheStore::open_default()?;
    let recency = RecencyStore::open_default()?;
    let mut app = App::new(config, mode, cache, recency, Collaborators::system());

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode - are you in a terminal?")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    app.start();
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal (always try to restore even on error)
    let _ = disable_raw_mode();
    let _ = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    );
    let _ = terminal.show_cursor();

    tracing::info!("exiting");
    result
}
