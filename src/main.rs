// networth - terminal dashboard for a personal finance tracking API
// Profits, expenses and net worth drawn as a force-directed graph

mod api;
mod app;
mod graph;
mod money;
mod theme;
mod ui;

use anyhow::{Context, Result};
use api::{ApiClient, TokenStore};
use app::config::Cli;
use app::dispatcher::Dispatcher;
use app::event::{handle_key_event, handle_mouse_event, ClickTracker};
use app::AppState;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Route logs to a file; the terminal belongs to the UI
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_path())?;
    info!(api_url = %cli.api_url, "Starting networth");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("cannot start async runtime")?;

    let tokens = TokenStore::open(cli.token_path()).context("cannot read token file")?;
    let rejected = tokens.clone();
    let client = ApiClient::new(&cli.api_url, cli.http_timeout(), tokens, move || {
        warn!("API rejected the session token");
        if let Err(e) = rejected.clear() {
            warn!(error = %e, "Failed to remove token file");
        }
    })
    .context("cannot build HTTP client")?;
    let dispatcher = Dispatcher::new(runtime.handle().clone(), client);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let mut app = AppState::new(dispatcher);
    let res = run_app(&mut terminal, &mut app, cli.ui_interval());

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    drop(app);
    runtime.shutdown_timeout(Duration::from_millis(500));
    info!("Exited");

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    interval: Duration,
) -> Result<()> {
    let mut clicks = ClickTracker::default();
    loop {
        app.on_tick();
        terminal.draw(|f| ui::draw(f, app))?;

        if !app.running {
            return Ok(());
        }

        if event::poll(interval)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Ctrl-C quits from anywhere, including text fields
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        app.running = false;
                    } else {
                        handle_key_event(app, key.code);
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(app, mouse, &mut clicks, Instant::now()),
                _ => {}
            }
        }
    }
}
