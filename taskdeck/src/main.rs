//! `TaskDeck` — terminal kanban board and contact book.
//!
//! Launches the TUI and connects to a hub for shared task and contact
//! data. Configuration via CLI flags, environment variables, or config
//! file (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Connect to the default hub on localhost
//! cargo run --bin taskdeck
//!
//! # Connect to a specific hub
//! cargo run --bin taskdeck -- --hub-url ws://hub.example.com:7420/ws
//!
//! # Or via environment variable
//! TASKDECK_HUB_URL=ws://hub.example.com:7420/ws cargo run
//! ```

use std::io;
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::app::App;
use taskdeck::config::{CliArgs, ClientConfig};
use taskdeck::net::{self, StoreCommand, StoreEvent};
use taskdeck::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(hub_url = %config.hub_url, "taskdeck starting");

    // Connect before taking over the terminal, so connection errors are
    // printed normally.
    let (cmd_tx, evt_rx) = match net::spawn_sync(config.to_sync_config()).await {
        Ok(handles) => handles,
        Err(e) => {
            eprintln!("Could not connect to hub at {}: {e}", config.hub_url);
            return Ok(());
        }
    };

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, cmd_tx, evt_rx, &config).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    tracing::info!("taskdeck exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the
/// terminal). Returns a [`WorkerGuard`] that must be held until shutdown
/// to ensure all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cmd_tx: mpsc::Sender<StoreCommand>,
    mut evt_rx: mpsc::Receiver<StoreEvent>,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::from_config(config);

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending store events (non-blocking).
        let now = Instant::now();
        while let Ok(store_event) = evt_rx.try_recv() {
            app.apply_event(store_event, now);
        }

        // Step 3: Apply due dialog transitions and expire notifications.
        app.tick(now);

        // Step 4: Poll for terminal input events.
        if event::poll(config.poll_timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    // handle_key_event returns Some(StoreCommand) when the
                    // action needs the hub (mutations, refreshes).
                    if let Some(cmd) = app.handle_key_event(key, Instant::now()) {
                        dispatch(&mut app, &cmd_tx, cmd);
                    }
                }
                Event::Mouse(mouse) => {
                    app.handle_mouse(&mouse, ui::menu_area(terminal.get_frame().area()));
                }
                _ => {}
            }
        }

        if app.should_quit {
            // Send shutdown command to the sync tasks.
            let _ = cmd_tx.try_send(StoreCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Hand a command to the sync layer, surfacing backpressure in the UI.
fn dispatch(app: &mut App, cmd_tx: &mpsc::Sender<StoreCommand>, cmd: StoreCommand) {
    match cmd_tx.try_send(cmd) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(_)) => {
            app.notify("Hub busy, try again", Instant::now());
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            app.notify("Connection to hub lost", Instant::now());
        }
    }
}
