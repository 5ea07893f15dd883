//! ScoutLab dashboard: four-panel terminal interface.
//!
//! Panels:
//! 1. Teams: standings by season and competition
//! 2. Players: G-League targets with filters and export
//! 3. Profile: radar, advanced metrics, history, comparison
//! 4. Help: key bindings and glossary

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use scoutlab_tui::app::AppState;
use scoutlab_tui::worker::{self, WorkerCommand};
use scoutlab_tui::{input, persistence, ui, DashboardConfig, GoldTables};

#[derive(Parser)]
#[command(name = "scoutlab-dashboard", about = "ScoutLab terminal dashboard")]
struct Args {
    /// Warehouse directory. Overrides the pipeline config.
    #[arg(long, env = "SCOUTLAB_WAREHOUSE")]
    warehouse: Option<PathBuf>,

    /// Pipeline config file. Missing file means defaults.
    #[arg(long, env = "SCOUTLAB_CONFIG", default_value = "scoutlab.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = DashboardConfig::resolve(&args.config, args.warehouse)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    init_logging(&config);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let persisted = persistence::load(&config.state_path);

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx).context("failed to spawn worker")?;

    let tables = GoldTables::load(config.warehouse_dir());
    let state_path = config.state_path.clone();
    let mut app = AppState::new(config, tables, cmd_tx.clone(), resp_rx);
    persistence::apply(&mut app, persisted);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        warn!(error = %e, "failed to save preferences");
    }

    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_worker_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

/// Log to a file; the terminal belongs to the UI. Logging is skipped if the
/// file cannot be opened.
fn init_logging(config: &DashboardConfig) {
    let path = &config.log_path;
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = File::options().create(true).append(true).open(path) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    info!(warehouse = %config.warehouse_dir().display(), "dashboard started");
}
