mod animations;
mod app;
mod client;
mod render;
mod theme;
mod worker;

use anyhow::Context;
use app::App;
use clap::Parser;
use client::{HttpPuzzleService, DEFAULT_API_URL};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use sudoku_board::{ControllerConfig, Difficulty};
use theme::ThemeName;
use tracing::info;
use tracing_subscriber::EnvFilter;
use worker::ServiceWorker;

const DEFAULT_FILTER: &str = "sudoku_board=info,sudoku_tui=info";

/// Interactive Sudoku board backed by a remote puzzle service
#[derive(Debug, Parser)]
#[command(name = "sudoku-board", version, about)]
struct Cli {
    /// Base URL of the puzzle API
    #[arg(long, env = "SUDOKU_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Difficulty for new puzzles
    #[arg(long, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Color theme
    #[arg(long, value_enum, default_value_t = ThemeName::Dark)]
    theme: ThemeName,

    /// Solve without replaying the solver's steps
    #[arg(long)]
    no_steps: bool,

    /// Upload this image on startup
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Where to write logs (stdout belongs to the board)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            trace_steps: !self.no_steps,
            ..ControllerConfig::default()
        }
    }

    fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("sudoku-board.log")
        })
    }
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Raw mode, alternate screen and mouse capture for as long as it lives
struct TerminalSession {
    stdout: io::Stdout,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.stdout, LeaveAlternateScreen, DisableMouseCapture);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_path())?;

    let service = HttpPuzzleService::new(&cli.api_url).context("building HTTP client")?;
    info!(api_url = %service.base_url(), difficulty = %cli.difficulty, "starting");

    let worker = ServiceWorker::new(Arc::new(service));
    let mut app = App::new(worker, cli.controller_config(), cli.difficulty, cli.theme);
    if let Some(image) = cli.image.clone() {
        app.upload(image, Instant::now());
    }

    let mut session = TerminalSession::enter().context("setting up terminal")?;
    let result = run_app(&mut session.stdout, &mut app);
    drop(session);

    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal loop failed");
    }
    info!("exiting");
    result.map_err(Into::into)
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    loop {
        let now = Instant::now();
        app.tick(now);

        render::render(stdout, app, now)?;
        stdout.flush()?;

        // Wake for input or for the next scheduled tick, whichever is first
        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Handle Ctrl+C
                    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                        break;
                    }

                    match app.handle_key(key, Instant::now()) {
                        app::AppAction::Continue => {}
                        app::AppAction::Quit => break,
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}
