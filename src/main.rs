//! DeBattle - two-player timed debates in the terminal
//!
//! Pick a battle name, open or join a room, ready up and argue.

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use debattle::app::{AppCoordinator, KeyInput, WelcomeForm};
use debattle::config::{default_log_path, Config};
use debattle::network::Collaborators;
use debattle::timer::{Clock, SystemClock};
use debattle::tui::{self, Tui};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How long to wait for a key before advancing the clock
const FRAME: Duration = Duration::from_millis(100);

/// Terminal debate client
#[derive(Parser, Debug)]
#[command(name = "debattle")]
#[command(about = "Two-player timed debates in the terminal")]
#[command(version)]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pre-fill the battle name
    #[arg(short, long)]
    name: Option<String>,

    /// Pre-fill the room code
    #[arg(short, long)]
    room: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log file (defaults to the platform data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = Config::load(args.config.as_deref())?;
    let collaborators = Collaborators::simulated(&config.timings);
    let form = WelcomeForm::prefilled(args.name.as_deref(), args.room.as_deref());
    let mut app = AppCoordinator::with_form(config, collaborators, form);

    tracing::info!("DeBattle starting");

    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let clock = SystemClock::new();
    run(&mut terminal, &mut app, &clock)?;

    tracing::info!("DeBattle exiting");
    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}

fn run(terminal: &mut Tui, app: &mut AppCoordinator, clock: &dyn Clock) -> std::io::Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| tui::render(frame, app))?;

        if event::poll(FRAME)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    if let Some(input) = map_key(key) {
                        app.handle_key(input, clock.now());
                    }
                }
            }
        }

        app.advance(clock.now());
    }
    Ok(())
}

fn map_key(key: KeyEvent) -> Option<KeyInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(KeyInput::Quit),
            KeyCode::Char('r') => Some(KeyInput::ToggleReady),
            KeyCode::Char('t') => Some(KeyInput::ToggleMute),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Tab | KeyCode::BackTab => Some(KeyInput::Tab),
        KeyCode::Esc => Some(KeyInput::Esc),
        _ => None,
    }
}

/// Log to a file so the terminal UI stays clean
fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let path = args.log_file.clone().or_else(default_log_path);
    let file_layer = match path {
        Some(path) => {
            let file = open_log(&path)?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry().with(file_layer).with(filter).init();
    Ok(())
}

fn open_log(path: &Path) -> std::io::Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
