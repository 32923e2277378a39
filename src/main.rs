use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use taskboard::{
    app::App,
    cli::{self, Cli, Command},
    config::Config,
    notify::{StderrNotifier, Toasts},
    storage::{self, FileStore, Persist},
    ui, KanbanBoard,
};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &Config) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    // Ignore the error if a global subscriber is already set.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);

    if command == Command::Init {
        if Config::init(&cli.config)? {
            println!("Wrote default config to {}", cli.config.display());
        } else {
            println!("{} already exists.", cli.config.display());
        }
        return Ok(());
    }

    let mut config = Config::load(&cli.config)?;
    if let Some(storage) = cli.storage {
        config.storage_path = storage;
    }
    init_logging(&config)?;
    tracing::info!(storage = %config.storage_path.display(), "starting taskboard");

    let file_store = FileStore::new(&config.storage_path);
    let mut store = KanbanBoard::new(storage::load_board(&file_store));
    store.subscribe(Persist::new(file_store));

    if command != Command::Tui {
        cli::run(&command, &mut store, &mut StderrNotifier, &mut io::stdout())?;
        return Ok(());
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let toasts = Toasts::new(config.toast_ttl());
    let mut app = App::new(store, toasts);
    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("{:?}", err);
    }
    Ok(())
}
