use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use remote_connect_four::config::AppConfig;
use remote_connect_four::controller::{probe_health, Connectivity, TurnController};
use remote_connect_four::oracle::{HttpOracle, MoveOracle, RandomOracle};
use remote_connect_four::stats::JsonFileTallyStore;
use remote_connect_four::ui::App;

/// Play Connect Four against a remote model.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four against a remote move oracle")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Opponent variant to play against (e.g. cnn, transformer)
    #[arg(long)]
    variant: Option<String>,

    /// Override the oracle API base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Play against the built-in random oracle instead of the API
    #[arg(long)]
    offline: bool,

    /// Override where tallies are stored
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Probe the oracle once, print whether it is reachable, and exit
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    initialize_logging(cli.log_file.as_deref(), cli.log_level)?;

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(variant) = cli.variant {
        config.oracle.variant = variant;
    }
    if let Some(base_url) = cli.api_base {
        config.oracle.base_url = base_url;
    }
    if cli.offline {
        config.oracle.offline = true;
    }
    if let Some(path) = cli.stats {
        config.stats.path = path;
    }
    config.validate().context("invalid configuration")?;

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;

    let oracle: Arc<dyn MoveOracle> = if config.oracle.offline {
        Arc::new(RandomOracle::new())
    } else {
        Arc::new(HttpOracle::new(config.oracle.http()).context("building HTTP client")?)
    };
    info!(oracle = oracle.name(), variant = %config.oracle.variant, "oracle ready");

    if cli.check {
        let reachable = runtime.block_on(probe_health(oracle.as_ref()));
        let connectivity = if reachable {
            Connectivity::Connected
        } else {
            Connectivity::Unreachable
        };
        println!("{}", connectivity.message());
        return Ok(());
    }

    let store = JsonFileTallyStore::new(&config.stats.path);
    let controller = TurnController::new(config.board, config.oracle.variant.clone(), store);
    let mut app = App::new(
        controller,
        oracle,
        runtime.handle().clone(),
        config.oracle.move_delay(),
    );

    run_tui(&mut app).context("terminal UI failed")
}

fn initialize_logging(log_file: Option<&Path>, level: LevelFilter) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;

    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();
    Ok(())
}

fn run_tui(app: &mut App<JsonFileTallyStore>) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
