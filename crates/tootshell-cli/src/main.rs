//! tootshell CLI: Command-line interface for the tootshell timeline shell

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tootshell_engine::{
    select_layout, BackgroundMessage, LayoutPreference, RouteOutcome, RouteTable, ShellConfig,
    StateSnapshot,
};
use tracing_subscriber::EnvFilter;

/// Responsive multi-column shell for a social timeline, in the terminal
#[derive(Parser)]
#[command(name = "tootshell")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui {
        /// Initial application state as JSON
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Write the default settings file
    Init,

    /// Print the effective settings
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the layout chosen for a viewport width
    Layout {
        /// Viewport width in pixels
        #[arg(long)]
        width: u32,

        /// Layout preference: single, multiple or auto
        #[arg(long, default_value = "auto")]
        preference: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the pane a path routes to
    Route {
        /// Location path, e.g. /timelines/home
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interpret a background channel payload
    Message {
        /// JSON payload, e.g. '{"type":"navigate","path":"/notifications"}'
        payload: String,
    },
}

const TOOTSHELL_DIR: &str = ".tootshell";
const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "tootshell.log";
const LOG_ENV: &str = "TOOTSHELL_LOG";

fn main() {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(|| Path::new(TOOTSHELL_DIR).join(CONFIG_FILE));

    match cli.command {
        None => cmd_tui(&config_path, None),
        Some(Commands::Tui { state }) => cmd_tui(&config_path, state.as_deref()),
        Some(Commands::Init) => cmd_init(&config_path),
        Some(Commands::Config { json }) => cmd_config(&config_path, json),
        Some(Commands::Layout {
            width,
            preference,
            json,
        }) => cmd_layout(width, &preference, json),
        Some(Commands::Route { path, json }) => cmd_route(&path, json),
        Some(Commands::Message { payload }) => cmd_message(&payload),
    }
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

/// Send logs to a file; the terminal belongs to the TUI.
fn init_logging(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(path: &Path) -> ShellConfig {
    ShellConfig::load(path).unwrap_or_else(|e| fail(e))
}

fn cmd_tui(config_path: &Path, state: Option<&Path>) {
    let log_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new(TOOTSHELL_DIR));
    if let Err(e) = init_logging(log_dir) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let config = load_config(config_path);
    let snapshot = match state {
        Some(path) => StateSnapshot::load(path).unwrap_or_else(|e| fail(e)),
        None => StateSnapshot::from_config(&config),
    };

    tracing::info!(config = %config_path.display(), "Starting TUI");

    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| fail(e));
    match rt.block_on(tootshell_tui::run_tui(config.clone(), snapshot)) {
        Ok(updated) => {
            if updated != config {
                if let Err(e) = updated.save(config_path) {
                    fail(e);
                }
                tracing::info!("Settings saved");
            }
        }
        Err(e) => fail(e),
    }
}

fn cmd_init(config_path: &Path) {
    if config_path.exists() {
        println!("{} already exists", config_path.display());
        return;
    }

    if let Err(e) = ShellConfig::default().save(config_path) {
        fail(e);
    }
    println!("Wrote {}", config_path.display());
}

fn cmd_config(config_path: &Path, json: bool) {
    let config = load_config(config_path);

    if json {
        match serde_json::to_string_pretty(&config) {
            Ok(text) => println!("{text}"),
            Err(e) => fail(e),
        }
        return;
    }

    println!("Settings ({})", config_path.display());
    println!("  layout:              {}", config.layout);
    println!("  stretch:             {}", config.stretch);
    println!("  navbar under:        {}", config.navbar_under);
    println!("  system font:         {}", config.system_font_ui);
    println!("  notifications badge: {}", config.notifications_badge);
    println!("  resize debounce:     {} ms", config.resize_debounce_ms);
}

fn cmd_layout(width: u32, preference: &str, json: bool) {
    let preference = LayoutPreference::parse_lossy(preference);
    let mode = select_layout(width, preference);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "width": width,
                "preference": preference.as_str(),
                "mode": format!("{mode:?}"),
                "class": mode.class_name(),
                "single_column": tootshell_engine::is_single_column(width, preference),
            })
        );
        return;
    }

    println!("{width}px, {preference} -> {mode:?} ({})", mode.class_name());
}

fn cmd_route(path: &str, json: bool) {
    let routes = RouteTable::default();
    let outcome = routes.resolve(path);
    let matched = routes.route(path);

    if json {
        let redirect = match outcome {
            RouteOutcome::Redirect(to) => Some(to),
            RouteOutcome::Render(_) => None,
        };
        println!(
            "{}",
            serde_json::json!({
                "path": path,
                "redirect": redirect,
                "pane": format!("{:?}", matched.pane),
                "title": matched.pane.title(),
                "params": matched.params,
            })
        );
        return;
    }

    if let RouteOutcome::Redirect(to) = outcome {
        println!("{path} redirects to {to}");
    }
    println!("{} ({:?})", matched.pane.title(), matched.pane);
    for (name, value) in &matched.params {
        println!("  {name} = {value}");
    }
}

fn cmd_message(payload: &str) {
    match BackgroundMessage::parse(payload) {
        Ok(BackgroundMessage::Navigate(path)) => {
            let pane = RouteTable::default().route(&path).pane;
            println!("navigate {path} -> {}", pane.title());
        }
        Ok(BackgroundMessage::Unknown(kind)) => {
            println!("ignored: unknown message type '{kind}'");
        }
        Err(e) => fail(e),
    }
}
