//! chatcat CLI: Terminal chat client for the ChatCat assistant

use chatcat_engine::{ChatWidget, Config, HttpBackend, Resolution, WidgetOptions};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "chatcat=info";

/// Terminal chat client for the ChatCat assistant
#[derive(Parser)]
#[command(name = "chatcat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the config file
    #[arg(long, global = true, env = "CHATCAT_BACKEND_URL")]
    backend_url: Option<String>,

    /// Where the TUI writes its log
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Tui,

    /// Send one message and print the reply
    Send {
        /// Message text; multiple words are joined with spaces
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Check that the backend is up
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(default_config_path);
    let config = match load_config(config_path.as_deref(), cli.backend_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        None | Some(Commands::Tui) => {
            init_file_logging(cli.log_file.or_else(default_log_path));
            cmd_tui(&config)
        }
        Some(Commands::Send { message }) => {
            init_stderr_logging();
            runtime().block_on(cmd_send(&config, &message.join(" ")))
        }
        Some(Commands::Health { json }) => {
            init_stderr_logging();
            runtime().block_on(cmd_health(&config, json))
        }
        Some(Commands::Config { json }) => cmd_config(&config, config_path.as_deref(), json),
    };
    std::process::exit(code);
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().expect("Failed to create tokio runtime")
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chatcat").join("config.json"))
}

fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("chatcat").join("chatcat.log"))
}

/// Load the config file (defaults when absent) and apply overrides.
fn load_config(
    path: Option<&Path>,
    backend_url: Option<&str>,
) -> Result<Config, chatcat_engine::ConfigError> {
    let mut config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(url) = backend_url {
        config.base_url = url.to_string();
    }
    Ok(config)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Log to a file so nothing is written over the TUI.
fn init_file_logging(path: Option<PathBuf>) {
    let Some(path) = path else {
        return;
    };
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            eprintln!("Warning: cannot open log file {}", path.display());
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        eprintln!("Warning: cannot open log file {}", path.display());
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    debug!(path = %path.display(), "file logging initialized");
}

fn cmd_tui(config: &Config) -> i32 {
    let backend = match HttpBackend::from_config(config) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    if let Err(e) = runtime().block_on(chatcat_tui::run_tui(config, backend)) {
        eprintln!("Error: {e}");
        return 1;
    }
    0
}

async fn cmd_send(config: &Config, message: &str) -> i32 {
    let backend = match HttpBackend::from_config(config) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    let mut widget = ChatWidget::new(WidgetOptions::from(config));
    widget.update_draft(message);

    info!(url = %backend.chat_url(), chars = widget.draft().char_count(), "sending message");
    match widget.exchange(&backend).await {
        Ok(Resolution::Replied(turn)) => {
            println!("{}", turn.text());
            0
        }
        Ok(Resolution::Failed(turn)) => {
            eprintln!("{}", turn.text());
            1
        }
        Ok(Resolution::Ignored) => 1,
        Err(reason) => {
            warn!(%reason, "message rejected");
            eprintln!("Error: {reason}");
            2
        }
    }
}

async fn cmd_health(config: &Config, json: bool) -> i32 {
    let backend = match HttpBackend::from_config(config) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    let result = backend.health().await;

    if json {
        let value = match &result {
            Ok(health) => serde_json::json!({
                "url": config.health_url(),
                "healthy": health.is_ok(),
                "status": health.status,
            }),
            Err(e) => serde_json::json!({
                "url": config.health_url(),
                "healthy": false,
                "error": e.to_string(),
            }),
        };
        match serde_json::to_string_pretty(&value) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return 1;
            }
        }
    } else {
        match &result {
            Ok(health) if health.is_ok() => println!("  {} - healthy", config.base_url),
            Ok(health) => println!("  {} - status {:?}", config.base_url, health.status),
            Err(e) => println!("  {} - unreachable: {e}", config.base_url),
        }
    }

    match result {
        Ok(health) if health.is_ok() => 0,
        _ => 1,
    }
}

fn cmd_config(config: &Config, path: Option<&Path>, json: bool) -> i32 {
    if json {
        return match serde_json::to_string_pretty(config) {
            Ok(text) => {
                println!("{text}");
                0
            }
            Err(e) => {
                eprintln!("Error: {e}");
                1
            }
        };
    }

    let source = match path {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("{} (not found, using defaults)", path.display()),
        None => "defaults".to_string(),
    };
    println!("Config: {source}\n");
    println!("  Backend:     {}", config.base_url);
    println!("  Chat URL:    {}", config.chat_url());
    println!("  Health URL:  {}", config.health_url());
    println!("  k_ctx:       {}", config.k_ctx);
    println!("  Draft limit: {} characters", config.max_draft_chars);
    0
}
