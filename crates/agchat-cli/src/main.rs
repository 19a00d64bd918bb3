//! agchat - terminal client for AG-UI agents and plain chat endpoints

mod config;
mod plain;
mod trace;
mod ui;

use agchat_tui::Theme;
use clap::Parser;
use config::{Config, Mode};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// agchat - chat with an AI agent from the terminal
#[derive(Parser, Debug)]
#[command(name = "agchat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Agent endpoint URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Bearer token for the endpoint
    #[arg(long, env = "AGCHAT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat widget to use
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Send a single message and print the reply
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Print every AG-UI event of a one-shot run and check the protocol
    #[arg(long, requires = "command")]
    trace: bool,

    /// Disable TUI mode (use simple stdin/stdout)
    #[arg(long)]
    no_tui: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Color theme (dark, light)
    #[arg(long)]
    theme: Option<String>,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

/// Effective settings after merging flags over the config file
pub struct Settings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub mode: Mode,
    pub theme: Theme,
}

impl Settings {
    fn merge(args: &Args, cfg: &Config) -> Self {
        let theme_name = args.theme.as_deref().or(cfg.theme.as_deref()).unwrap_or("dark");
        let theme = Theme::by_name(theme_name).unwrap_or_else(|| {
            eprintln!("Warning: unknown theme {:?}, using dark", theme_name);
            Theme::dark()
        });

        Self {
            endpoint: args
                .endpoint
                .clone()
                .or_else(|| cfg.endpoint.clone())
                .unwrap_or_default(),
            api_key: args.api_key.clone().or_else(|| cfg.api_key.clone()),
            mode: args.mode.or(cfg.mode).unwrap_or_default(),
            theme,
        }
    }

    /// Text for the status line
    pub fn connection_label(&self) -> String {
        if self.endpoint.trim().is_empty() {
            "No endpoint configured".to_string()
        } else {
            format!("Connected to: {}", self.endpoint)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize config and exit
    if args.init_config {
        match Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let cfg = Config::load();
    let settings = Settings::merge(&args, &cfg);
    let use_tui = args.command.is_none() && !args.no_tui && cfg.tui.unwrap_or(true);

    if args.verbose {
        let log_file = use_tui.then(|| cfg.log_path());
        init_logging(log_file.as_deref())?;
    }
    tracing::debug!(
        endpoint = %settings.endpoint,
        mode = ?settings.mode,
        tui = use_tui,
        "starting agchat"
    );

    if settings.endpoint.trim().is_empty() {
        eprintln!("Warning: no endpoint configured; messages will not be sent");
        eprintln!("Pass --endpoint URL or add it to the config file: agchat --init-config");
    }

    // Non-interactive mode
    if let Some(command) = args.command {
        return plain::run_command(&settings, &command, args.trace).await;
    }

    if use_tui {
        return ui::run_tui(&settings).await;
    }

    plain::run_interactive(&settings).await
}

/// Install the tracing subscriber; a file keeps logs off the TUI screen
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agchat=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
