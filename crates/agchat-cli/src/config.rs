//! Configuration file support

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which chat widget to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// AG-UI agent with streamed replies
    #[default]
    Streaming,
    /// One POST per turn, whole reply at once
    Simple,
}

/// Configuration for agchat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Agent or chat endpoint URL
    pub endpoint: Option<String>,
    /// Bearer token sent with every request
    pub api_key: Option<String>,
    /// Default widget
    pub mode: Option<Mode>,
    /// Whether to use TUI mode by default
    pub tui: Option<bool>,
    /// Where `--verbose` logs go while the TUI owns the terminal
    pub log_file: Option<String>,
    /// Color theme: dark or light
    pub theme: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("agchat")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("AGCHAT_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from a file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Write the commented example config unless a file already exists
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        Self::init_at(&path)?;
        Ok(path)
    }

    fn init_at(path: &Path) -> std::io::Result<()> {
        if path.exists() {
            return Ok(());
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, example_config())
    }

    /// Default log file next to the config file
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::config_dir().join("agchat.log"))
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# agchat configuration file
# Place at ~/.config/agchat/config.toml (Linux) or set AGCHAT_CONFIG_PATH

# AG-UI agent (streaming) or chat endpoint (simple)
endpoint = "http://localhost:8000/agno-agent"

# Widget to start: streaming or simple
mode = "streaming"

# Whether to use TUI mode by default
# Set to false for line-oriented stdin/stdout mode
tui = true

# Color theme: dark or light
theme = "dark"

# Log file used with --verbose in TUI mode
# log_file = "~/.config/agchat/agchat.log"

# Bearer token (optional - AGCHAT_API_KEY also works)
# api_key = "..."
"#
}
