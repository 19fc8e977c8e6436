use clap::Parser;
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at: {0}")]
    NotFound(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to deserialize JSON from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown log level '{0}' (expected off, error, warn, info, debug or trace)")]
    LogLevel(String),
}

/// Settings for one server process. Every field has a default, so a config
/// file only needs to name what it changes.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`, if any.
    pub static_dir: Option<PathBuf>,
    /// Seed for the plot jitter; `None` seeds from OS entropy.
    pub jitter_seed: Option<u64>,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: None,
            jitter_seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let display = config_path.display().to_string();
        if !config_path.exists() {
            return Err(ConfigError::NotFound(display));
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse { path: display, source })
    }

    /// Builds the effective config: defaults, then the `--config` file, then explicit flags.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(host) = &cli.host {
            config.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.port = port;
        }
        if let Some(dir) = &cli.static_dir {
            config.static_dir = Some(dir.clone());
        }
        if let Some(seed) = cli.seed {
            config.jitter_seed = Some(seed);
        }
        if let Some(level) = &cli.log_level {
            config.log_level = level.clone();
        }

        // Reject a bad level before anything starts.
        config.level_filter()?;
        Ok(config)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// Command line flags. Anything left unset falls back to the config file, then to the defaults.
#[derive(Parser, Debug, Default)]
#[clap(author, version, about = "Tokenize a sentence, plot its tokens in 3D and predict the next token length", long_about = None)]
pub struct Cli {
    /// JSON file with server settings
    #[clap(long, value_parser)]
    pub config: Option<PathBuf>,
    /// Interface to bind (default 127.0.0.1)
    #[clap(long, value_parser)]
    pub host: Option<String>,
    /// Port to listen on (default 3001)
    #[clap(long, value_parser)]
    pub port: Option<u16>,
    /// Directory of static assets served under /static
    #[clap(long, value_parser)]
    pub static_dir: Option<PathBuf>,
    /// Fixed seed for the random z axis
    #[clap(long, value_parser)]
    pub seed: Option<u64>,
    /// off, error, warn, info, debug or trace (default info)
    #[clap(long, value_parser)]
    pub log_level: Option<String>,
}
