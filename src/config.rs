//! Layered server configuration.
//!
//! Priority, highest first:
//! 1. CLI arguments
//! 2. Environment variables (through clap `env`)
//! 3. TOML file (`~/.config/gorex/config.toml` or `--config`)
//! 4. Compiled defaults

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::Deserialize;
use std::io;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    server: ServerSection,
    database: DatabaseSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
    bind_addr: Option<String>,
    log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DatabaseSection {
    url: Option<String>,
    pool_size: Option<u32>,
}

/// Command-line arguments for `gorex-server`.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Gorex task management API server")]
pub struct GorexCliArgs {
    /// Address to bind the API server to.
    #[arg(short, long, env = "GOREX_BIND")]
    pub bind: Option<String>,

    /// Path to the config file (default: `~/.config/gorex/config.toml`).
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,

    /// `PostgreSQL` connection URL; the in-memory store is used when unset.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long)]
    pub pool_size: Option<u32>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, env = "GOREX_LOG")]
    pub log_level: Option<String>,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GorexConfig {
    /// Address to bind the server to.
    pub bind_addr: String,
    /// Database URL; `None` selects in-memory storage.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_size: u32,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for GorexConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            database_url: None,
            pool_size: DEFAULT_POOL_SIZE,
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl GorexConfig {
    /// Loads configuration from CLI arguments and the config file.
    ///
    /// A missing default file is treated as empty; a missing explicit
    /// `--config` file is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(cli: &GorexCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, file))
    }

    fn resolve(cli: &GorexCliArgs, file: ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: cli
                .bind
                .clone()
                .or(file.server.bind_addr)
                .unwrap_or(defaults.bind_addr),
            database_url: cli.database_url.clone().or(file.database.url),
            pool_size: cli
                .pool_size
                .or(file.database.pool_size)
                .unwrap_or(defaults.pool_size),
            log_level: cli
                .log_level
                .clone()
                .or(file.server.log_level)
                .unwrap_or(defaults.log_level),
        }
    }
}

fn load_config_file(explicit_path: Option<&Utf8Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = read_file(path)?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(path) = default_config_path() else {
        return Ok(ConfigFile::default());
    };
    match read_file(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(ConfigError::ReadFile { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            Ok(ConfigFile::default())
        }
        Err(err) => Err(err),
    }
}

fn default_config_path() -> Option<Utf8PathBuf> {
    let base = dirs::config_dir()?;
    let utf8 = Utf8PathBuf::from_path_buf(base).ok()?;
    Some(utf8.join("gorex").join("config.toml"))
}

fn read_file(path: &Utf8Path) -> Result<String, ConfigError> {
    let read_error = |source: io::Error| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| read_error(io::Error::from(io::ErrorKind::InvalidInput)))?;
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    dir.read_to_string(file_name).map_err(read_error)
}
