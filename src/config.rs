//! Configuration for the viewer.
//!
//! Layered configuration:
//! - Default values
//! - TOML configuration file (`specview.toml` in the working directory)
//! - Environment variable overrides
//! - CLI argument overrides (applied by the binary)
//!
//! # Environment Variables
//!
//! Environment variables are prefixed with `SPECVIEW_` and use double
//! underscores to separate nested levels:
//! - `SPECVIEW_SERVER__PORT=8080` sets `server.port`
//! - `SPECVIEW_WATCH__EXTENSION=markdown` sets `watch.extension`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "specview.toml";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// File watching settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Port to serve on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address to bind to
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WatchConfig {
    /// File extension recognized as a document (without the dot)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Mailbox capacity of each subscriber channel
    #[serde(default = "default_subscriber_capacity")]
    pub subscriber_capacity: usize,

    /// Buffer size of the raw OS event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default log level for all modules
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module log level overrides
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_port() -> u16 {
    4829
}
fn default_bind() -> String {
    "127.0.0.1".to_string()
}
fn default_extension() -> String {
    "md".to_string()
}
fn default_subscriber_capacity() -> usize {
    10
}
fn default_event_buffer() -> usize {
    100
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            subscriber_capacity: default_subscriber_capacity(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::figment(Toml::file(CONFIG_FILE)).extract().map_err(Box::new)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(Toml::file(path.as_ref())).extract().map_err(Box::new)
    }

    fn figment(file: figment::providers::Data<Toml>) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(file)
            // Double underscore becomes a dot, single underscore stays
            // part of the field name
            .merge(Env::prefixed("SPECVIEW_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }
}
