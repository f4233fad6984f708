//! Configuration file support
//!
//! Settings come from an optional TOML file; command-line flags override it.
//!
//! ```toml
//! [server]
//! ip_address = "0.0.0.0"
//! port = 8080
//! output_directory = "/srv/incoming"
//!
//! [client]
//! server_host = "10.0.0.2"
//!
//! [log]
//! level = "debug"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use crate::transfer::client::ClientConfig;
use crate::transfer::core::CHUNK_SIZE;
use crate::transfer::server;

/// Port used by both ends when nothing else is configured
pub const DEFAULT_PORT: u16 = 8080;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "fxfer.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// File the settings were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
    pub server: ServerSection,
    pub client: ClientSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub ip_address: IpAddr,
    pub port: u16,
    pub output_directory: PathBuf,
    pub buffer_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    pub server_host: String,
    pub server_port: u16,
    pub buffer_size: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// `error`, `warn`, `info`, `debug` or `trace`
    pub level: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            ip_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            output_directory: PathBuf::from("."),
            buffer_size: CHUNK_SIZE,
        }
    }
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: DEFAULT_PORT,
            buffer_size: CHUNK_SIZE,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load `path` if given, else `fxfer.toml` if present, else defaults.
    ///
    /// An explicitly named file must exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Server configuration with command-line overrides applied
    pub fn server_config(
        &self,
        ip: Option<IpAddr>,
        port: Option<u16>,
        dir: Option<PathBuf>,
    ) -> server::Config {
        let section = &self.server;
        server::Config::new(
            ip.unwrap_or(section.ip_address),
            port.unwrap_or(section.port),
            dir.unwrap_or_else(|| section.output_directory.clone()),
        )
        .with_buffer_size(section.buffer_size)
    }

    /// Client configuration with command-line overrides applied
    pub fn client_config(&self, host: Option<String>, port: Option<u16>) -> ClientConfig {
        let section = &self.client;
        ClientConfig::new(
            host.unwrap_or_else(|| section.server_host.clone()),
            port.unwrap_or(section.server_port),
        )
        .with_buffer_size(section.buffer_size)
    }
}
