//! Transfer client
//!
//! - `client`: Connection setup and the outgoing session
//! - `config`: Client configuration

#[allow(clippy::module_inception)]
mod client;
mod config;

use anyhow::Result;
use std::path::Path;

pub use client::{Client, ClientSession, connect};
pub use config::ClientConfig;

/// Send `path` to the server described by `config`
pub fn run(config: ClientConfig, path: &Path) -> Result<()> {
    let client = Client::new(config);
    client.send_file(path)?;
    Ok(())
}
