//! Transfer server implementation
//!
//! This module provides the receiving side:
//! - `server`: Listening socket and the accept loop
//! - `session`: Per-connection header decoding and body persistence
//! - `shutdown`: Shutdown flag shared with the signal handler
//! - `config`: Server configuration

mod config;
#[allow(clippy::module_inception)]
mod server;
mod session;
mod shutdown;

use anyhow::Result;

// Public server types
pub use config::Config;
pub use server::{Server, ServerState};
pub use session::{Received, Session, serve_connection};
pub use shutdown::ShutdownSignal;

/// Run the transfer server until `shutdown` is requested
pub fn run(config: Config, shutdown: ShutdownSignal) -> Result<()> {
    log::info!(
        "Starting transfer server on {}:{}",
        config.ip_address,
        config.port
    );
    log::info!("Output directory: {}", config.output_directory.display());

    if !config.output_directory.is_dir() {
        log::error!(
            "Directory does not exist: {}",
            config.output_directory.display()
        );
        return Err(anyhow::anyhow!("Directory does not exist"));
    }

    let server = Server::new(&config, shutdown)?;

    log::info!("Transfer server listening, press Ctrl+C to stop");
    server.listen();
    log::info!("Server shut down gracefully");

    Ok(())
}
