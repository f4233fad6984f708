use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::net::IpAddr;
use std::path::PathBuf;

use fxfer::config::AppConfig;
use fxfer::logging;
use fxfer::transfer::{client, server};

#[derive(Parser)]
#[command(name = "fxfer")]
#[command(version, about = "Send a single file over TCP")]
struct Cli {
    /// Configuration file (defaults to ./fxfer.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a file to the server
    Send {
        #[arg(help = "Path to file to send")]
        file: PathBuf,

        /// Server host name or IP address
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Receive files, one connection at a time, until terminated
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<IpAddr>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory received files are written into
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    let level = match (cli.verbose, config.log.level.as_deref()) {
        (0, Some(name)) => logging::parse_level(name)
            .with_context(|| format!("Invalid log level in config: {name}"))?,
        (verbose, _) => logging::level_from_verbosity(verbose),
    };
    logging::init(level);

    match &config.source {
        Some(path) => debug!("Using config file {}", path.display()),
        None => debug!("No config file, using defaults"),
    }

    match cli.command {
        Commands::Send { file, host, port } => {
            let client_config = config.client_config(host, port);
            tokio::task::spawn_blocking(move || client::run(client_config, &file)).await??;
        }
        Commands::Serve { bind, port, dir } => {
            let server_config = config.server_config(bind, port, dir);
            let shutdown = server::ShutdownSignal::new();

            // Registered before the worker starts
            let mut signals = TerminationSignals::register()?;

            let mut worker = tokio::task::spawn_blocking({
                let shutdown = shutdown.clone();
                move || server::run(server_config, shutdown)
            });

            tokio::select! {
                res = &mut worker => return res?,
                signal = signals.recv() => {
                    info!("Received {}, shutting down server...", signal);
                }
            }

            let requester = shutdown.clone();
            tokio::task::spawn_blocking(move || requester.request()).await?;
            worker.await??;
        }
    }

    Ok(())
}

/// Termination-class signals, registered up front
#[cfg(unix)]
struct TerminationSignals {
    term: tokio::signal::unix::Signal,
    hup: tokio::signal::unix::Signal,
    int: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl TerminationSignals {
    fn register() -> Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            term: signal(SignalKind::terminate()).context("Failed to register SIGTERM")?,
            hup: signal(SignalKind::hangup()).context("Failed to register SIGHUP")?,
            int: signal(SignalKind::interrupt()).context("Failed to register SIGINT")?,
        })
    }

    /// Wait for the next signal and return its name
    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.term.recv() => "SIGTERM",
            _ = self.hup.recv() => "SIGHUP",
            _ = self.int.recv() => "SIGINT",
        }
    }
}

#[cfg(windows)]
struct TerminationSignals {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(windows)]
impl TerminationSignals {
    fn register() -> Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c().context("Failed to register Ctrl+C")?,
        })
    }

    async fn recv(&mut self) -> &'static str {
        self.ctrl_c.recv().await;
        "Ctrl+C"
    }
}
