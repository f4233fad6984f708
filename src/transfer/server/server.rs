use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener};

use super::config::Config;
use super::session::serve_connection;
use super::shutdown::ShutdownSignal;
use crate::transfer::core::{Result, TransferError};

/// Accept loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Running,
    ShuttingDown,
}

/// Transfer server
///
/// Serves one connection at a time on the calling thread. Clients that
/// connect meanwhile wait in the listen backlog.
///
/// # Example
///
/// ```rust,no_run
/// use fxfer::transfer::server::{Config, Server, ShutdownSignal};
///
/// let shutdown = ShutdownSignal::new();
/// let server = Server::new(&Config::default(), shutdown.clone()).unwrap();
/// server.listen();
/// ```
pub struct Server {
    listener: TcpListener,
    config: Config,
    shutdown: ShutdownSignal,
    state: ServerState,
    served: u64,
}

impl Server {
    /// Bind the listening socket. This is the only server-fatal failure.
    pub fn new(config: &Config, shutdown: ShutdownSignal) -> Result<Self> {
        let addr = SocketAddr::new(config.ip_address, config.port);
        let listener = TcpListener::bind(addr)
            .map_err(|e| TransferError::connection(format!("binding {addr}"), e))?;

        let local = listener
            .local_addr()
            .map_err(|e| TransferError::connection("reading listener address", e))?;
        shutdown.register_listener(local);
        log::info!("Server is listening on {}", local);

        Ok(Self {
            listener,
            config: config.clone(),
            shutdown,
            state: ServerState::Running,
            served: 0,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| TransferError::connection("reading listener address", e))
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    /// Accept and serve clients until shutdown is requested.
    ///
    /// Clients that connected before the request are still served. Consumes
    /// the server; the listening socket is closed on return. Returns the
    /// number of connections that were handed to a session.
    pub fn listen(mut self) -> u64 {
        while self.state == ServerState::Running {
            if self.shutdown.is_requested() && !self.shutdown.wake_pending() {
                self.state = ServerState::ShuttingDown;
                break;
            }
            self.state = self.accept_once();
        }

        log::info!("Server shutting down after {} connection(s)", self.served);
        self.served
    }

    /// One accept attempt. Only the wake connection ends the loop here;
    /// `listen` checks the flag before the next attempt.
    fn accept_once(&mut self) -> ServerState {
        match self.listener.accept() {
            Ok((stream, peer)) => {
                if self.shutdown.is_wake(peer) {
                    log::debug!("Wake connection from {}, stopping", peer);
                    return ServerState::ShuttingDown;
                }

                log::info!("Accepted connection from {}", peer);
                self.served += 1;
                serve_connection(stream, peer, &self.config);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {
                log::debug!("Accept interrupted");
            }
            Err(e) => {
                log::error!("Accept failed: {}", e);
            }
        }
        ServerState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::core::encode_header;
    use std::io::Write;
    use std::net::{IpAddr, Ipv4Addr, Shutdown, TcpStream};
    use std::path::Path;

    fn local_config(dir: &Path) -> Config {
        Config::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0, dir.to_path_buf())
    }

    #[test]
    fn test_bind_conflict_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let first = Server::new(&local_config(dir.path()), ShutdownSignal::new()).unwrap();
        let port = first.local_addr().unwrap().port();

        let mut config = local_config(dir.path());
        config.port = port;
        let err = Server::new(&config, ShutdownSignal::new()).err().unwrap();
        assert!(matches!(err, TransferError::Connection { .. }));
    }

    #[test]
    fn test_shutdown_before_listen() {
        let dir = tempfile::tempdir().unwrap();
        let shutdown = ShutdownSignal::new();
        let server = Server::new(&local_config(dir.path()), shutdown.clone()).unwrap();
        assert_eq!(server.state(), ServerState::Running);

        shutdown.request();
        assert_eq!(server.listen(), 0);
    }

    #[test]
    fn test_queued_client_served_after_shutdown_request() {
        let dir = tempfile::tempdir().unwrap();
        let shutdown = ShutdownSignal::new();
        let server = Server::new(&local_config(dir.path()), shutdown.clone()).unwrap();
        let addr = server.local_addr().unwrap();

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(&encode_header(b"queued.txt").unwrap()).unwrap();
        client.write_all(b"waited in the backlog").unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        shutdown.request();
        assert_eq!(server.listen(), 1);
        assert_eq!(
            std::fs::read(dir.path().join("queued_out.txt")).unwrap(),
            b"waited in the backlog"
        );
    }
}
