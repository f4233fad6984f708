#![allow(dead_code)]

use fxfer::transfer::client::{Client, ClientConfig};
use fxfer::transfer::server::{Config, Server, ShutdownSignal};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tempfile::TempDir;

pub const WAIT: Duration = Duration::from_secs(5);

//===============
// Server Harness
//===============
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: ShutdownSignal,
    handle: JoinHandle<u64>,
}

impl TestServer {
    /// Start a server on a free loopback port writing into `dir`
    pub fn start(dir: &Path) -> Self {
        Self::start_with(Config::new(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            0,
            dir.to_path_buf(),
        ))
    }

    pub fn start_with(config: Config) -> Self {
        let shutdown = ShutdownSignal::new();
        let server = Server::new(&config, shutdown.clone()).expect("Failed to bind test server");
        let addr = server.local_addr().expect("Failed to read server address");
        let handle = thread::spawn(move || server.listen());

        Self {
            addr,
            shutdown,
            handle,
        }
    }

    pub fn client(&self) -> Client {
        Client::new(ClientConfig::new("127.0.0.1", self.addr.port()))
    }

    /// Request shutdown and wait for the accept loop to finish.
    ///
    /// Connections already in the backlog are served first.
    pub fn stop(self) -> u64 {
        self.shutdown.request();
        wait_until(|| self.handle.is_finished());
        assert!(self.handle.is_finished(), "server did not stop in time");
        self.handle.join().expect("server thread panicked")
    }
}

//===============
// Helpers
//===============
pub fn setup_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write `contents` to `dir/name` and return the path
pub fn write_source(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write source file");
    path
}

/// Deterministic non-repeating-ish test data
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

/// Poll `cond` until it holds or `WAIT` elapses
pub fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    cond()
}
