use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Shutdown request shared between the signal handler and the accept loop.
///
/// Requesting shutdown sets the flag and opens one loopback "wake" connection
/// to the registered listener, so a blocked `accept` returns. The wake
/// connection lands in the backlog behind every client that connected
/// earlier; the loop serves those and stops when it reaches the wake
/// connection, identified by its source address.
///
/// Each signal belongs to a single server: only the first registered
/// listener is woken.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
    listener_addr: Arc<OnceLock<SocketAddr>>,
    wake_peer: Arc<Mutex<Option<SocketAddr>>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the server to stop accepting. Safe to call more than once.
    pub fn request(&self) {
        // Held across the connect so the loop never sees the flag without
        // knowing whether a wake connection is on its way.
        let mut wake_peer = self.lock_wake_peer();
        if self.requested.swap(true, Ordering::SeqCst) {
            return;
        }

        let Some(addr) = self.listener_addr.get() else {
            return;
        };
        match TcpStream::connect(addr).and_then(|stream| stream.local_addr()) {
            Ok(local) => *wake_peer = Some(local),
            Err(e) => log::debug!("Wake connection to {} failed: {}", addr, e),
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Whether a wake connection was queued and the loop must drain up to it
    pub(crate) fn wake_pending(&self) -> bool {
        self.lock_wake_peer().is_some()
    }

    /// Whether an accepted connection is the wake connection
    pub(crate) fn is_wake(&self, peer: SocketAddr) -> bool {
        self.is_requested() && *self.lock_wake_peer() == Some(peer)
    }

    /// Remember where the listener is so `request` can wake it.
    pub(crate) fn register_listener(&self, addr: SocketAddr) {
        let target = wake_target(addr);
        if self.listener_addr.set(target).is_err() {
            log::debug!("Shutdown signal already registered, not waking {}", target);
        }
    }

    fn lock_wake_peer(&self) -> MutexGuard<'_, Option<SocketAddr>> {
        self.wake_peer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A wildcard bind address is not connectable everywhere; use loopback.
fn wake_target(addr: SocketAddr) -> SocketAddr {
    let ip = match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, addr.port())
}
