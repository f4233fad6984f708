use std::net::IpAddr;
use std::path::PathBuf;

use crate::transfer::core::CHUNK_SIZE;

/// Transfer server configuration
///
/// # Example
///
/// ```rust
/// use fxfer::transfer::server::Config;
/// use std::path::PathBuf;
///
/// let config = Config::new("127.0.0.1".parse().unwrap(), 8080, PathBuf::from("/tmp/incoming"));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address to listen on
    pub ip_address: IpAddr,
    /// Port number to listen on (0 picks a free port)
    pub port: u16,
    /// Directory received files are written into
    pub output_directory: PathBuf,
    /// Chunk size used when reading the file body
    pub buffer_size: usize,
}

impl Config {
    /// Create a new configuration
    ///
    /// # Arguments
    ///
    /// * `ip_address` - IP address to listen on
    /// * `port` - Port number to listen on
    /// * `output_directory` - Where received files land
    pub fn new(ip_address: IpAddr, port: u16, output_directory: PathBuf) -> Self {
        Self {
            ip_address,
            port,
            output_directory,
            buffer_size: CHUNK_SIZE,
        }
    }

    /// Set body chunk size
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        use std::net::Ipv4Addr;

        Self::new(
            IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            crate::config::DEFAULT_PORT,
            PathBuf::from("."),
        )
    }
}
