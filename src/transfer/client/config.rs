use crate::transfer::core::CHUNK_SIZE;

/// Transfer client configuration
///
/// # Example
///
/// ```rust
/// use fxfer::transfer::client::ClientConfig;
///
/// let config = ClientConfig::new("192.168.1.100", 8080).with_buffer_size(8192);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host name or IP address
    pub server_host: String,
    /// Server port number
    pub server_port: u16,
    /// Chunk size used when streaming the file body
    pub buffer_size: usize,
}

impl ClientConfig {
    /// Create new client configuration
    ///
    /// # Arguments
    ///
    /// * `server_host` - Server host name or IP address
    /// * `server_port` - Server port number
    pub fn new(server_host: impl Into<String>, server_port: u16) -> Self {
        Self {
            server_host: server_host.into(),
            server_port,
            buffer_size: CHUNK_SIZE,
        }
    }

    /// Set body chunk size
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", crate::config::DEFAULT_PORT)
    }
}
