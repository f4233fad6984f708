use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::path::Path;

use super::config::ClientConfig;
use crate::transfer::core::{Result, TransferError, encode_header, naming};

/// Transfer client
///
/// Sends one file per connection: header first, then the raw body, then
/// closes the write side to mark end of file.
///
/// # Example
///
/// ```rust,no_run
/// use fxfer::transfer::client::{Client, ClientConfig};
/// use std::path::Path;
///
/// let client = Client::new(ClientConfig::new("127.0.0.1", 8080));
/// client.send_file(Path::new("report.txt")).unwrap();
/// ```
pub struct Client {
    config: ClientConfig,
}

impl Client {
    /// Create a new transfer client
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Upload a local file to the server.
    ///
    /// Returns the number of body bytes sent.
    pub fn send_file(&self, local_file: &Path) -> Result<u64> {
        log::info!(
            "Sending {} to {}:{}",
            local_file.display(),
            self.config.server_host,
            self.config.server_port
        );

        if !local_file.exists() {
            return Err(TransferError::io(
                format!("file does not exist: {}", local_file.display()),
                ErrorKind::NotFound.into(),
            ));
        }

        let file = File::open(local_file)
            .map_err(|e| TransferError::io(format!("opening {}", local_file.display()), e))?;

        let filename = naming::wire_filename(local_file).ok_or_else(|| {
            TransferError::io(
                format!("no file name in path: {}", local_file.display()),
                ErrorKind::InvalidInput.into(),
            )
        })?;

        let stream = connect(&self.config.server_host, self.config.server_port)?;
        let mut session = ClientSession::new(stream, file);
        session.send_header(&filename)?;
        session.send_body(self.config.buffer_size)?;
        let sent = session.close()?;

        log::info!("File sent successfully to server ({} bytes)", sent);
        Ok(sent)
    }
}

/// Open a TCP connection to `host:port`. No retries.
pub fn connect(host: &str, port: u16) -> Result<TcpStream> {
    let stream = TcpStream::connect((host, port))
        .map_err(|e| TransferError::connection(format!("connecting to {host}:{port}"), e))?;
    log::debug!("Connected to {}:{}", host, port);
    Ok(stream)
}

/// One outgoing transfer: the connection, the source file and a byte count.
///
/// Dropping the session closes both the file and the connection.
pub struct ClientSession<S: Write, F: Read> {
    connection: S,
    file: F,
    bytes_sent: u64,
}

impl<S: Write, F: Read> ClientSession<S, F> {
    pub fn new(connection: S, file: F) -> Self {
        Self {
            connection,
            file,
            bytes_sent: 0,
        }
    }

    /// Write the encoded header in a single write.
    ///
    /// A write that accepts fewer bytes than the header is reported as a
    /// transmit error rather than completed with further writes.
    pub fn send_header(&mut self, filename: &[u8]) -> Result<()> {
        let header = encode_header(filename)?;
        let written = self
            .connection
            .write(&header)
            .map_err(|e| TransferError::transmit("sending header", e))?;

        if written != header.len() {
            return Err(TransferError::transmit(
                format!("sending header: wrote {} of {} bytes", written, header.len()),
                ErrorKind::WriteZero.into(),
            ));
        }
        log::debug!("Header sent ({} bytes)", written);
        Ok(())
    }

    /// Stream the file in `buffer_size` chunks until end of file.
    pub fn send_body(&mut self, buffer_size: usize) -> Result<u64> {
        let mut buf = vec![0u8; buffer_size.max(1)];
        loop {
            let n = match self.file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(TransferError::io("reading input file", e)),
            };

            self.connection
                .write_all(&buf[..n])
                .map_err(|e| TransferError::transmit("sending file content", e))?;
            self.bytes_sent += n as u64;
        }

        log::debug!("Body sent ({} bytes)", self.bytes_sent);
        Ok(self.bytes_sent)
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}

impl<F: Read> ClientSession<TcpStream, F> {
    /// Signal end of body by closing the write side, then drop the connection.
    pub fn close(self) -> Result<u64> {
        self.connection
            .shutdown(Shutdown::Write)
            .map_err(|e| TransferError::transmit("closing connection", e))?;
        Ok(self.bytes_sent)
    }
}
