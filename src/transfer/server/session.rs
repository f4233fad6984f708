use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::path::{Path, PathBuf};

use super::config::Config;
use crate::transfer::core::{
    Result, TransferError, decode_header_length, decode_header_name, naming, output_filename,
};

/// What a finished session wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub filename: PathBuf,
    pub output: PathBuf,
    pub bytes: u64,
}

/// One incoming transfer.
///
/// Owns the connection; the output file lives for the duration of `run`.
/// Both are closed whatever the outcome.
pub struct Session<S: Read> {
    connection: S,
    bytes_received: u64,
}

impl<S: Read> Session<S> {
    pub fn new(connection: S) -> Self {
        Self {
            connection,
            bytes_received: 0,
        }
    }

    /// Read the header, create the output file and copy the body into it.
    ///
    /// A truncated header fails before any file is created. A failure while
    /// writing the body leaves the partial file on disk.
    pub fn run(&mut self, output_directory: &Path, buffer_size: usize) -> Result<Received> {
        let length = decode_header_length(&mut self.connection)
            .map_err(|e| e.into_protocol("filename length"))?;
        let name = decode_header_name(&mut self.connection, length)
            .map_err(|e| e.into_protocol("filename"))?;

        let filename = naming::path_from_wire(&name);
        let output = output_directory.join(output_filename(&filename));
        log::debug!("Receiving {} into {}", filename.display(), output.display());

        let mut file = File::create(&output).map_err(|e| {
            TransferError::io(format!("opening output file {}", output.display()), e)
        })?;
        self.receive_body(&mut file, buffer_size)?;

        Ok(Received {
            filename,
            output,
            bytes: self.bytes_received,
        })
    }

    /// Copy bytes from the connection to the output file until the peer closes.
    fn receive_body(&mut self, file: &mut File, buffer_size: usize) -> Result<()> {
        let mut buf = vec![0u8; buffer_size.max(1)];
        loop {
            let n = match self.connection.read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(TransferError::receive("receiving file content", e)),
            };

            file.write_all(&buf[..n])
                .map_err(|e| TransferError::io("writing output file", e))?;
            self.bytes_received += n as u64;
        }
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }
}

/// Serve one accepted connection to completion.
///
/// Every error stops here: it is logged, the file and socket are closed and
/// the caller carries on with the next client.
pub fn serve_connection(stream: TcpStream, peer: SocketAddr, config: &Config) -> Option<Received> {
    let mut session = Session::new(stream);
    let outcome = session.run(&config.output_directory, config.buffer_size);

    let received = match outcome {
        Ok(received) => {
            log::info!(
                "Received {} from {} -> {} ({} bytes)",
                received.filename.display(),
                peer,
                received.output.display(),
                received.bytes
            );
            Some(received)
        }
        Err(e) if e.is_protocol() => {
            log::warn!("Error handling client {}: {}", peer, e);
            None
        }
        Err(e) => {
            log::error!(
                "Error handling client {}: {} ({} bytes written)",
                peer,
                e,
                session.bytes_received()
            );
            None
        }
    };

    if let Err(e) = session.connection.shutdown(Shutdown::Both) {
        log::debug!("Closing connection from {}: {}", peer, e);
    }
    received
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::core::encode_header;
    use std::io::{self, Cursor};

    fn wire(name: &[u8], body: &[u8]) -> Cursor<Vec<u8>> {
        let mut data = encode_header(name).unwrap();
        data.extend_from_slice(body);
        Cursor::new(data)
    }

    /// Hands out its data, then fails like a reset connection
    struct Resetting {
        inner: Cursor<Vec<u8>>,
    }

    impl Read for Resetting {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.inner.read(buf)? {
                0 => Err(io::Error::new(ErrorKind::ConnectionReset, "reset by peer")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_session_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(wire(b"report.txt", b"quarterly numbers"));

        let received = session.run(dir.path(), 4).unwrap();
        assert_eq!(received.output, dir.path().join("report_out.txt"));
        assert_eq!(received.bytes, 17);
        assert_eq!(
            std::fs::read(dir.path().join("report_out.txt")).unwrap(),
            b"quarterly numbers"
        );
    }

    #[test]
    fn test_empty_body_leaves_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(wire(b"empty.log", b""));

        let received = session.run(dir.path(), 4096).unwrap();
        assert_eq!(received.bytes, 0);
        assert_eq!(std::fs::metadata(&received.output).unwrap().len(), 0);
    }

    #[test]
    fn test_truncated_name_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(Cursor::new(vec![0, 0, 0, 10, b'r', b'e']));

        let err = session.run(dir.path(), 4096).unwrap_err();
        assert!(matches!(err, TransferError::Protocol { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_truncated_length_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(Cursor::new(vec![0u8, 0]));
        let err = session.run(dir.path(), 4096).unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn test_unwritable_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let mut session = Session::new(wire(b"data", b"x"));

        let err = session.run(&missing, 4096).unwrap_err();
        assert!(matches!(err, TransferError::Io { .. }));
    }

    #[test]
    fn test_reset_mid_body_keeps_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Resetting {
            inner: wire(b"big.bin", b"partial"),
        };
        let mut session = Session::new(conn);

        let err = session.run(dir.path(), 3).unwrap_err();
        assert!(matches!(err, TransferError::Receive { .. }));
        assert_eq!(session.bytes_received(), 7);
        assert_eq!(
            std::fs::read(dir.path().join("big_out.bin")).unwrap(),
            b"partial"
        );
    }
}
