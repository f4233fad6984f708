//! Header framing
//!
//! A transfer is a single TCP connection carrying:
//!
//! ```text
//! [4 bytes: filename length, big-endian u32]
//! [N bytes: filename]
//! [raw file content until the sender closes]
//! ```
//!
//! The body has no length prefix. The receiver treats the peer closing its
//! sending side as end of file, so one connection carries exactly one file.

use std::io::{ErrorKind, Read};

use super::error::{Result, TransferError};

/// Size of the filename length prefix
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Default chunk size for streaming the file body
pub const CHUNK_SIZE: usize = 4096;

/// Encode the header for `filename`: big-endian length, then the name verbatim.
pub fn encode_header(filename: &[u8]) -> Result<Vec<u8>> {
    let len = u32::try_from(filename.len()).map_err(|_| {
        TransferError::protocol(format!(
            "filename too long: {} bytes (max {})",
            filename.len(),
            u32::MAX
        ))
    })?;

    let mut header = Vec::with_capacity(LENGTH_PREFIX_LEN + filename.len());
    header.extend_from_slice(&len.to_be_bytes());
    header.extend_from_slice(filename);
    Ok(header)
}

/// Read the 4-byte filename length.
pub fn decode_header_length<R: Read>(stream: &mut R) -> Result<u32> {
    let mut prefix = [0u8; LENGTH_PREFIX_LEN];
    let received = read_full(stream, &mut prefix)?;
    if received < LENGTH_PREFIX_LEN {
        return Err(TransferError::ShortRead {
            expected: LENGTH_PREFIX_LEN,
            received,
        });
    }
    Ok(u32::from_be_bytes(prefix))
}

/// Read exactly `length` filename bytes.
///
/// The buffer grows with what actually arrives, so a bogus length from the
/// peer does not allocate up front.
pub fn decode_header_name<R: Read>(stream: &mut R, length: u32) -> Result<Vec<u8>> {
    let mut name = Vec::new();
    stream
        .take(u64::from(length))
        .read_to_end(&mut name)
        .map_err(|e| TransferError::receive("reading filename", e))?;

    let expected = length as usize;
    if name.len() < expected {
        return Err(TransferError::ShortRead {
            expected,
            received: name.len(),
        });
    }
    Ok(name)
}

/// Read a complete header and return the filename bytes.
pub fn decode_header<R: Read>(stream: &mut R) -> Result<Vec<u8>> {
    let length = decode_header_length(stream)?;
    decode_header_name(stream, length)
}

/// Fill `buf` until it is full or the peer closes. Returns the bytes read.
fn read_full<R: Read>(stream: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match stream.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(TransferError::receive("reading filename length", e)),
        }
    }
    Ok(total)
}
