use std::io;

use thiserror::Error;

/// Result alias used by the transfer modules
pub type Result<T> = std::result::Result<T, TransferError>;

/// Errors raised while framing, sending or receiving a file
#[derive(Debug, Error)]
pub enum TransferError {
    /// A connection could not be established, bound or accepted
    #[error("connection error: {context}: {source}")]
    Connection {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Malformed or truncated header
    #[error("protocol error: {message}")]
    Protocol { message: String },

    /// Writing to the connection failed or was cut short
    #[error("transmit error: {context}: {source}")]
    Transmit {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Reading from the connection failed
    #[error("receive error: {context}: {source}")]
    Receive {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Local file could not be opened, read or written
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Peer closed before the expected number of bytes arrived
    #[error("short read: expected {expected} bytes, received {received}")]
    ShortRead { expected: usize, received: usize },
}

impl TransferError {
    pub fn connection(context: impl Into<String>, source: io::Error) -> Self {
        Self::Connection {
            context: context.into(),
            source,
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn transmit(context: impl Into<String>, source: io::Error) -> Self {
        Self::Transmit {
            context: context.into(),
            source,
        }
    }

    pub fn receive(context: impl Into<String>, source: io::Error) -> Self {
        Self::Receive {
            context: context.into(),
            source,
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wrap a header decoding failure as a protocol error.
    ///
    /// Short reads become `Protocol`; transport errors are kept as they are.
    pub fn into_protocol(self, what: &str) -> Self {
        if matches!(self, Self::ShortRead { .. }) {
            return Self::protocol(format!("truncated {what}: {self}"));
        }
        self
    }

    /// Whether the peer sent something the server could not parse
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. } | Self::ShortRead { .. })
    }
}
