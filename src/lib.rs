//! fxfer: send one file to a server over a plain TCP connection.
//!
//! See [`transfer`] for the wire format and the client/server halves.

pub mod config;
pub mod logging;
pub mod transfer;
