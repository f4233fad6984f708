//! Single-file transfer over TCP
//!
//! One connection carries exactly one file. The sender writes a header made
//! of a big-endian `u32` filename length and the filename bytes, then the raw
//! file content, then closes. The receiver reads the header, writes the body
//! to `<stem>_out<.ext>` and stops when the sender closes.
//!
//! ## Module Structure
//!
//! ```text
//! transfer/
//! ├── core/           # Shared protocol pieces
//! │   ├── codec       # Header encoding/decoding
//! │   ├── error       # Transfer error taxonomy
//! │   └── naming      # Wire and output filenames
//! │
//! ├── server/         # Receiving side
//! │   ├── server      # Accept loop
//! │   ├── session     # One incoming transfer
//! │   ├── shutdown    # Shutdown flag
//! │   └── config      # Server configuration
//! │
//! └── client/         # Sending side
//!     └── ...
//! ```
//!
//! ## Usage Examples
//!
//! ### Start the server
//!
//! ```rust,no_run
//! use fxfer::transfer::server::{Config, Server, ShutdownSignal};
//! use std::path::PathBuf;
//!
//! let config = Config::new("0.0.0.0".parse().unwrap(), 8080, PathBuf::from("."));
//! let server = Server::new(&config, ShutdownSignal::new()).unwrap();
//! server.listen();
//! ```
//!
//! ### Send a file
//!
//! ```rust,no_run
//! use fxfer::transfer::client::{Client, ClientConfig};
//! use std::path::Path;
//!
//! let client = Client::new(ClientConfig::new("127.0.0.1", 8080));
//! client.send_file(Path::new("report.txt")).unwrap();
//! ```

pub mod client;
pub mod core;
pub mod server;

pub use self::core::{Result, TransferError};
