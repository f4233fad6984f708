//! Transfer core
//!
//! This module contains the pieces shared by client and server:
//! - `codec`: Header framing and body semantics
//! - `error`: Error taxonomy for a transfer
//! - `naming`: Wire filenames and output filename derivation

pub mod codec;
mod error;
pub mod naming;

// Public core types
pub use codec::{
    CHUNK_SIZE, LENGTH_PREFIX_LEN, decode_header, decode_header_length, decode_header_name,
    encode_header,
};
pub use error::{Result, TransferError};
pub use naming::{OUTPUT_SUFFIX, output_filename};
