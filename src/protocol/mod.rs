//! Protocol Layer: Network-Order Binary Serialization
//!
//! Prinsip desain:
//! - Integer dan length prefix: big-endian (network order)
//! - Float: raw bytes host, tanpa swap
//! - Latching validity: satu read gagal membuat seluruh stream invalid
//! - Write tidak pernah gagal

mod codec;
mod error;
mod stream;
mod wide;

pub use codec::{Decode, Encode};
pub use error::StreamError;
pub use stream::{ByteStream, StreamConfig};
pub use wide::WideString;
