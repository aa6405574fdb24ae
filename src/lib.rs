//! Datastream - Network-Order Serialization Buffer
//!
//! Arsitektur:
//! - `protocol`: ByteStream, typed write/read dengan latching validity
//! - `network`: adapter datagram (UDP) untuk mengirim/menerima stream

pub mod network;
pub mod protocol;

pub use protocol::{ByteStream, Decode, Encode, StreamConfig, StreamError, WideString};
