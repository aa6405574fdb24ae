//! Network Layer: Datagram Boundary
//!
//! Menggunakan mio untuk non-blocking UDP.
//!
//! Kontrak:
//! - Outbound: typed writes ke ByteStream, lalu `send_to` mengirim `as_bytes()`
//! - Inbound: `recv_into` bulk-copy datagram ke ByteStream sebelum typed reads

mod datagram;

pub use datagram::{DatagramSocket, MAX_DATAGRAM_SIZE};
