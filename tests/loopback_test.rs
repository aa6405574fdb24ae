//! Loopback Test - ByteStream lewat UDP lokal
//!
//! Outbound: typed writes -> send_to. Inbound: recv_into -> typed reads.

use std::time::Duration;

use datastream::network::DatagramSocket;
use datastream::{ByteStream, WideString};

const TIMEOUT: Duration = Duration::from_secs(2);

fn pair() -> (DatagramSocket, DatagramSocket) {
    let sender = DatagramSocket::bind("127.0.0.1:0".parse().unwrap()).unwrap();
    let receiver = DatagramSocket::bind("127.0.0.1:0".parse().unwrap()).unwrap();
    (sender, receiver)
}

#[test]
fn test_packet_survives_loopback() {
    let (sender, mut receiver) = pair();
    let target = receiver.local_addr().unwrap();

    let mut outbound = ByteStream::new();
    outbound
        .write("Hello world")
        .write(&420u32)
        .write(&6.9f32)
        .write(&WideString::from("ÿ€"))
        .write(&u64::MAX);
    let sent = sender.send_to(&outbound, target).unwrap();
    assert_eq!(sent, outbound.len());

    let mut inbound = ByteStream::new();
    let from = receiver.recv_into(&mut inbound, Some(TIMEOUT)).unwrap();
    assert_eq!(from, Some(sender.local_addr().unwrap()));
    assert_eq!(inbound.as_bytes(), outbound.as_bytes());

    let mut name = String::new();
    let mut a = 0u32;
    let mut b = 0f32;
    let mut wide = WideString::new();
    let mut big = 0u64;
    inbound
        .read(&mut name)
        .read(&mut a)
        .read(&mut b)
        .read(&mut wide)
        .read(&mut big);

    assert!(inbound.status().is_ok());
    assert!(inbound.end_of_stream());
    assert_eq!(name, "Hello world");
    assert_eq!(a, 420);
    assert_eq!(b, 6.9);
    assert_eq!(wide.to_string_lossy(), "ÿ€");
    assert_eq!(big, u64::MAX);
}

#[test]
fn test_recv_replaces_previous_contents() {
    let (sender, mut receiver) = pair();
    let target = receiver.local_addr().unwrap();

    let mut inbound = ByteStream::new();
    inbound.write_u32(1);
    inbound.get::<u64>();
    assert!(!inbound.is_valid());

    let mut outbound = ByteStream::new();
    outbound.write_u16(0x0A0B);
    sender.send_to(&outbound, target).unwrap();

    receiver.recv_into(&mut inbound, Some(TIMEOUT)).unwrap();

    assert!(inbound.is_valid());
    assert_eq!(inbound.len(), 2);
    assert_eq!(inbound.get::<u16>(), Some(0x0A0B));
}

#[cfg(unix)]
#[test]
fn test_set_buffer_sizes() {
    let (sender, _receiver) = pair();
    sender.set_buffer_sizes(256 * 1024).unwrap();
}
