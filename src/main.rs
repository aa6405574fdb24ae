//! Datastream demo - packet round-trip lewat loopback UDP
//!
//! Membangun packet (string, u32, f32, vector 3 float), mengirimnya ke socket
//! lokal, lalu decode di sisi penerima.
//!
//! ```text
//! RUST_LOG=debug cargo run --release -- --count 3
//! ```

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;

use datastream::network::DatagramSocket;
use datastream::{ByteStream, Decode, Encode};

#[derive(Parser, Debug)]
#[clap(name = "datastream")]
#[clap(about = "Send typed packets over loopback UDP and decode them", long_about = None)]
struct Cli {
    /// Alamat bind receiver (port 0 = ephemeral); sender memakai IP yang sama
    #[clap(long, default_value = "127.0.0.1:0")]
    bind: SocketAddr,

    /// Jumlah packet yang dikirim
    #[clap(long, default_value_t = 1)]
    count: u32,

    /// Timeout receive dalam milidetik
    #[clap(long, default_value_t = 1000)]
    timeout_ms: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Vector3 {
    x: f32,
    y: f32,
    z: f32,
}

impl Encode for Vector3 {
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_f32(self.x).write_f32(self.y).write_f32(self.z);
    }
}

impl Decode for Vector3 {
    fn decode(stream: &mut ByteStream) -> Option<Self> {
        if !stream.check_size(12) {
            return None;
        }
        Some(Self {
            x: f32::decode(stream)?,
            y: f32::decode(stream)?,
            z: f32::decode(stream)?,
        })
    }
}

/// Sender selalu port ephemeral supaya `--bind` dengan port tetap tidak bentrok
fn sender_bind_addr(bind: SocketAddr) -> SocketAddr {
    SocketAddr::new(bind.ip(), 0)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let sender =
        DatagramSocket::bind(sender_bind_addr(cli.bind)).context("binding sender socket")?;
    let mut receiver = DatagramSocket::bind(cli.bind).context("binding receiver socket")?;
    let target = receiver.local_addr()?;
    log::info!("sending {} packet(s) to {}", cli.count, target);

    let timeout = Duration::from_millis(cli.timeout_ms);
    let mut outbound = ByteStream::new();
    let mut inbound = ByteStream::new();

    for i in 0..cli.count {
        outbound.clear();
        outbound
            .write("Hello world")
            .write(&(420u32 + i))
            .write(&6.9f32)
            .write(&Vector3 {
                x: 8.1,
                y: -9.11,
                z: 2.083,
            });

        let start = Instant::now();
        sender.send_to(&outbound, target)?;

        let Some(from) = receiver.recv_into(&mut inbound, Some(timeout))? else {
            bail!("no datagram received within {} ms", cli.timeout_ms);
        };

        let mut name = String::new();
        let mut a = 0u32;
        let mut b = 0f32;
        let mut c = Vector3::default();
        inbound.read(&mut name).read(&mut a).read(&mut b).read(&mut c);

        if let Err(err) = inbound.status() {
            bail!("packet {} from {} failed to decode: {}", i, from, err);
        }

        log::info!(
            "packet {} ({} bytes, {:?}): name={:?} a={} b={} c={:?}",
            i,
            inbound.len(),
            start.elapsed(),
            name,
            a,
            b,
            c
        );
    }

    Ok(())
}
