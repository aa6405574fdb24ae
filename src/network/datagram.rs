//! Datagram adapter untuk ByteStream
//!
//! Hanya boundary antara codec dan socket: satu stream = satu datagram.
//! Tidak ada connection management, retransmission, atau framing tambahan.

use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use mio::net::UdpSocket;
use mio::{Events, Interest, Poll, Token};

use crate::protocol::ByteStream;

/// Payload UDP maksimum (IPv4)
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

const SOCKET_TOKEN: Token = Token(0);
const EVENTS_CAPACITY: usize = 8;

/// Non-blocking UDP socket dengan receive buffer pre-allocated
pub struct DatagramSocket {
    poll: Poll,
    socket: UdpSocket,
    recv_buffer: Box<[u8]>,
}

impl DatagramSocket {
    /// Bind socket dan register ke poll untuk read events
    pub fn bind(addr: SocketAddr) -> io::Result<Self> {
        let poll = Poll::new()?;
        let mut socket = UdpSocket::bind(addr)?;

        poll.registry()
            .register(&mut socket, SOCKET_TOKEN, Interest::READABLE)?;

        Ok(Self {
            poll,
            socket,
            recv_buffer: vec![0u8; MAX_DATAGRAM_SIZE].into_boxed_slice(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Kirim isi stream sebagai satu datagram
    pub fn send_to(&self, stream: &ByteStream, target: SocketAddr) -> io::Result<usize> {
        if stream.len() > MAX_DATAGRAM_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "stream of {} bytes exceeds datagram limit {}",
                    stream.len(),
                    MAX_DATAGRAM_SIZE
                ),
            ));
        }

        let sent = self.socket.send_to(stream.as_bytes(), target)?;
        log::trace!("sent {} bytes to {}", sent, target);

        if sent != stream.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "datagram truncated on send",
            ));
        }
        Ok(sent)
    }

    /// Terima satu datagram ke `stream` (clear lalu bulk append).
    ///
    /// Returns `Ok(None)` jika `timeout` habis tanpa data.
    pub fn recv_into(
        &mut self,
        stream: &mut ByteStream,
        timeout: Option<Duration>,
    ) -> io::Result<Option<SocketAddr>> {
        let mut events = Events::with_capacity(EVENTS_CAPACITY);
        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            match self.socket.recv_from(&mut self.recv_buffer) {
                Ok((n, from)) => {
                    stream.clear();
                    stream.append(&self.recv_buffer[..n]);
                    log::trace!("received {} bytes from {}", n, from);
                    return Ok(Some(from));
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {}
                Err(e) => return Err(e),
            }

            // Wakeup palsu tidak boleh me-restart timeout
            let wait = deadline.map(|d| d.saturating_duration_since(Instant::now()));
            if wait == Some(Duration::ZERO) {
                return Ok(None);
            }

            self.poll.poll(&mut events, wait)?;
            if events.is_empty() {
                return Ok(None);
            }
        }
    }

    /// Set SO_SNDBUF dan SO_RCVBUF
    #[cfg(unix)]
    pub fn set_buffer_sizes(&self, size: usize) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        let fd = self.socket.as_raw_fd();
        let optval = size.min(libc::c_int::MAX as usize) as libc::c_int;

        for opt in [libc::SO_SNDBUF, libc::SO_RCVBUF] {
            // SAFETY: fd milik socket yang masih hidup, optval adalah c_int lokal
            let ret = unsafe {
                libc::setsockopt(
                    fd,
                    libc::SOL_SOCKET,
                    opt,
                    &optval as *const _ as *const libc::c_void,
                    std::mem::size_of::<libc::c_int>() as libc::socklen_t,
                )
            };
            if ret != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }
}
