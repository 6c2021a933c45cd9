// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! UDP transport to a single nameserver

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use tracing::debug;

use crate::error::DnsResult;

/// A connected UDP socket to one nameserver.
///
/// The socket stays connected between requests; the kernel filters
/// datagrams from other sources, which is the first line of defense
/// against off-path spoofing.
#[derive(Debug)]
pub struct UdpClientConnection {
    socket: UdpSocket,
    name_server: SocketAddr,
}

impl UdpClientConnection {
    /// Opens a socket towards `name_server`, optionally bound to a local
    /// address, with the given per-read timeout
    pub fn new(
        name_server: SocketAddr,
        bind_addr: Option<SocketAddr>,
        timeout: Duration,
    ) -> DnsResult<Self> {
        let bind_addr = bind_addr.unwrap_or_else(|| match name_server {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        });

        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(name_server)?;
        socket.set_read_timeout(Some(timeout))?;

        debug!("udp socket {} -> {name_server}", socket.local_addr()?);
        Ok(Self {
            socket,
            name_server,
        })
    }

    /// The nameserver this socket is connected to
    pub fn name_server(&self) -> SocketAddr {
        self.name_server
    }

    /// Adjusts the per-read timeout
    pub fn set_timeout(&self, timeout: Duration) -> DnsResult<()> {
        self.socket.set_read_timeout(Some(timeout))?;
        Ok(())
    }

    /// Sends one message
    pub fn send(&self, bytes: &[u8]) -> DnsResult<()> {
        self.socket.send(bytes)?;
        Ok(())
    }

    /// Receives one datagram of at most `max_payload` bytes.
    ///
    /// Returns a timeout error when the read deadline passes.
    pub fn receive(&self, max_payload: u16) -> DnsResult<Vec<u8>> {
        let mut buffer = vec![0u8; usize::from(max_payload.max(512))];
        let len = self.socket.recv(&mut buffer)?;
        buffer.truncate(len);
        Ok(buffer)
    }
}
