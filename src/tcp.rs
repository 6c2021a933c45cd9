// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! TCP transport to a single nameserver.
//!
//! [RFC 1035, 4.2.2](https://tools.ietf.org/html/rfc1035#section-4.2.2):
//! messages sent over TCP are prefixed with a two byte length field which
//! gives the message length, excluding the length field itself.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use tracing::debug;

use crate::error::DnsResult;

/// A TCP connection to one nameserver, kept alive between requests and
/// reconnected on demand
#[derive(Debug)]
pub struct TcpClientConnection {
    stream: Option<TcpStream>,
    name_server: SocketAddr,
    timeout: Duration,
}

impl TcpClientConnection {
    /// Prepares a connection towards `name_server`; the stream itself is
    /// established lazily on first use
    pub fn new(name_server: SocketAddr, timeout: Duration) -> Self {
        Self {
            stream: None,
            name_server,
            timeout,
        }
    }

    /// The nameserver this connection targets
    pub fn name_server(&self) -> SocketAddr {
        self.name_server
    }

    /// Drops the stream; the next use reconnects
    pub fn disconnect(&mut self) {
        self.stream = None;
    }

    fn stream(&mut self) -> DnsResult<&mut TcpStream> {
        if self.stream.is_none() {
            let stream = TcpStream::connect_timeout(&self.name_server, self.timeout)?;
            stream.set_read_timeout(Some(self.timeout))?;
            stream.set_write_timeout(Some(self.timeout))?;
            stream.set_nodelay(true)?;

            debug!("tcp stream {} -> {}", stream.local_addr()?, self.name_server);
            self.stream = Some(stream);
        }

        Ok(self.stream.as_mut().expect("stream was just connected"))
    }

    /// Sends one length-prefixed message.
    ///
    /// Any I/O failure drops the connection so the next request starts
    /// from a clean stream.
    pub fn send(&mut self, bytes: &[u8]) -> DnsResult<()> {
        let result: DnsResult<()> = (|| {
            let stream = self.stream()?;
            stream.write_all(&(bytes.len() as u16).to_be_bytes())?;
            stream.write_all(bytes)?;
            stream.flush()?;
            Ok(())
        })();

        if result.is_err() {
            self.disconnect();
        }
        result
    }

    /// Receives one length-prefixed message, reading across as many
    /// segments as the peer needs
    pub fn receive(&mut self) -> DnsResult<Vec<u8>> {
        let result: DnsResult<Vec<u8>> = (|| {
            let stream = self.stream()?;

            let mut len_bytes = [0u8; 2];
            stream.read_exact(&mut len_bytes)?;
            let len = usize::from(u16::from_be_bytes(len_bytes));

            let mut message = vec![0u8; len];
            stream.read_exact(&mut message)?;
            Ok(message)
        })();

        if result.is_err() {
            self.disconnect();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_length_framing_roundtrip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        // echo server that reads a framed message and frames it back,
        // deliberately split across two writes
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut len_bytes = [0u8; 2];
            stream.read_exact(&mut len_bytes).unwrap();
            let len = usize::from(u16::from_be_bytes(len_bytes));
            let mut body = vec![0u8; len];
            stream.read_exact(&mut body).unwrap();

            stream.write_all(&len_bytes).unwrap();
            stream.flush().unwrap();
            thread::sleep(Duration::from_millis(20));
            stream.write_all(&body).unwrap();
        });

        let mut connection = TcpClientConnection::new(addr, Duration::from_secs(5));
        connection.send(b"hello dns").unwrap();
        assert_eq!(connection.receive().unwrap(), b"hello dns");

        server.join().unwrap();
    }

    #[test]
    fn test_connect_refused() {
        // a port nothing listens on; bind then drop to find a free one
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let mut connection = TcpClientConnection::new(addr, Duration::from_secs(1));
        assert!(connection.send(b"hello").is_err());
    }
}
