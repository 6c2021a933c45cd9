// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! IPv4 address record data
//!
//! [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
//!
//! ```text
//! 3.4.1. A RDATA format
//!
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!     |                    ADDRESS                    |
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!
//! where:
//!
//! ADDRESS         A 32 bit Internet address.
//!
//! Hosts that have multiple Internet addresses will have multiple A
//! records.
//! ```

use std::net::Ipv4Addr;

use crate::error::DnsResult;
use crate::serialize::binary::{WireDecoder, WireEncoder};

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>) -> DnsResult<Ipv4Addr> {
    let octets: [u8; 4] = decoder.read_slice(4)?.try_into().expect("slice len is 4");
    Ok(Ipv4Addr::from(octets))
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, address: Ipv4Addr) -> DnsResult<()> {
    encoder.emit_bytes(&address.octets())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let address = Ipv4Addr::new(192, 0, 2, 1);
        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), address).unwrap();
        assert_eq!(bytes, [192, 0, 2, 1]);
        assert_eq!(read(&mut WireDecoder::new(&bytes)).unwrap(), address);
    }
}
