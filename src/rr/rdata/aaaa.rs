// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! IPv6 address record data, RFC 3596: a 128 bit IPv6 address encoded in
//! network byte order

use std::net::Ipv6Addr;

use crate::error::DnsResult;
use crate::serialize::binary::{WireDecoder, WireEncoder};

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>) -> DnsResult<Ipv6Addr> {
    let octets: [u8; 16] = decoder.read_slice(16)?.try_into().expect("slice len is 16");
    Ok(Ipv6Addr::from(octets))
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, address: &Ipv6Addr) -> DnsResult<()> {
    encoder.emit_bytes(&address.octets())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_roundtrip() {
        let address = Ipv6Addr::from_str("2001:db8::1").unwrap();
        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &address).unwrap();
        assert_eq!(read(&mut WireDecoder::new(&bytes)).unwrap(), address);
    }
}
