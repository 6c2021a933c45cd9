// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! TLSA records for DNS-based Authentication of Named Entities

use std::fmt;

use data_encoding::HEXUPPER_PERMISSIVE;

use crate::error::DnsResult;
use crate::serialize::binary::{WireDecoder, WireEncoder};

/// [RFC 6698, DNS-Based Authentication for TLS, August 2012](https://tools.ietf.org/html/rfc6698#section-2.1)
///
/// ```text
/// 2.1.  TLSA RDATA Wire Format
///
///                         1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |  Cert. Usage  |   Selector    | Matching Type |               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+               /
///    /                                                               /
///    /                 Certificate Association Data                  /
///    /                                                               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Tlsa {
    cert_usage: u8,
    selector: u8,
    matching: u8,
    cert_data: Vec<u8>,
}

impl Tlsa {
    /// Constructs a new TLSA record data
    pub fn new(cert_usage: u8, selector: u8, matching: u8, cert_data: Vec<u8>) -> Self {
        Self {
            cert_usage,
            selector,
            matching,
            cert_data,
        }
    }

    /// The provided association that will be used to match the certificate
    pub fn cert_usage(&self) -> u8 {
        self.cert_usage
    }

    /// Which part of the TLS certificate will be matched
    pub fn selector(&self) -> u8 {
        self.selector
    }

    /// How the certificate association is presented, e.g. 1 for SHA-256
    pub fn matching(&self) -> u8 {
        self.matching
    }

    /// The certificate association data to be matched
    pub fn cert_data(&self) -> &[u8] {
        &self.cert_data
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>, rdata_length: u16) -> DnsResult<Tlsa> {
    let len = (rdata_length as usize)
        .checked_sub(3)
        .ok_or("tlsa rdata too short")?;

    Ok(Tlsa::new(
        decoder.read_u8()?,
        decoder.read_u8()?,
        decoder.read_u8()?,
        decoder.read_vec(len)?,
    ))
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, tlsa: &Tlsa) -> DnsResult<()> {
    encoder.emit_u8(tlsa.cert_usage())?;
    encoder.emit_u8(tlsa.selector())?;
    encoder.emit_u8(tlsa.matching())?;
    encoder.emit_bytes(tlsa.cert_data())
}

impl fmt::Display for Tlsa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{usage} {selector} {matching} {data}",
            usage = self.cert_usage,
            selector = self.selector,
            matching = self.matching,
            data = HEXUPPER_PERMISSIVE.encode(&self.cert_data),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let rdata = Tlsa::new(3, 1, 1, vec![0xAB; 32]);

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(
            read(&mut WireDecoder::new(&bytes), bytes.len() as u16).unwrap(),
            rdata
        );
    }

    #[test]
    fn test_short_rdata_is_error() {
        let bytes = [3, 1];
        assert!(read(&mut WireDecoder::new(&bytes), 2).is_err());
    }
}
