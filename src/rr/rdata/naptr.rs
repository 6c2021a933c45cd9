// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Dynamic Delegation Discovery System

use std::fmt;

use crate::error::DnsResult;
use crate::rr::Name;
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncoder};

/// [RFC 3403, DDDS DNS Database, October 2002](https://tools.ietf.org/html/rfc3403#section-4)
///
/// ```text
/// 4.1 Packet Format
///
///   The packet format of the NAPTR RR is given below.  The DNS type code
///   for NAPTR is 35.
///
///                                    1  1  1  1  1  1
///      0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///    |                     ORDER                     |
///    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///    |                   PREFERENCE                  |
///    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///    /                     FLAGS                     /
///    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///    /                   SERVICES                    /
///    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///    /                    REGEXP                     /
///    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///    /                  REPLACEMENT                  /
///    /                                               /
///    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Naptr {
    order: u16,
    preference: u16,
    flags: Box<[u8]>,
    services: Box<[u8]>,
    regexp: Box<[u8]>,
    replacement: Name,
}

impl Naptr {
    /// Constructs a new NAPTR record data
    pub fn new(
        order: u16,
        preference: u16,
        flags: Box<[u8]>,
        services: Box<[u8]>,
        regexp: Box<[u8]>,
        replacement: Name,
    ) -> Self {
        Self {
            order,
            preference,
            flags,
            services,
            regexp,
            replacement,
        }
    }

    /// Order in which the records must be processed, lowest first
    pub fn order(&self) -> u16 {
        self.order
    }

    /// Processing order among records with the same order value
    pub fn preference(&self) -> u16 {
        self.preference
    }

    /// Flags controlling rewrite and interpretation, `A-Z0-9`
    pub fn flags(&self) -> &[u8] {
        &self.flags
    }

    /// The service parameters applicable to this delegation path
    pub fn services(&self) -> &[u8] {
        &self.services
    }

    /// The substitution expression applied to the original string
    pub fn regexp(&self) -> &[u8] {
        &self.regexp
    }

    /// The next domain name to query, `.` when the regexp is terminal
    pub fn replacement(&self) -> &Name {
        &self.replacement
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>) -> DnsResult<Naptr> {
    Ok(Naptr::new(
        decoder.read_u16()?,
        decoder.read_u16()?,
        decoder.read_character_data()?.into(),
        decoder.read_character_data()?.into(),
        decoder.read_character_data()?.into(),
        Name::decode(decoder)?,
    ))
}

/// Write the RData to the given encoder, the replacement never compresses
pub fn emit(encoder: &mut WireEncoder<'_>, naptr: &Naptr) -> DnsResult<()> {
    encoder.emit_u16(naptr.order())?;
    encoder.emit_u16(naptr.preference())?;
    encoder.emit_character_data(naptr.flags())?;
    encoder.emit_character_data(naptr.services())?;
    encoder.emit_character_data(naptr.regexp())?;
    naptr.replacement().emit_as_canonical(encoder, true)
}

fn write_quoted(f: &mut fmt::Formatter<'_>, data: &[u8]) -> fmt::Result {
    f.write_str("\"")?;
    for &b in data {
        match b {
            b'"' | b'\\' => write!(f, "\\{}", b as char)?,
            0x20..=0x7E => write!(f, "{}", b as char)?,
            _ => write!(f, "\\{b:03}")?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Naptr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.order, self.preference)?;
        write_quoted(f, &self.flags)?;
        f.write_str(" ")?;
        write_quoted(f, &self.services)?;
        f.write_str(" ")?;
        write_quoted(f, &self.regexp)?;
        write!(f, " {}", self.replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_roundtrip() {
        let rdata = Naptr::new(
            100,
            10,
            b"S".to_vec().into(),
            b"SIP+D2U".to_vec().into(),
            b"".to_vec().into(),
            Name::from_str("_sip._udp.example.com.").unwrap(),
        );

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(read(&mut WireDecoder::new(&bytes)).unwrap(), rdata);
    }
}
