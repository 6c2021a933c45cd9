// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! start of authority record defining ownership and defaults for a zone

use std::fmt;

use crate::error::DnsResult;
use crate::rr::Name;
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncoder};

/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 3.3.13. SOA RDATA format
///
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     /                     MNAME                     /
///     /                                               /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     /                     RNAME                     /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    SERIAL                     |
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    REFRESH                    |
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     RETRY                     |
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    EXPIRE                     |
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    MINIMUM                    |
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///
/// SOA records cause no additional section processing.
///
/// All times are in units of seconds.
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Soa {
    mname: Name,
    rname: Name,
    serial: u32,
    refresh: u32,
    retry: u32,
    expire: u32,
    minimum: u32,
}

impl Soa {
    /// Creates a new SOA record data
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mname: Name,
        rname: Name,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    ) -> Self {
        Self {
            mname,
            rname,
            serial,
            refresh,
            retry,
            expire,
            minimum,
        }
    }

    /// The name of the primary source of data for this zone
    pub fn mname(&self) -> &Name {
        &self.mname
    }

    /// A name which specifies the mailbox of the person responsible
    pub fn rname(&self) -> &Name {
        &self.rname
    }

    /// The unsigned 32 bit version number of the zone, wrapping per RFC 1982
    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// The interval before the zone should be refreshed, in seconds
    pub fn refresh(&self) -> u32 {
        self.refresh
    }

    /// The interval before a failed refresh should be retried, in seconds
    pub fn retry(&self) -> u32 {
        self.retry
    }

    /// The upper limit before the zone is no longer authoritative, in seconds
    pub fn expire(&self) -> u32 {
        self.expire
    }

    /// The minimum TTL exported with any RR from this zone
    pub fn minimum(&self) -> u32 {
        self.minimum
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>) -> DnsResult<Soa> {
    Ok(Soa {
        mname: Name::decode(decoder)?,
        rname: Name::decode(decoder)?,
        serial: decoder.read_u32()?,
        refresh: decoder.read_u32()?,
        retry: decoder.read_u32()?,
        expire: decoder.read_u32()?,
        minimum: decoder.read_u32()?,
    })
}

/// Write the RData to the given encoder, both names lowercase in canonical
/// mode per RFC 4034 6.2
pub fn emit(encoder: &mut WireEncoder<'_>, soa: &Soa) -> DnsResult<()> {
    let is_canonical = encoder.is_canonical_names();
    soa.mname.emit_with_lowercase(encoder, is_canonical)?;
    soa.rname.emit_with_lowercase(encoder, is_canonical)?;
    encoder.emit_u32(soa.serial)?;
    encoder.emit_u32(soa.refresh)?;
    encoder.emit_u32(soa.retry)?;
    encoder.emit_u32(soa.expire)?;
    encoder.emit_u32(soa.minimum)
}

impl fmt::Display for Soa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{mname} {rname} {serial} {refresh} {retry} {expire} {minimum}",
            mname = self.mname,
            rname = self.rname,
            serial = self.serial,
            refresh = self.refresh,
            retry = self.retry,
            expire = self.expire,
            minimum = self.minimum,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_roundtrip() {
        let rdata = Soa::new(
            Name::from_str("ns1.example.com.").unwrap(),
            Name::from_str("hostmaster.example.com.").unwrap(),
            2024010101,
            7200,
            3600,
            1209600,
            86400,
        );

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(read(&mut WireDecoder::new(&bytes)).unwrap(), rdata);
    }

    #[test]
    fn test_display_is_decimal() {
        let rdata = Soa::new(
            Name::from_str("a.").unwrap(),
            Name::from_str("b.").unwrap(),
            u32::MAX,
            1,
            2,
            3,
            4,
        );
        assert_eq!(rdata.to_string(), "a. b. 4294967295 1 2 3 4");
    }
}
