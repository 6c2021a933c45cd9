// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! resource record implementation

use std::cmp::Ordering;
use std::fmt;

use crate::error::{DnsErrorKind, DnsResult};
use crate::rr::{DnsClass, Name, RData, RecordType};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// Resource records are the storage value of DNS, into which all key/value
/// pair data is stored.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 4.1.3. Resource record format
///
/// The answer, authority, and additional sections all share the same
/// format: a variable number of resource records, where the number of
/// records is specified in the corresponding count field in the header.
/// Each resource record has the following format:
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                                               |
///     /                                               /
///     /                      NAME                     /
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TYPE                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     CLASS                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TTL                      |
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                   RDLENGTH                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     /                     RDATA                     /
///     /                                               /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Clone, Debug, Eq)]
pub struct Record {
    name: Name,
    rr_type: RecordType,
    dns_class: DnsClass,
    ttl: u32,
    rdata: RData,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            name: Name::new(),
            rr_type: RecordType::NULL,
            dns_class: DnsClass::IN,
            ttl: 0,
            // the empty rdata of the update sentinels, RDLENGTH 0 on the wire
            rdata: RData::ZERO,
        }
    }
}

impl Record {
    /// A record with no data, useful as a base for the setters
    pub fn new() -> Self {
        Self::default()
    }

    /// A record of the type matching `rdata`, class IN
    pub fn from_rdata(name: Name, ttl: u32, rdata: RData) -> Self {
        Self {
            name,
            rr_type: rdata.to_record_type(),
            dns_class: DnsClass::IN,
            ttl,
            rdata,
        }
    }

    /// An empty-RDATA record of the given type, as used by the RFC 2136
    /// prerequisite and delete sentinels
    pub fn with(name: Name, rr_type: RecordType, ttl: u32) -> Self {
        Self {
            name,
            rr_type,
            dns_class: DnsClass::IN,
            ttl,
            rdata: RData::ZERO,
        }
    }

    /// Sets the owner name
    pub fn set_name(&mut self, name: Name) -> &mut Self {
        self.name = name;
        self
    }

    /// Sets the record type; only meaningful while the RDATA is empty
    pub fn set_record_type(&mut self, rr_type: RecordType) -> &mut Self {
        self.rr_type = rr_type;
        self
    }

    /// Sets the class
    pub fn set_dns_class(&mut self, dns_class: DnsClass) -> &mut Self {
        self.dns_class = dns_class;
        self
    }

    /// Sets the time to live
    pub fn set_ttl(&mut self, ttl: u32) -> &mut Self {
        self.ttl = ttl;
        self
    }

    /// Sets the record data, aligning the record type with it
    pub fn set_data(&mut self, rdata: RData) -> &mut Self {
        if !matches!(rdata, RData::ZERO) {
            self.rr_type = rdata.to_record_type();
        }
        self.rdata = rdata;
        self
    }

    /// The owner name of the record
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The type of the record
    pub fn record_type(&self) -> RecordType {
        self.rr_type
    }

    /// The class of the record
    pub fn dns_class(&self) -> DnsClass {
        self.dns_class
    }

    /// The time this record may be cached for, in seconds
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// The record data
    pub fn data(&self) -> &RData {
        &self.rdata
    }

    /// Consumes the record, returning its data
    pub fn into_data(self) -> RData {
        self.rdata
    }
}

impl WireEncode for Record {
    fn encode(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()> {
        self.name.encode(encoder)?;
        self.rr_type.encode(encoder)?;
        self.dns_class.encode(encoder)?;
        encoder.emit_u32(self.ttl)?;

        // RDLENGTH is written after the RDATA is, it is never carried over
        let place = encoder.place_u16()?;
        self.rdata.emit(encoder)?;
        let len = encoder.len_since_place(&place);
        debug_assert!(len <= u16::MAX as usize);
        encoder.emit_u16_at(place, len as u16);

        Ok(())
    }
}

impl<'r> WireDecode<'r> for Record {
    fn decode(decoder: &mut WireDecoder<'r>) -> DnsResult<Self> {
        let name = Name::decode(decoder)?;
        let rr_type = RecordType::decode(decoder)?;

        // the class field is overloaded by the OPT pseudo-record, RFC 6891
        let dns_class = if rr_type == RecordType::OPT {
            if !name.is_root() {
                return Err(DnsErrorKind::EdnsNameNotRoot(name).into());
            }
            DnsClass::for_opt(decoder.read_u16()?)
        } else {
            DnsClass::decode(decoder)?
        };

        let ttl = decoder.read_u32()?;
        let rdata_length = decoder.read_u16()?;

        let rdata = if rdata_length == 0 {
            RData::ZERO
        } else {
            RData::read(decoder, rr_type, rdata_length)?
        };

        Ok(Self {
            name,
            rr_type,
            dns_class,
            ttl,
            rdata,
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{name} {ttl} {class} {ty}",
            name = self.name,
            ttl = self.ttl,
            class = self.dns_class,
            ty = self.rr_type,
        )?;

        if !matches!(self.rdata, RData::ZERO) {
            write!(f, " {}", self.rdata)?;
        }

        Ok(())
    }
}

impl PartialEq for Record {
    /// Equality of records as defined by
    /// [RFC 2136](https://tools.ietf.org/html/rfc2136), DNS Update, April 1997
    ///
    /// ```text
    ///   1.1.1. Two RRs are considered equal if their NAME, CLASS, TYPE,
    ///   RDLENGTH and RDATA fields are equal.  Note that the time-to-live
    ///   (TTL) field is explicitly excluded from the comparison.
    /// ```
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.rr_type == other.rr_type
            && self.dns_class == other.dns_class
            && self.rdata == other.rdata
    }
}

impl PartialOrd<Self> for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Record {
    /// Canonical ordering as defined by
    /// [RFC 4034](https://tools.ietf.org/html/rfc4034#section-6), DNSSEC
    /// Resource Records, March 2005
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.rr_type.cmp(&other.rr_type))
            .then_with(|| self.dns_class.cmp(&other.dns_class))
            .then_with(|| self.ttl.cmp(&other.ttl))
            .then_with(|| self.rdata.cmp(&other.rdata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    #[test]
    fn test_roundtrip() {
        let record = Record::from_rdata(
            Name::from_str("www.example.com.").unwrap(),
            3600,
            RData::A(Ipv4Addr::new(93, 184, 216, 34)),
        );

        let bytes = record.to_bytes().unwrap();
        let decoded = Record::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.ttl(), 3600);
    }

    #[test]
    fn test_empty_rdata_roundtrip() {
        let mut record = Record::with(
            Name::from_str("www.example.com.").unwrap(),
            RecordType::A,
            0,
        );
        record.set_dns_class(DnsClass::ANY);

        let bytes = record.to_bytes().unwrap();
        // rdlength must be zero
        assert_eq!(&bytes[bytes.len() - 2..], &[0, 0]);

        let decoded = Record::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.record_type(), RecordType::A);
        assert_eq!(decoded.dns_class(), DnsClass::ANY);
        assert!(matches!(decoded.data(), RData::ZERO));
    }

    #[test]
    fn test_ttl_excluded_from_eq() {
        let name = Name::from_str("a.example.com.").unwrap();
        let one = Record::from_rdata(name.clone(), 1, RData::A(Ipv4Addr::new(1, 1, 1, 1)));
        let two = Record::from_rdata(name, 99, RData::A(Ipv4Addr::new(1, 1, 1, 1)));
        assert_eq!(one, two);
    }

    #[test]
    fn test_opt_requires_root_owner() {
        let mut bytes = Vec::new();
        {
            let mut encoder = WireEncoder::new(&mut bytes);
            Name::from_str("x.example.com.")
                .unwrap()
                .encode(&mut encoder)
                .unwrap();
            RecordType::OPT.encode(&mut encoder).unwrap();
            encoder.emit_u16(4096).unwrap();
            encoder.emit_u32(0).unwrap();
            encoder.emit_u16(0).unwrap();
        }
        assert!(Record::from_bytes(&bytes).is_err());
    }
}
