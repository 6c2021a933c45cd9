// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! record data enum variants and the read/emit dispatch over them

use std::cmp::Ordering;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use enum_as_inner::EnumAsInner;
use tracing::trace;

use crate::error::DnsResult;
use crate::rr::dnssec::rdata::DnssecRData;
use crate::rr::rdata;
use crate::rr::rdata::{Caa, Mx, Naptr, Null, Opt, Soa, Srv, Sshfp, Tlsa, Txt};
use crate::rr::{Name, RecordType};
use crate::serialize::binary::{WireEncode, WireDecoder, WireEncoder};

/// Record data in its typed variants.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 3.3. Standard RRs
///
/// The following RR definitions are expected to occur, at least
/// potentially, in all classes.  In particular, NS, SOA, CNAME, and PTR
/// will be used in all classes, and have the same format in all classes.
/// Because their RDATA format is known, all domain names in the RDATA
/// section of these RRs may be compressed.
/// ```
#[derive(Debug, EnumAsInner, PartialEq, Eq, Clone)]
pub enum RData {
    /// A 32 bit Internet address
    A(Ipv4Addr),
    /// A 128 bit IPv6 address, RFC 3596
    AAAA(Ipv6Addr),
    /// A Certification Authority Authorization property, RFC 6844
    CAA(Caa),
    /// The canonical name for an alias
    CNAME(Name),
    /// A mail exchange for the owner name
    MX(Mx),
    /// A naming authority pointer, RFC 3403
    NAPTR(Naptr),
    /// An authoritative name server
    NS(Name),
    /// Opaque data; also the empty RDATA used by update sentinels
    NULL(Null),
    /// The EDNS options of an OPT pseudo-record, RFC 6891
    OPT(Opt),
    /// A pointer to another part of the domain name space
    PTR(Name),
    /// The start of a zone of authority
    SOA(Soa),
    /// The location of a service, RFC 2782
    SRV(Srv),
    /// An SSH public key fingerprint, RFC 4255
    SSHFP(Sshfp),
    /// A TLS certificate association, RFC 6698
    TLSA(Tlsa),
    /// Descriptive text strings
    TXT(Txt),
    /// DNSSEC and transaction authentication records
    DNSSEC(DnssecRData),
    /// An unknown type, the RDATA is preserved as raw bytes
    Unknown {
        /// the original type code
        code: u16,
        /// the raw RDATA bytes
        rdata: Null,
    },
    /// No record data, type code 0
    ZERO,
}

impl RData {
    /// Read the RData for `record_type` from the decoder, verifying that
    /// exactly `rdata_length` bytes are consumed
    pub fn read(
        decoder: &mut WireDecoder<'_>,
        record_type: RecordType,
        rdata_length: u16,
    ) -> DnsResult<Self> {
        let start_idx = decoder.index();
        trace!("reading {record_type} rdata of {rdata_length} bytes");

        let result = match record_type {
            RecordType::A => rdata::a::read(decoder).map(Self::A),
            RecordType::AAAA => rdata::aaaa::read(decoder).map(Self::AAAA),
            RecordType::CAA => rdata::caa::read(decoder, rdata_length).map(Self::CAA),
            RecordType::CNAME => rdata::name::read(decoder).map(Self::CNAME),
            RecordType::MX => rdata::mx::read(decoder).map(Self::MX),
            RecordType::NAPTR => rdata::naptr::read(decoder).map(Self::NAPTR),
            RecordType::NS => rdata::name::read(decoder).map(Self::NS),
            RecordType::NULL => rdata::null::read(decoder, rdata_length).map(Self::NULL),
            RecordType::OPT => rdata::opt::read(decoder, rdata_length).map(Self::OPT),
            RecordType::PTR => rdata::name::read(decoder).map(Self::PTR),
            RecordType::SOA => rdata::soa::read(decoder).map(Self::SOA),
            RecordType::SRV => rdata::srv::read(decoder).map(Self::SRV),
            RecordType::SSHFP => rdata::sshfp::read(decoder, rdata_length).map(Self::SSHFP),
            RecordType::TLSA => rdata::tlsa::read(decoder, rdata_length).map(Self::TLSA),
            RecordType::TXT => rdata::txt::read(decoder, rdata_length).map(Self::TXT),
            RecordType::CDNSKEY
            | RecordType::CDS
            | RecordType::DNSKEY
            | RecordType::DS
            | RecordType::NSEC
            | RecordType::NSEC3
            | RecordType::NSEC3PARAM
            | RecordType::RRSIG
            | RecordType::SIG
            | RecordType::TSIG => {
                DnssecRData::read(decoder, record_type, rdata_length).map(Self::DNSSEC)
            }
            RecordType::ZERO => {
                // nothing legitimately lives here, skip whatever was claimed
                decoder.read_slice(rdata_length as usize)?;
                return Ok(Self::ZERO);
            }
            rt @ (RecordType::ANY | RecordType::AXFR) => {
                return Err(format!("{rt} is a query type, not record data").into());
            }
            RecordType::Unknown(code) => {
                rdata::null::read(decoder, rdata_length).map(|rdata| Self::Unknown { code, rdata })
            }
        }?;

        // enforce that consumed bytes equal the claimed rdlength
        let read = decoder.index() - start_idx;
        if read != rdata_length as usize {
            return Err(crate::error::DnsErrorKind::IncorrectRDataLengthRead {
                read,
                len: rdata_length as usize,
            }
            .into());
        }

        Ok(result)
    }

    /// Write the RData to the given encoder.
    ///
    /// Per RFC 3597 4, only the RFC 1035 well-known types may compress the
    /// names inside their RDATA; every other type is written with the
    /// encoder in canonical mode, which also lowercases for signing per
    /// RFC 4034 6.2.
    pub fn emit(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()> {
        match self {
            Self::A(address) => rdata::a::emit(encoder, *address),
            Self::AAAA(address) => rdata::aaaa::emit(encoder, address),
            Self::CAA(caa) => rdata::caa::emit(encoder, caa),
            Self::CNAME(name) | Self::NS(name) | Self::PTR(name) => {
                rdata::name::emit(encoder, name)
            }
            Self::MX(mx) => rdata::mx::emit(encoder, mx),
            Self::NAPTR(naptr) => rdata::naptr::emit(encoder, naptr),
            Self::NULL(null) => rdata::null::emit(encoder, null),
            Self::OPT(opt) => rdata::opt::emit(encoder, opt),
            Self::SOA(soa) => rdata::soa::emit(encoder, soa),
            Self::SRV(srv) => encoder.with_canonical_names(|encoder| rdata::srv::emit(encoder, srv)),
            Self::SSHFP(sshfp) => {
                encoder.with_canonical_names(|encoder| rdata::sshfp::emit(encoder, sshfp))
            }
            Self::TLSA(tlsa) => {
                encoder.with_canonical_names(|encoder| rdata::tlsa::emit(encoder, tlsa))
            }
            Self::TXT(txt) => rdata::txt::emit(encoder, txt),
            Self::DNSSEC(rdata) => encoder.with_canonical_names(|encoder| rdata.emit(encoder)),
            Self::Unknown { rdata, .. } => rdata::null::emit(encoder, rdata),
            Self::ZERO => Ok(()),
        }
    }

    /// The record type matching this data
    pub fn to_record_type(&self) -> RecordType {
        match self {
            Self::A(..) => RecordType::A,
            Self::AAAA(..) => RecordType::AAAA,
            Self::CAA(..) => RecordType::CAA,
            Self::CNAME(..) => RecordType::CNAME,
            Self::MX(..) => RecordType::MX,
            Self::NAPTR(..) => RecordType::NAPTR,
            Self::NS(..) => RecordType::NS,
            Self::NULL(..) => RecordType::NULL,
            Self::OPT(..) => RecordType::OPT,
            Self::PTR(..) => RecordType::PTR,
            Self::SOA(..) => RecordType::SOA,
            Self::SRV(..) => RecordType::SRV,
            Self::SSHFP(..) => RecordType::SSHFP,
            Self::TLSA(..) => RecordType::TLSA,
            Self::TXT(..) => RecordType::TXT,
            Self::DNSSEC(rdata) => rdata.to_record_type(),
            Self::Unknown { code, .. } => RecordType::Unknown(*code),
            Self::ZERO => RecordType::ZERO,
        }
    }

    /// If this is an A or AAAA record, returns the address
    pub fn to_ip_addr(&self) -> Option<IpAddr> {
        match self {
            Self::A(a) => Some(IpAddr::from(*a)),
            Self::AAAA(aaaa) => Some(IpAddr::from(*aaaa)),
            _ => None,
        }
    }

    /// The canonical wire form of the RDATA, used for RFC 4034 6.3 ordering
    fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = WireEncoder::new(&mut buf);
            encoder.set_canonical_names(true);
            // an encode failure leaves an empty buffer; ordering remains
            // total, if arbitrary, for such values
            let _ = self.emit(&mut encoder);
        }
        buf
    }
}

impl WireEncode for RData {
    fn encode(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()> {
        self.emit(encoder)
    }
}

impl PartialOrd<Self> for RData {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RData {
    /// RFC 4034 6.3: within an RRset, records sort by treating the RDATA of
    /// the canonical form as a left-justified unsigned octet sequence
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_canonical_bytes().cmp(&other.to_canonical_bytes())
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A(address) => address.fmt(f),
            Self::AAAA(address) => address.fmt(f),
            Self::CAA(caa) => caa.fmt(f),
            Self::CNAME(name) | Self::NS(name) | Self::PTR(name) => name.fmt(f),
            Self::MX(mx) => mx.fmt(f),
            Self::NAPTR(naptr) => naptr.fmt(f),
            Self::NULL(null) => null.fmt(f),
            Self::OPT(opt) => opt.fmt(f),
            Self::SOA(soa) => soa.fmt(f),
            Self::SRV(srv) => srv.fmt(f),
            Self::SSHFP(sshfp) => sshfp.fmt(f),
            Self::TLSA(tlsa) => tlsa.fmt(f),
            Self::TXT(txt) => txt.fmt(f),
            Self::DNSSEC(rdata) => rdata.fmt(f),
            Self::Unknown { rdata, .. } => rdata.fmt(f),
            Self::ZERO => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn roundtrip(rdata: RData) {
        let record_type = rdata.to_record_type();

        let mut bytes = Vec::new();
        rdata.emit(&mut WireEncoder::new(&mut bytes)).unwrap();

        let mut decoder = WireDecoder::new(&bytes);
        let decoded = RData::read(&mut decoder, record_type, bytes.len() as u16).unwrap();
        assert_eq!(decoded, rdata);
    }

    #[test]
    fn test_roundtrip_each_variant() {
        roundtrip(RData::A(Ipv4Addr::new(203, 0, 113, 7)));
        roundtrip(RData::AAAA(Ipv6Addr::from_str("2001:db8::42").unwrap()));
        roundtrip(RData::CAA(
            Caa::new(false, "iodef", b"mailto:sec@example.com".to_vec()).unwrap(),
        ));
        roundtrip(RData::CNAME(Name::from_str("alias.example.com.").unwrap()));
        roundtrip(RData::MX(Mx::new(
            5,
            Name::from_str("mx.example.com.").unwrap(),
        )));
        roundtrip(RData::NS(Name::from_str("ns1.example.com.").unwrap()));
        roundtrip(RData::NULL(Null::with(vec![1, 2, 3])));
        roundtrip(RData::PTR(Name::from_str("www.example.com.").unwrap()));
        roundtrip(RData::SRV(Srv::new(
            0,
            1,
            443,
            Name::from_str("www.example.com.").unwrap(),
        )));
        roundtrip(RData::SSHFP(Sshfp::new(1, 1, vec![0u8; 20])));
        roundtrip(RData::TLSA(Tlsa::new(0, 0, 1, vec![0xFFu8; 32])));
        roundtrip(RData::TXT(Txt::new(vec!["hello world".to_string()])));
        roundtrip(RData::Unknown {
            code: 65280,
            rdata: Null::with(vec![0xDE, 0xAD]),
        });
    }

    #[test]
    fn test_wrong_rdlength_is_error() {
        let rdata = RData::A(Ipv4Addr::new(127, 0, 0, 1));
        let mut bytes = Vec::new();
        rdata.emit(&mut WireEncoder::new(&mut bytes)).unwrap();

        // claim 5 bytes for a 4 byte address
        bytes.push(0);
        let mut decoder = WireDecoder::new(&bytes);
        assert!(RData::read(&mut decoder, RecordType::A, 5).is_err());
    }

    #[test]
    fn test_canonical_rdata_ordering() {
        let mut rdatas = vec![
            RData::A(Ipv4Addr::new(10, 0, 0, 2)),
            RData::A(Ipv4Addr::new(10, 0, 0, 1)),
            RData::A(Ipv4Addr::new(9, 255, 255, 255)),
        ];
        rdatas.sort();
        assert_eq!(
            rdatas,
            vec![
                RData::A(Ipv4Addr::new(9, 255, 255, 255)),
                RData::A(Ipv4Addr::new(10, 0, 0, 1)),
                RData::A(Ipv4Addr::new(10, 0, 0, 2)),
            ]
        );
    }
}
