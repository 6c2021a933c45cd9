// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! record type definitions

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{DnsError, DnsResult};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// The type of the resource record.
///
/// This specifies the type of data in the RDATA field.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
#[allow(dead_code)]
pub enum RecordType {
    /// RFC 1035 IPv4 address record
    A,
    /// RFC 3596 IPv6 address record
    AAAA,
    /// RFC 1035 All cached records, aka `*`
    ANY,
    /// RFC 1035 Authoritative zone transfer
    AXFR,
    /// RFC 6844 Certification Authority Authorization
    CAA,
    /// RFC 7344 Child DS
    CDS,
    /// RFC 7344 Child DNSKEY
    CDNSKEY,
    /// RFC 1035 Canonical name record
    CNAME,
    /// RFC 4034 DNS key record
    DNSKEY,
    /// RFC 4034 Delegation signer
    DS,
    /// RFC 1035 Mail exchange record
    MX,
    /// RFC 3403 Naming authority pointer
    NAPTR,
    /// RFC 1035 Name server record
    NS,
    /// RFC 4034 Next-secure record
    NSEC,
    /// RFC 5155 NSEC record version 3
    NSEC3,
    /// RFC 5155 NSEC3 parameters
    NSEC3PARAM,
    /// RFC 1035 Null record, empty RDATA, used by update sentinels
    NULL,
    /// RFC 6891 Option pseudo record for EDNS
    OPT,
    /// RFC 1035 Pointer record
    PTR,
    /// RFC 4034 DNSSEC signature
    RRSIG,
    /// RFC 2535 and RFC 2931 Signature, transaction authentication
    SIG,
    /// RFC 1035 and RFC 2308 Start of authority record
    SOA,
    /// RFC 2782 Service locator
    SRV,
    /// RFC 4255 SSH public key fingerprint
    SSHFP,
    /// RFC 6698 TLSA certificate association
    TLSA,
    /// RFC 8945 Transaction signature
    TSIG,
    /// RFC 1035 Text record
    TXT,
    /// Unknown record type, the code is preserved
    Unknown(u16),
    /// This corresponds to a record type of 0, unspecified
    ZERO,
}

impl Default for RecordType {
    fn default() -> Self {
        Self::A
    }
}

impl From<u16> for RecordType {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::ZERO,
            1 => Self::A,
            2 => Self::NS,
            5 => Self::CNAME,
            6 => Self::SOA,
            10 => Self::NULL,
            12 => Self::PTR,
            15 => Self::MX,
            16 => Self::TXT,
            24 => Self::SIG,
            28 => Self::AAAA,
            33 => Self::SRV,
            35 => Self::NAPTR,
            41 => Self::OPT,
            43 => Self::DS,
            44 => Self::SSHFP,
            46 => Self::RRSIG,
            47 => Self::NSEC,
            48 => Self::DNSKEY,
            50 => Self::NSEC3,
            51 => Self::NSEC3PARAM,
            52 => Self::TLSA,
            59 => Self::CDS,
            60 => Self::CDNSKEY,
            250 => Self::TSIG,
            252 => Self::AXFR,
            255 => Self::ANY,
            257 => Self::CAA,
            _ => Self::Unknown(value),
        }
    }
}

impl From<RecordType> for u16 {
    fn from(rt: RecordType) -> Self {
        match rt {
            RecordType::ZERO => 0,
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::NULL => 10,
            RecordType::PTR => 12,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::SIG => 24,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::OPT => 41,
            RecordType::DS => 43,
            RecordType::SSHFP => 44,
            RecordType::RRSIG => 46,
            RecordType::NSEC => 47,
            RecordType::DNSKEY => 48,
            RecordType::NSEC3 => 50,
            RecordType::NSEC3PARAM => 51,
            RecordType::TLSA => 52,
            RecordType::CDS => 59,
            RecordType::CDNSKEY => 60,
            RecordType::TSIG => 250,
            RecordType::AXFR => 252,
            RecordType::ANY => 255,
            RecordType::CAA => 257,
            RecordType::Unknown(code) => code,
        }
    }
}

impl FromStr for RecordType {
    type Err = DnsError;

    fn from_str(s: &str) -> DnsResult<Self> {
        match s {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::AAAA),
            "ANY" | "*" => Ok(Self::ANY),
            "AXFR" => Ok(Self::AXFR),
            "CAA" => Ok(Self::CAA),
            "CDS" => Ok(Self::CDS),
            "CDNSKEY" => Ok(Self::CDNSKEY),
            "CNAME" => Ok(Self::CNAME),
            "DNSKEY" => Ok(Self::DNSKEY),
            "DS" => Ok(Self::DS),
            "MX" => Ok(Self::MX),
            "NAPTR" => Ok(Self::NAPTR),
            "NS" => Ok(Self::NS),
            "NSEC" => Ok(Self::NSEC),
            "NSEC3" => Ok(Self::NSEC3),
            "NSEC3PARAM" => Ok(Self::NSEC3PARAM),
            "NULL" => Ok(Self::NULL),
            "OPT" => Ok(Self::OPT),
            "PTR" => Ok(Self::PTR),
            "RRSIG" => Ok(Self::RRSIG),
            "SIG" => Ok(Self::SIG),
            "SOA" => Ok(Self::SOA),
            "SRV" => Ok(Self::SRV),
            "SSHFP" => Ok(Self::SSHFP),
            "TLSA" => Ok(Self::TLSA),
            "TSIG" => Ok(Self::TSIG),
            "TXT" => Ok(Self::TXT),
            _ => Err(DnsError::from(format!("unknown record type: {s}"))),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::A => f.write_str("A"),
            Self::AAAA => f.write_str("AAAA"),
            Self::ANY => f.write_str("ANY"),
            Self::AXFR => f.write_str("AXFR"),
            Self::CAA => f.write_str("CAA"),
            Self::CDS => f.write_str("CDS"),
            Self::CDNSKEY => f.write_str("CDNSKEY"),
            Self::CNAME => f.write_str("CNAME"),
            Self::DNSKEY => f.write_str("DNSKEY"),
            Self::DS => f.write_str("DS"),
            Self::MX => f.write_str("MX"),
            Self::NAPTR => f.write_str("NAPTR"),
            Self::NS => f.write_str("NS"),
            Self::NSEC => f.write_str("NSEC"),
            Self::NSEC3 => f.write_str("NSEC3"),
            Self::NSEC3PARAM => f.write_str("NSEC3PARAM"),
            Self::NULL => f.write_str("NULL"),
            Self::OPT => f.write_str("OPT"),
            Self::PTR => f.write_str("PTR"),
            Self::RRSIG => f.write_str("RRSIG"),
            Self::SIG => f.write_str("SIG"),
            Self::SOA => f.write_str("SOA"),
            Self::SRV => f.write_str("SRV"),
            Self::SSHFP => f.write_str("SSHFP"),
            Self::TLSA => f.write_str("TLSA"),
            Self::TSIG => f.write_str("TSIG"),
            Self::TXT => f.write_str("TXT"),
            Self::Unknown(code) => write!(f, "TYPE{code}"),
            Self::ZERO => f.write_str("ZERO"),
        }
    }
}

impl WireEncode for RecordType {
    fn encode(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()> {
        encoder.emit_u16((*self).into())
    }
}

impl<'r> WireDecode<'r> for RecordType {
    fn decode(decoder: &mut WireDecoder<'r>) -> DnsResult<Self> {
        decoder.read_u16().map(Self::from)
    }
}

impl PartialOrd<Self> for RecordType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordType {
    /// Record types order by their type code, as used when canonically
    /// ordering an RRset for signing
    fn cmp(&self, other: &Self) -> Ordering {
        u16::from(*self).cmp(&u16::from(*other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_roundtrip() {
        for code in 0..=1024u16 {
            assert_eq!(u16::from(RecordType::from(code)), code);
        }
    }

    #[test]
    fn test_str_roundtrip() {
        for rt in [
            RecordType::A,
            RecordType::AAAA,
            RecordType::CAA,
            RecordType::MX,
            RecordType::NSEC3PARAM,
            RecordType::TSIG,
        ] {
            assert_eq!(RecordType::from_str(&rt.to_string()).unwrap(), rt);
        }
        assert!(RecordType::from_str("BOGUS").is_err());
    }
}
