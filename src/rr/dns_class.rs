// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! class of DNS operations, in general always IN for internet

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{DnsError, DnsResult};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// The DNS record class
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum DnsClass {
    /// Internet
    IN,
    /// Chaos
    CH,
    /// Hesiod
    HS,
    /// QCLASS NONE, used by update prerequisites and deletes
    NONE,
    /// QCLASS * (ANY)
    ANY,
    /// Special class for OPT, the field is overloaded as the requestor's
    /// maximum UDP payload size - RFC 6891
    OPT(u16),
}

impl DnsClass {
    /// Convert from u16 to DnsClass
    pub fn from_u16(value: u16) -> DnsResult<Self> {
        match value {
            1 => Ok(Self::IN),
            3 => Ok(Self::CH),
            4 => Ok(Self::HS),
            254 => Ok(Self::NONE),
            255 => Ok(Self::ANY),
            _ => Err(DnsError::from(format!("unknown dns class: {value}"))),
        }
    }

    /// Convert the OPT-overloaded class field, `Values lower than 512 MUST
    /// be treated as equal to 512`
    pub fn for_opt(value: u16) -> Self {
        Self::OPT(value.max(512))
    }
}

impl From<DnsClass> for u16 {
    fn from(class: DnsClass) -> Self {
        match class {
            DnsClass::IN => 1,
            DnsClass::CH => 3,
            DnsClass::HS => 4,
            DnsClass::NONE => 254,
            DnsClass::ANY => 255,
            DnsClass::OPT(size) => size.max(512),
        }
    }
}

impl WireEncode for DnsClass {
    fn encode(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()> {
        encoder.emit_u16((*self).into())
    }
}

impl<'r> WireDecode<'r> for DnsClass {
    fn decode(decoder: &mut WireDecoder<'r>) -> DnsResult<Self> {
        Self::from_u16(decoder.read_u16()?)
    }
}

impl FromStr for DnsClass {
    type Err = DnsError;

    fn from_str(s: &str) -> DnsResult<Self> {
        match s {
            "IN" => Ok(Self::IN),
            "CH" => Ok(Self::CH),
            "HS" => Ok(Self::HS),
            "NONE" => Ok(Self::NONE),
            "ANY" | "*" => Ok(Self::ANY),
            _ => Err(DnsError::from(format!("unknown dns class: {s}"))),
        }
    }
}

impl fmt::Display for DnsClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::IN => "IN",
            Self::CH => "CH",
            Self::HS => "HS",
            Self::NONE => "NONE",
            Self::ANY => "ANY",
            Self::OPT(_) => "OPT",
        };
        f.write_str(s)
    }
}

impl Default for DnsClass {
    fn default() -> Self {
        Self::IN
    }
}

impl PartialOrd<Self> for DnsClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DnsClass {
    fn cmp(&self, other: &Self) -> Ordering {
        u16::from(*self).cmp(&u16::from(*other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_roundtrip() {
        for class in [
            DnsClass::IN,
            DnsClass::CH,
            DnsClass::HS,
            DnsClass::NONE,
            DnsClass::ANY,
        ] {
            assert_eq!(DnsClass::from_u16(u16::from(class)).unwrap(), class);
        }
        assert!(DnsClass::from_u16(2).is_err());
    }

    #[test]
    fn test_opt_payload_floor() {
        assert_eq!(u16::from(DnsClass::for_opt(100)), 512);
        assert_eq!(u16::from(DnsClass::for_opt(4096)), 4096);
    }
}
