// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! response code carried in the header and, for the high bits, in OPT

use std::fmt;

/// The status code of a response.
///
/// The 4 low bits live in the header; EDNS extends the value with 8 high
/// bits carried in the OPT TTL field, RFC 6891 6.1.3. TSIG error codes
/// share this space, RFC 8945 5.3.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub enum ResponseCode {
    /// No error condition
    #[default]
    NoError,
    /// The name server was unable to interpret the query
    FormErr,
    /// There was a problem with the name server
    ServFail,
    /// The domain name referenced in the query does not exist
    NXDomain,
    /// The name server does not support the requested kind of query
    NotImp,
    /// The name server refuses to perform the operation for policy reasons
    Refused,
    /// Some name that ought not to exist, does exist, RFC 2136
    YXDomain,
    /// Some RRset that ought not to exist, does exist, RFC 2136
    YXRRSet,
    /// Some RRset that ought to exist, does not exist, RFC 2136
    NXRRSet,
    /// The server is not authoritative for the zone named, RFC 2136
    NotAuth,
    /// A name used in the prerequisite or update section is not within the
    /// zone named, RFC 2136
    NotZone,
    /// EDNS version the server does not implement, RFC 6891
    BADVERS,
    /// TSIG signature failure, RFC 8945
    BADSIG,
    /// Key not recognized, RFC 8945
    BADKEY,
    /// Signature out of time window, RFC 8945
    BADTIME,
    /// An unknown or unsupported response code
    Unknown(u16),
}

impl ResponseCode {
    /// The low 4 bits, as stored in the header
    pub fn low(self) -> u8 {
        (u16::from(self) & 0x000F) as u8
    }

    /// The high 8 bits, as stored in the OPT TTL field
    pub fn high(self) -> u8 {
        ((u16::from(self) & 0x0FF0) >> 4) as u8
    }

    /// Build from the 4 header bits
    pub fn from_low(low: u8) -> Self {
        Self::from(u16::from(low & 0x0F))
    }

    /// Reassemble the 12-bit code from the header bits and the OPT high bits
    pub fn from_parts(high: u8, low: u8) -> Self {
        Self::from((u16::from(high) << 4) | u16::from(low & 0x0F))
    }
}

impl From<u16> for ResponseCode {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::FormErr,
            2 => Self::ServFail,
            3 => Self::NXDomain,
            4 => Self::NotImp,
            5 => Self::Refused,
            6 => Self::YXDomain,
            7 => Self::YXRRSet,
            8 => Self::NXRRSet,
            9 => Self::NotAuth,
            10 => Self::NotZone,
            16 => Self::BADVERS,
            // in the TSIG error field 16 is BADSIG; the overlap with BADVERS
            // is resolved by context there, not here
            17 => Self::BADKEY,
            18 => Self::BADTIME,
            _ => Self::Unknown(value),
        }
    }
}

impl From<ResponseCode> for u16 {
    fn from(rcode: ResponseCode) -> Self {
        match rcode {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NXDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::YXDomain => 6,
            ResponseCode::YXRRSet => 7,
            ResponseCode::NXRRSet => 8,
            ResponseCode::NotAuth => 9,
            ResponseCode::NotZone => 10,
            ResponseCode::BADVERS | ResponseCode::BADSIG => 16,
            ResponseCode::BADKEY => 17,
            ResponseCode::BADTIME => 18,
            ResponseCode::Unknown(value) => value,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoError => "NOERROR",
            Self::FormErr => "FORMERR",
            Self::ServFail => "SERVFAIL",
            Self::NXDomain => "NXDOMAIN",
            Self::NotImp => "NOTIMP",
            Self::Refused => "REFUSED",
            Self::YXDomain => "YXDOMAIN",
            Self::YXRRSet => "YXRRSET",
            Self::NXRRSet => "NXRRSET",
            Self::NotAuth => "NOTAUTH",
            Self::NotZone => "NOTZONE",
            Self::BADVERS => "BADVERS",
            Self::BADSIG => "BADSIG",
            Self::BADKEY => "BADKEY",
            Self::BADTIME => "BADTIME",
            Self::Unknown(code) => return write!(f, "RCODE{code}"),
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts() {
        let rcode = ResponseCode::BADVERS;
        assert_eq!(rcode.low(), 0);
        assert_eq!(rcode.high(), 1);
        assert_eq!(ResponseCode::from_parts(1, 0), ResponseCode::BADVERS);

        let rcode = ResponseCode::NXDomain;
        assert_eq!(rcode.low(), 3);
        assert_eq!(rcode.high(), 0);
        assert_eq!(ResponseCode::from_parts(0, 3), ResponseCode::NXDomain);
    }
}
