// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! DNSSEC signing and verification algorithm numbers

use std::fmt;
use std::str::FromStr;

use crate::error::{DnsError, DnsResult};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#appendix-A.1)
///
/// The DNSKEY algorithm field identifies the public key's cryptographic
/// algorithm; the same registry is used by DS, RRSIG and SIG records.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, PartialOrd, Ord)]
pub enum Algorithm {
    /// DSA/SHA-1, RFC 2536. Key files parse, but signing is rejected.
    DSA,
    /// RSA/SHA-1, RFC 3110
    RSASHA1,
    /// RSA/SHA-1 for NSEC3 zones, RFC 5155
    RSASHA1NSEC3SHA1,
    /// RSA/SHA-256, RFC 5702
    RSASHA256,
    /// RSA/SHA-512, RFC 5702
    RSASHA512,
    /// An unknown or unsupported algorithm number
    Unknown(u8),
}

impl Algorithm {
    /// Decode the algorithm field
    pub fn from_u8(value: u8) -> Self {
        match value {
            3 => Self::DSA,
            5 => Self::RSASHA1,
            7 => Self::RSASHA1NSEC3SHA1,
            8 => Self::RSASHA256,
            10 => Self::RSASHA512,
            _ => Self::Unknown(value),
        }
    }

    /// Whether this crate can produce and verify signatures with the
    /// algorithm. DSA is deliberately excluded, see the key module.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            Self::RSASHA1 | Self::RSASHA1NSEC3SHA1 | Self::RSASHA256 | Self::RSASHA512
        )
    }
}

impl From<Algorithm> for u8 {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::DSA => 3,
            Algorithm::RSASHA1 => 5,
            Algorithm::RSASHA1NSEC3SHA1 => 7,
            Algorithm::RSASHA256 => 8,
            Algorithm::RSASHA512 => 10,
            Algorithm::Unknown(value) => value,
        }
    }
}

impl WireEncode for Algorithm {
    fn encode(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()> {
        encoder.emit_u8((*self).into())
    }
}

impl<'r> WireDecode<'r> for Algorithm {
    fn decode(decoder: &mut WireDecoder<'r>) -> DnsResult<Self> {
        decoder.read_u8().map(Self::from_u8)
    }
}

impl FromStr for Algorithm {
    type Err = DnsError;

    fn from_str(s: &str) -> DnsResult<Self> {
        match s {
            "DSA" => Ok(Self::DSA),
            "RSASHA1" => Ok(Self::RSASHA1),
            "RSASHA1-NSEC3-SHA1" => Ok(Self::RSASHA1NSEC3SHA1),
            "RSASHA256" => Ok(Self::RSASHA256),
            "RSASHA512" => Ok(Self::RSASHA512),
            _ => Err(DnsError::from(format!("unknown algorithm: {s}"))),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DSA => "DSA",
            Self::RSASHA1 => "RSASHA1",
            Self::RSASHA1NSEC3SHA1 => "RSASHA1-NSEC3-SHA1",
            Self::RSASHA256 => "RSASHA256",
            Self::RSASHA512 => "RSASHA512",
            Self::Unknown(code) => return write!(f, "ALG{code}"),
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_roundtrip() {
        for alg in [
            Algorithm::DSA,
            Algorithm::RSASHA1,
            Algorithm::RSASHA1NSEC3SHA1,
            Algorithm::RSASHA256,
            Algorithm::RSASHA512,
            Algorithm::Unknown(200),
        ] {
            assert_eq!(Algorithm::from_u8(u8::from(alg)), alg);
        }
    }

    #[test]
    fn test_support() {
        assert!(Algorithm::RSASHA256.is_supported());
        assert!(!Algorithm::DSA.is_supported());
        assert!(!Algorithm::Unknown(253).is_supported());
    }
}
