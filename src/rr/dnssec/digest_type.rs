// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! DS record digest type numbers

use openssl::hash::MessageDigest;

use crate::error::{DnsErrorKind, DnsResult};

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#appendix-A.2)
///
/// The DS digest type registry, also used by CDS.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum DigestType {
    /// RFC 3658
    SHA1,
    /// RFC 4509
    SHA256,
    /// RFC 6605
    SHA384,
    /// An unknown digest type, the code is preserved
    Unknown(u8),
}

impl DigestType {
    /// Decode the digest type field
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::SHA1,
            2 => Self::SHA256,
            4 => Self::SHA384,
            _ => Self::Unknown(value),
        }
    }

    /// The corresponding openssl digest
    pub fn to_openssl_digest(self) -> DnsResult<MessageDigest> {
        match self {
            Self::SHA1 => Ok(MessageDigest::sha1()),
            Self::SHA256 => Ok(MessageDigest::sha256()),
            Self::SHA384 => Ok(MessageDigest::sha384()),
            Self::Unknown(value) => Err(DnsErrorKind::UnsupportedAlgorithm(value).into()),
        }
    }
}

impl From<DigestType> for u8 {
    fn from(digest_type: DigestType) -> Self {
        match digest_type {
            DigestType::SHA1 => 1,
            DigestType::SHA256 => 2,
            DigestType::SHA384 => 4,
            DigestType::Unknown(value) => value,
        }
    }
}
