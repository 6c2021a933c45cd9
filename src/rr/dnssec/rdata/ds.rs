// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! delegation signer, the digest of a DNSKEY published in the parent zone

use std::fmt;

use data_encoding::HEXUPPER_PERMISSIVE;

use crate::error::DnsResult;
use crate::rr::dnssec::{Algorithm, DigestType};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-5.1)
///
/// ```text
/// 5.1.  DS RDATA Wire Format
///
///    The RDATA for a DS RR consists of a 2 octet Key Tag field, a 1 octet
///    Algorithm field, a 1 octet Digest Type field, and a Digest field.
///
///                         1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |           Key Tag             |  Algorithm    |  Digest Type  |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    /                                                               /
///    /                            Digest                             /
///    /                                                               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Ds {
    key_tag: u16,
    algorithm: Algorithm,
    digest_type: DigestType,
    digest: Vec<u8>,
}

impl Ds {
    /// Constructs a new DS record data
    pub fn new(key_tag: u16, algorithm: Algorithm, digest_type: DigestType, digest: Vec<u8>) -> Self {
        Self {
            key_tag,
            algorithm,
            digest_type,
            digest,
        }
    }

    /// The tag of the referenced DNSKEY
    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// The algorithm of the referenced DNSKEY
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The algorithm used to construct the digest
    pub fn digest_type(&self) -> DigestType {
        self.digest_type
    }

    /// The digest over the owner name and DNSKEY RDATA
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>, rdata_length: u16) -> DnsResult<Ds> {
    let key_tag = decoder.read_u16()?;
    let algorithm = Algorithm::decode(decoder)?;
    let digest_type = DigestType::from_u8(decoder.read_u8()?);

    let digest_len = (rdata_length as usize)
        .checked_sub(4)
        .ok_or("ds rdata too short")?;
    let digest = decoder.read_vec(digest_len)?;

    Ok(Ds::new(key_tag, algorithm, digest_type, digest))
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, ds: &Ds) -> DnsResult<()> {
    encoder.emit_u16(ds.key_tag())?;
    ds.algorithm().encode(encoder)?;
    encoder.emit_u8(ds.digest_type().into())?;
    encoder.emit_bytes(ds.digest())
}

impl fmt::Display for Ds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{tag} {alg} {ty} {digest}",
            tag = self.key_tag,
            alg = u8::from(self.algorithm),
            ty = u8::from(self.digest_type),
            digest = HEXUPPER_PERMISSIVE.encode(&self.digest),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let rdata = Ds::new(60485, Algorithm::RSASHA1, DigestType::SHA1, vec![0x2B; 20]);

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(
            read(&mut WireDecoder::new(&bytes), bytes.len() as u16).unwrap(),
            rdata
        );
    }
}
