// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! signature record data, shared by RRSIG (RFC 4034) and the transaction
//! signature SIG(0) (RFC 2931), whose wire formats are identical

use std::fmt;

use data_encoding::BASE64;

use crate::error::DnsResult;
use crate::rr::dnssec::Algorithm;
use crate::rr::{Name, RecordType};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-3.1)
///
/// ```text
/// 3.1.  RRSIG RDATA Wire Format
///
///    The RDATA for an RRSIG RR consists of a 2 octet Type Covered field, a
///    1 octet Algorithm field, a 1 octet Labels field, a 4 octet Original
///    TTL field, a 4 octet Signature Expiration field, a 4 octet Signature
///    Inception field, a 2 octet Key tag, the Signer's Name field, and the
///    Signature field.
///
///                         1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |        Type Covered           |  Algorithm    |     Labels    |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |                         Original TTL                          |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |                      Signature Expiration                     |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |                      Signature Inception                      |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |            Key Tag            |                               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+         Signer's Name         /
///    /                                                               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    /                                                               /
///    /                            Signature                          /
///    /                                                               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// For SIG(0) the Type Covered field is zero and the owner, TTL and
/// original TTL are meaningless.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Sig {
    type_covered: RecordType,
    algorithm: Algorithm,
    num_labels: u8,
    original_ttl: u32,
    sig_expiration: u32,
    sig_inception: u32,
    key_tag: u16,
    signer_name: Name,
    sig: Vec<u8>,
}

impl Sig {
    /// Constructs a new signature record data
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        type_covered: RecordType,
        algorithm: Algorithm,
        num_labels: u8,
        original_ttl: u32,
        sig_expiration: u32,
        sig_inception: u32,
        key_tag: u16,
        signer_name: Name,
        sig: Vec<u8>,
    ) -> Self {
        Self {
            type_covered,
            algorithm,
            num_labels,
            original_ttl,
            sig_expiration,
            sig_inception,
            key_tag,
            signer_name,
            sig,
        }
    }

    /// The type of the RRset covered, ZERO for SIG(0)
    pub fn type_covered(&self) -> RecordType {
        self.type_covered
    }

    /// The algorithm of the signing key
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The number of labels in the owner name, discounting wildcards
    pub fn num_labels(&self) -> u8 {
        self.num_labels
    }

    /// The TTL of the covered RRset as it appears in the zone
    pub fn original_ttl(&self) -> u32 {
        self.original_ttl
    }

    /// Seconds since the epoch after which the signature is invalid,
    /// comparisons follow RFC 1982 serial number arithmetic
    pub fn sig_expiration(&self) -> u32 {
        self.sig_expiration
    }

    /// Seconds since the epoch before which the signature is invalid
    pub fn sig_inception(&self) -> u32 {
        self.sig_inception
    }

    /// The tag of the key that produced this signature
    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// The owner of the key that produced this signature
    pub fn signer_name(&self) -> &Name {
        &self.signer_name
    }

    /// The signature bytes
    pub fn sig(&self) -> &[u8] {
        &self.sig
    }

    /// Replaces the signature bytes, used after signing the precursor
    pub fn set_sig(self, sig: Vec<u8>) -> Self {
        Self { sig, ..self }
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>, rdata_length: u16) -> DnsResult<Sig> {
    let start = decoder.index();

    let type_covered = RecordType::decode(decoder)?;
    let algorithm = Algorithm::decode(decoder)?;
    let num_labels = decoder.read_u8()?;
    let original_ttl = decoder.read_u32()?;
    let sig_expiration = decoder.read_u32()?;
    let sig_inception = decoder.read_u32()?;
    let key_tag = decoder.read_u16()?;
    let signer_name = Name::decode(decoder)?;

    let sig_len = (rdata_length as usize)
        .checked_sub(decoder.index() - start)
        .ok_or("sig fields overrun rdata")?;
    let sig = decoder.read_vec(sig_len)?;

    Ok(Sig::new(
        type_covered,
        algorithm,
        num_labels,
        original_ttl,
        sig_expiration,
        sig_inception,
        key_tag,
        signer_name,
        sig,
    ))
}

/// Write the RData to the given encoder.
///
/// RFC 4034 3.1.7: the signer's name MUST NOT be compressed; in the
/// canonical form it is additionally lowercased.
pub fn emit(encoder: &mut WireEncoder<'_>, sig: &Sig) -> DnsResult<()> {
    emit_pre_sig(
        encoder,
        sig.type_covered(),
        sig.algorithm(),
        sig.num_labels(),
        sig.original_ttl(),
        sig.sig_expiration(),
        sig.sig_inception(),
        sig.key_tag(),
        sig.signer_name(),
    )?;
    encoder.emit_bytes(sig.sig())
}

/// Writes the RDATA with the signature field excluded, which is exactly the
/// `RRSIG_RDATA` prefix of the RFC 4034 3.1.8.1 signed data, and the prefix
/// of the RFC 2931 SIG(0) data
#[allow(clippy::too_many_arguments)]
pub fn emit_pre_sig(
    encoder: &mut WireEncoder<'_>,
    type_covered: RecordType,
    algorithm: Algorithm,
    num_labels: u8,
    original_ttl: u32,
    sig_expiration: u32,
    sig_inception: u32,
    key_tag: u16,
    signer_name: &Name,
) -> DnsResult<()> {
    type_covered.encode(encoder)?;
    algorithm.encode(encoder)?;
    encoder.emit_u8(num_labels)?;
    encoder.emit_u32(original_ttl)?;
    encoder.emit_u32(sig_expiration)?;
    encoder.emit_u32(sig_inception)?;
    encoder.emit_u16(key_tag)?;
    // never compressed, whatever mode the encoder is in
    if encoder.is_canonical_names() {
        signer_name.to_lowercase().emit_as_canonical(encoder, true)?;
    } else {
        signer_name.emit_as_canonical(encoder, true)?;
    }
    Ok(())
}

impl fmt::Display for Sig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ty} {alg} {labels} {ttl} {expiration} {inception} {tag} {signer} {sig}",
            ty = self.type_covered,
            alg = u8::from(self.algorithm),
            labels = self.num_labels,
            ttl = self.original_ttl,
            expiration = self.sig_expiration,
            inception = self.sig_inception,
            tag = self.key_tag,
            signer = self.signer_name,
            sig = BASE64.encode(&self.sig),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_roundtrip() {
        let rdata = Sig::new(
            RecordType::A,
            Algorithm::RSASHA256,
            3,
            3600,
            1704931200,
            1703116800,
            12345,
            Name::from_str("example.com.").unwrap(),
            vec![0x99; 128],
        );

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(
            read(&mut WireDecoder::new(&bytes), bytes.len() as u16).unwrap(),
            rdata
        );
    }

    #[test]
    fn test_signer_name_is_not_compressed() {
        let signer = Name::from_str("example.com.").unwrap();
        let rdata = Sig::new(
            RecordType::ZERO,
            Algorithm::RSASHA256,
            0,
            0,
            10,
            0,
            1,
            signer.clone(),
            Vec::new(),
        );

        let mut bytes = Vec::new();
        {
            let mut encoder = WireEncoder::new(&mut bytes);
            // writing the same name first would normally seed compression
            signer.encode(&mut encoder).unwrap();
            emit(&mut encoder, &rdata).unwrap();
        }

        // the signer name inside the rdata must be the full 13 bytes, a
        // 2 byte pointer would make the tail 15 bytes total
        assert_eq!(bytes.len(), 13 + 18 + 13);
    }
}
