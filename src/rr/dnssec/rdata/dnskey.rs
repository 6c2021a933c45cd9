// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! public key record data for signature verification

use std::fmt;

use data_encoding::BASE64;

use crate::error::DnsResult;
use crate::rr::dnssec::Algorithm;
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-2.1)
///
/// ```text
/// 2.1.  DNSKEY RDATA Wire Format
///
///    The RDATA for a DNSKEY RR consists of a 2 octet Flags Field, a 1
///    octet Protocol Field, a 1 octet Algorithm Field, and the Public Key
///    Field.
///
///                         1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |              Flags            |    Protocol   |   Algorithm   |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    /                                                               /
///    /                            Public Key                         /
///    /                                                               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Dnskey {
    zone_key: bool,
    secure_entry_point: bool,
    revoke: bool,
    algorithm: Algorithm,
    public_key: Vec<u8>,
}

impl Dnskey {
    /// Constructs a new DNSKEY record data.
    ///
    /// The protocol field is not modeled, it MUST be 3 per RFC 4034 2.1.2.
    pub fn new(
        zone_key: bool,
        secure_entry_point: bool,
        revoke: bool,
        algorithm: Algorithm,
        public_key: Vec<u8>,
    ) -> Self {
        Self {
            zone_key,
            secure_entry_point,
            revoke,
            algorithm,
            public_key,
        }
    }

    /// Bit 7: this key may sign RRsets in the zone it appears in
    pub fn zone_key(&self) -> bool {
        self.zone_key
    }

    /// Bit 15: this key is a secure entry point, RFC 3757
    pub fn secure_entry_point(&self) -> bool {
        self.secure_entry_point
    }

    /// Bit 8: this key has been revoked, RFC 5011
    pub fn revoke(&self) -> bool {
        self.revoke
    }

    /// The public key's cryptographic algorithm
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The public key material, format determined by the algorithm
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Computes the tag of this key.
    ///
    /// [RFC 4034, Appendix B](https://tools.ietf.org/html/rfc4034#appendix-B):
    ///
    /// ```text
    /// The key tag is the same for all DNSKEY algorithm types except
    /// algorithm 1.  The key tag is calculated as an unsigned 16-bit
    /// arithmetic sum over the wire form of the DNSKEY RDATA.
    /// ```
    pub fn key_tag(&self) -> DnsResult<u16> {
        let mut bytes = Vec::with_capacity(512);
        {
            let mut encoder = WireEncoder::new(&mut bytes);
            emit(&mut encoder, self)?;
        }
        Ok(Self::key_tag_of(&bytes))
    }

    /// The RFC 4034 Appendix B checksum over already-encoded RDATA
    pub fn key_tag_of(rdata: &[u8]) -> u16 {
        let mut ac: u32 = 0;
        for (i, k) in rdata.iter().enumerate() {
            ac += u32::from(*k) << if i & 1 != 0 { 0 } else { 8 };
        }
        ac += ac >> 16;
        (ac & 0xFFFF) as u16
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>, rdata_length: u16) -> DnsResult<Dnskey> {
    let flags = decoder.read_u16()?;
    let zone_key = flags & 0x0100 != 0;
    let revoke = flags & 0x0080 != 0;
    let secure_entry_point = flags & 0x0001 != 0;

    // protocol is historic, it MUST be 3, but it is ignored on read
    let _protocol = decoder.read_u8()?;
    let algorithm = Algorithm::decode(decoder)?;

    let key_len = (rdata_length as usize)
        .checked_sub(4)
        .ok_or("dnskey rdata too short")?;
    let public_key = decoder.read_vec(key_len)?;

    Ok(Dnskey::new(
        zone_key,
        secure_entry_point,
        revoke,
        algorithm,
        public_key,
    ))
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, dnskey: &Dnskey) -> DnsResult<()> {
    let mut flags: u16 = 0;
    if dnskey.zone_key() {
        flags |= 0x0100;
    }
    if dnskey.revoke() {
        flags |= 0x0080;
    }
    if dnskey.secure_entry_point() {
        flags |= 0x0001;
    }

    encoder.emit_u16(flags)?;
    encoder.emit_u8(3)?; // protocol, MUST be 3
    dnskey.algorithm().encode(encoder)?;
    encoder.emit_bytes(dnskey.public_key())
}

impl fmt::Display for Dnskey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags: u16 = 0;
        if self.zone_key {
            flags |= 0x0100;
        }
        if self.revoke {
            flags |= 0x0080;
        }
        if self.secure_entry_point {
            flags |= 0x0001;
        }
        write!(
            f,
            "{flags} 3 {alg} {key}",
            alg = u8::from(self.algorithm),
            key = BASE64.encode(&self.public_key),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let rdata = Dnskey::new(true, true, false, Algorithm::RSASHA256, vec![0x42; 64]);

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(&bytes[..4], &[0x01, 0x01, 0x03, 0x08]);
        assert_eq!(
            read(&mut WireDecoder::new(&bytes), bytes.len() as u16).unwrap(),
            rdata
        );
    }

    #[test]
    fn test_key_tag_checksum() {
        // even index bytes shift high, odd stay low
        assert_eq!(Dnskey::key_tag_of(&[0x01, 0x02]), 0x0102);
        assert_eq!(Dnskey::key_tag_of(&[0x01, 0x02, 0x03]), 0x0402);
    }
}
