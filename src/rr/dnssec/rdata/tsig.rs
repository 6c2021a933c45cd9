// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Transaction signature record data and the HMAC algorithms behind it,
//! [RFC 8945](https://www.rfc-editor.org/rfc/rfc8945) November 2020

use std::fmt;

use data_encoding::HEXUPPER_PERMISSIVE;
use openssl::hash::MessageDigest;
use openssl::memcmp;
use openssl::pkey::PKey;
use openssl::sign::Signer as HmacSigner;

use crate::error::{DnsErrorKind, DnsResult};
use crate::rr::{DnsClass, Name};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// [RFC 8945, Secret Key Transaction Authentication for DNS](https://www.rfc-editor.org/rfc/rfc8945#section-4.2)
///
/// ```text
///                       1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///   0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  /                         Algorithm Name                        /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |                                                               |
///  |          Time Signed          +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |                               |            Fudge              |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |          MAC Size             |                               /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+             MAC               /
///  /                                                               /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |          Original ID          |            Error              |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |          Other Len            |                               /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+           Other Data          /
///  /                                                               /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Tsig {
    algorithm: TsigAlgorithm,
    time: u64,
    fudge: u16,
    mac: Vec<u8>,
    original_id: u16,
    error: u16,
    other: Vec<u8>,
}

impl Tsig {
    /// Constructs a new TSIG record data.
    ///
    /// `time` is a 48-bit count of seconds since the epoch; `fudge` the
    /// permitted clock skew in seconds; `original_id` the message ID before
    /// any forwarder rewrote it.
    pub fn new(
        algorithm: TsigAlgorithm,
        time: u64,
        fudge: u16,
        mac: Vec<u8>,
        original_id: u16,
        error: u16,
        other: Vec<u8>,
    ) -> Self {
        Self {
            algorithm,
            time,
            fudge,
            mac,
            original_id,
            error,
            other,
        }
    }

    /// The MAC algorithm
    pub fn algorithm(&self) -> &TsigAlgorithm {
        &self.algorithm
    }

    /// Seconds since the epoch the message was signed at, 48 bits
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Permitted difference between signing time and verification time
    pub fn fudge(&self) -> u16 {
        self.fudge
    }

    /// The message authentication code
    pub fn mac(&self) -> &[u8] {
        &self.mac
    }

    /// The ID of the message before any forwarder rewrote it
    pub fn original_id(&self) -> u16 {
        self.original_id
    }

    /// The TSIG error field, an extended RCODE
    pub fn error(&self) -> u16 {
        self.error
    }

    /// Other data; holds the server time on BADTIME errors
    pub fn other(&self) -> &[u8] {
        &self.other
    }

    /// Returns a copy carrying the computed MAC
    pub fn set_mac(self, mac: Vec<u8>) -> Self {
        Self { mac, ..self }
    }

    /// Emits the TSIG variables in the digest ordering of RFC 8945 4.3.3:
    /// key name, class ANY, TTL 0, then the RDATA with MAC, original ID and
    /// their lengths excluded, names in canonical form
    pub fn emit_tsig_for_mac(
        &self,
        encoder: &mut WireEncoder<'_>,
        key_name: &Name,
    ) -> DnsResult<()> {
        key_name.to_lowercase().emit_as_canonical(encoder, true)?;
        DnsClass::ANY.encode(encoder)?;
        encoder.emit_u32(0)?; // TTL
        self.algorithm.emit(encoder)?;
        encoder.emit_u16((self.time >> 32) as u16)?;
        encoder.emit_u32(self.time as u32)?;
        encoder.emit_u16(self.fudge)?;
        encoder.emit_u16(self.error)?;
        encoder.emit_u16(self.other.len() as u16)?;
        encoder.emit_bytes(&self.other)
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>, rdata_length: u16) -> DnsResult<Tsig> {
    let end = decoder
        .index()
        .checked_add(rdata_length as usize)
        .ok_or(DnsErrorKind::Message("rdata end position overflow"))?;

    let algorithm = TsigAlgorithm::read(decoder)?;
    let time_high = u64::from(decoder.read_u16()?);
    let time_low = u64::from(decoder.read_u32()?);
    let time = (time_high << 32) | time_low;
    let fudge = decoder.read_u16()?;

    let mac_size = decoder.read_u16()? as usize;
    if decoder.index() + mac_size + 6 > end {
        return Err("invalid mac length in TSIG".into());
    }
    let mac = decoder.read_vec(mac_size)?;

    let original_id = decoder.read_u16()?;
    let error = decoder.read_u16()?;

    let other_len = decoder.read_u16()? as usize;
    if decoder.index() + other_len != end {
        return Err("invalid other length in TSIG".into());
    }
    let other = decoder.read_vec(other_len)?;

    Ok(Tsig {
        algorithm,
        time,
        fudge,
        mac,
        original_id,
        error,
        other,
    })
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, tsig: &Tsig) -> DnsResult<()> {
    tsig.algorithm.emit(encoder)?;
    encoder.emit_u16(
        (tsig.time >> 32)
            .try_into()
            .map_err(|_| "time overflows the 48 bit counter in TSIG")?,
    )?;
    encoder.emit_u32(tsig.time as u32)?;
    encoder.emit_u16(tsig.fudge)?;
    encoder.emit_u16(tsig.mac.len() as u16)?;
    encoder.emit_bytes(&tsig.mac)?;
    encoder.emit_u16(tsig.original_id)?;
    encoder.emit_u16(tsig.error)?;
    encoder.emit_u16(tsig.other.len() as u16)?;
    encoder.emit_bytes(&tsig.other)
}

impl fmt::Display for Tsig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{algorithm} {time} {fudge} {mac} {id} {error} {other}",
            algorithm = self.algorithm,
            time = self.time,
            fudge = self.fudge,
            mac = HEXUPPER_PERMISSIVE.encode(&self.mac),
            id = self.original_id,
            error = self.error,
            other = HEXUPPER_PERMISSIVE.encode(&self.other),
        )
    }
}

/// The HMAC algorithms usable with TSIG, named by domain name per RFC 8945
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum TsigAlgorithm {
    /// HMAC-MD5.SIG-ALG.REG.INT, kept for interoperability with old servers
    HmacMd5,
    /// hmac-sha1
    HmacSha1,
    /// hmac-sha224
    HmacSha224,
    /// hmac-sha256
    HmacSha256,
    /// hmac-sha384
    HmacSha384,
    /// hmac-sha512
    HmacSha512,
    /// An unrecognized algorithm name
    Unknown(Name),
}

impl TsigAlgorithm {
    /// The DNS name of the algorithm
    pub fn to_name(&self) -> Name {
        match self {
            Self::HmacMd5 => Name::from_ascii("HMAC-MD5.SIG-ALG.REG.INT"),
            Self::HmacSha1 => Name::from_ascii("hmac-sha1"),
            Self::HmacSha224 => Name::from_ascii("hmac-sha224"),
            Self::HmacSha256 => Name::from_ascii("hmac-sha256"),
            Self::HmacSha384 => Name::from_ascii("hmac-sha384"),
            Self::HmacSha512 => Name::from_ascii("hmac-sha512"),
            Self::Unknown(name) => return name.clone(),
        }
        .expect("static algorithm names always parse")
    }

    /// Maps a DNS name to the algorithm, case insensitively
    pub fn from_name(name: Name) -> Self {
        let ascii = name.to_ascii().to_ascii_lowercase();
        match ascii.trim_end_matches('.') {
            "hmac-md5.sig-alg.reg.int" => Self::HmacMd5,
            "hmac-sha1" => Self::HmacSha1,
            "hmac-sha224" => Self::HmacSha224,
            "hmac-sha256" => Self::HmacSha256,
            "hmac-sha384" => Self::HmacSha384,
            "hmac-sha512" => Self::HmacSha512,
            _ => Self::Unknown(name),
        }
    }

    /// Write the algorithm name in canonical form
    pub fn emit(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()> {
        self.to_name().to_lowercase().emit_as_canonical(encoder, true)
    }

    /// Read the algorithm name
    pub fn read(decoder: &mut WireDecoder<'_>) -> DnsResult<Self> {
        let mut name = Name::decode(decoder)?;
        name.set_fqdn(false);
        Ok(Self::from_name(name))
    }

    fn digest(&self) -> DnsResult<MessageDigest> {
        match self {
            Self::HmacMd5 => Ok(MessageDigest::md5()),
            Self::HmacSha1 => Ok(MessageDigest::sha1()),
            Self::HmacSha224 => Ok(MessageDigest::sha224()),
            Self::HmacSha256 => Ok(MessageDigest::sha256()),
            Self::HmacSha384 => Ok(MessageDigest::sha384()),
            Self::HmacSha512 => Ok(MessageDigest::sha512()),
            Self::Unknown(name) => {
                Err(DnsErrorKind::UnsupportedTsigAlgorithm(name.clone()).into())
            }
        }
    }

    /// Computes the MAC over `message` with the shared `key`
    pub fn mac_data(&self, key: &[u8], message: &[u8]) -> DnsResult<Vec<u8>> {
        let digest = self.digest()?;
        let key = PKey::hmac(key)?;

        let mut signer = HmacSigner::new(digest, &key)?;
        signer.update(message)?;
        Ok(signer.sign_to_vec()?)
    }

    /// Verifies the MAC in constant time to prevent timing attacks
    pub fn verify_mac(&self, key: &[u8], message: &[u8], tag: &[u8]) -> DnsResult<()> {
        let mac = self.mac_data(key, message)?;
        if mac.len() == tag.len() && memcmp::eq(&mac, tag) {
            Ok(())
        } else {
            Err(DnsErrorKind::TsigInvalidMac.into())
        }
    }

    /// Length in bytes of the algorithm's output
    pub fn output_len(&self) -> DnsResult<usize> {
        Ok(self.digest()?.size())
    }

    /// True when the crate can compute MACs with this algorithm
    pub fn supported(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for TsigAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tsig {
        Tsig::new(
            TsigAlgorithm::HmacSha256,
            1609459200,
            300,
            vec![0xAB; 32],
            0x1234,
            0,
            Vec::new(),
        )
    }

    #[test]
    fn test_roundtrip() {
        let rdata = sample();
        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(
            read(&mut WireDecoder::new(&bytes), bytes.len() as u16).unwrap(),
            rdata
        );
    }

    #[test]
    fn test_bad_mac_length_is_error() {
        let rdata = sample();
        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        // claim one fewer byte than was written
        assert!(read(&mut WireDecoder::new(&bytes), (bytes.len() - 1) as u16).is_err());
    }

    #[test]
    fn test_algorithm_name_roundtrip() {
        for alg in [
            TsigAlgorithm::HmacMd5,
            TsigAlgorithm::HmacSha1,
            TsigAlgorithm::HmacSha224,
            TsigAlgorithm::HmacSha256,
            TsigAlgorithm::HmacSha384,
            TsigAlgorithm::HmacSha512,
        ] {
            assert_eq!(TsigAlgorithm::from_name(alg.to_name()), alg);
        }
    }

    #[test]
    fn test_mac_sign_and_verify() {
        let key = b"9dnf93asdf39fs";
        let message = b"the quick brown fox";
        let alg = TsigAlgorithm::HmacSha256;

        let mac = alg.mac_data(key, message).unwrap();
        assert_eq!(mac.len(), alg.output_len().unwrap());
        alg.verify_mac(key, message, &mac).unwrap();

        let mut flipped = mac.clone();
        flipped[0] ^= 0x80;
        assert!(alg.verify_mac(key, message, &flipped).is_err());

        assert!(alg.verify_mac(b"other key", message, &mac).is_err());
    }
}
