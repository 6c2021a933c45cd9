// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! hashed negative cache proof, NSEC3

use std::fmt;

use data_encoding::{BASE32_DNSSEC, HEXUPPER_PERMISSIVE};

use crate::error::DnsResult;
use crate::rr::type_bit_map::{decode_type_bit_maps, encode_type_bit_maps};
use crate::rr::RecordType;
use crate::serialize::binary::{WireDecoder, WireEncoder};

/// [RFC 5155, NSEC3, March 2008](https://tools.ietf.org/html/rfc5155#section-3.2)
///
/// ```text
/// 3.2.  NSEC3 RDATA Wire Format
///
///  The RDATA of the NSEC3 RR is as shown below:
///
///                       1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///   0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |   Hash Alg.   |     Flags     |          Iterations           |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |  Salt Length  |                     Salt                      /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |  Hash Length  |             Next Hashed Owner Name            /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  /                         Type Bit Maps                         /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Nsec3 {
    hash_algorithm: u8,
    opt_out: bool,
    iterations: u16,
    salt: Vec<u8>,
    next_hashed_owner_name: Vec<u8>,
    type_bit_maps: Vec<RecordType>,
}

impl Nsec3 {
    /// Constructs a new NSEC3 record data
    pub fn new(
        hash_algorithm: u8,
        opt_out: bool,
        iterations: u16,
        salt: Vec<u8>,
        next_hashed_owner_name: Vec<u8>,
        type_bit_maps: Vec<RecordType>,
    ) -> Self {
        Self {
            hash_algorithm,
            opt_out,
            iterations,
            salt,
            next_hashed_owner_name,
            type_bit_maps,
        }
    }

    /// The hash algorithm, 1 is SHA-1 and the only value assigned
    pub fn hash_algorithm(&self) -> u8 {
        self.hash_algorithm
    }

    /// The opt-out flag: unsigned delegations may exist in the span
    pub fn opt_out(&self) -> bool {
        self.opt_out
    }

    /// Additional hash iterations applied beyond the first
    pub fn iterations(&self) -> u16 {
        self.iterations
    }

    /// The salt appended to the name before hashing
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// The next hashed owner name in hash order, unencoded binary
    pub fn next_hashed_owner_name(&self) -> &[u8] {
        &self.next_hashed_owner_name
    }

    /// The record types that exist at the original owner name
    pub fn type_bit_maps(&self) -> &[RecordType] {
        &self.type_bit_maps
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>, rdata_length: u16) -> DnsResult<Nsec3> {
    let start = decoder.index();

    let hash_algorithm = decoder.read_u8()?;
    let flags = decoder.read_u8()?;
    let opt_out = flags & 0x01 != 0;
    let iterations = decoder.read_u16()?;

    let salt_len = decoder.read_u8()? as usize;
    let salt = decoder.read_vec(salt_len)?;

    let hash_len = decoder.read_u8()? as usize;
    let next_hashed_owner_name = decoder.read_vec(hash_len)?;

    let bit_map_len = (rdata_length as usize)
        .checked_sub(decoder.index() - start)
        .ok_or("nsec3 fields overrun rdata")?;
    let type_bit_maps = decode_type_bit_maps(decoder, bit_map_len)?;

    Ok(Nsec3::new(
        hash_algorithm,
        opt_out,
        iterations,
        salt,
        next_hashed_owner_name,
        type_bit_maps,
    ))
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, nsec3: &Nsec3) -> DnsResult<()> {
    encoder.emit_u8(nsec3.hash_algorithm())?;
    encoder.emit_u8(nsec3.opt_out() as u8)?;
    encoder.emit_u16(nsec3.iterations())?;
    encoder.emit_u8(nsec3.salt().len() as u8)?;
    encoder.emit_bytes(nsec3.salt())?;
    encoder.emit_u8(nsec3.next_hashed_owner_name().len() as u8)?;
    encoder.emit_bytes(nsec3.next_hashed_owner_name())?;
    encode_type_bit_maps(encoder, nsec3.type_bit_maps())
}

impl fmt::Display for Nsec3 {
    /// RFC 5155 3.3: the salt in hex or `-` when empty, the next hashed
    /// owner name in unpadded base32hex with lowercase letters
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{alg} {flags} {iterations} ",
            alg = self.hash_algorithm,
            flags = self.opt_out as u8,
            iterations = self.iterations,
        )?;

        if self.salt.is_empty() {
            f.write_str("-")?;
        } else {
            f.write_str(&HEXUPPER_PERMISSIVE.encode(&self.salt))?;
        }

        write!(f, " {}", BASE32_DNSSEC.encode(&self.next_hashed_owner_name))?;
        for ty in &self.type_bit_maps {
            write!(f, " {ty}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let rdata = Nsec3::new(
            1,
            true,
            12,
            vec![0xAA, 0xBB, 0xCC, 0xDD],
            vec![0x11; 20],
            vec![RecordType::A, RecordType::SRV, RecordType::RRSIG],
        );

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(
            read(&mut WireDecoder::new(&bytes), bytes.len() as u16).unwrap(),
            rdata
        );
    }

    #[test]
    fn test_empty_salt_roundtrip() {
        let rdata = Nsec3::new(1, false, 0, Vec::new(), vec![0x22; 20], vec![RecordType::A]);

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(
            read(&mut WireDecoder::new(&bytes), bytes.len() as u16).unwrap(),
            rdata
        );
    }
}
