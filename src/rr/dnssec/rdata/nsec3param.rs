// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! parameters for NSEC3 hashing, published at the zone apex

use std::fmt;

use data_encoding::HEXUPPER_PERMISSIVE;

use crate::error::DnsResult;
use crate::serialize::binary::{WireDecoder, WireEncoder};

/// [RFC 5155, NSEC3, March 2008](https://tools.ietf.org/html/rfc5155#section-4.2)
///
/// ```text
/// 4.2.  NSEC3PARAM RDATA Wire Format
///
///  The RDATA of the NSEC3PARAM RR is as shown below:
///
///                       1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///   0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |   Hash Alg.   |     Flags     |          Iterations           |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |  Salt Length  |                     Salt                      /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///
///  Flags field is reserved, it must be 0 in NSEC3PARAM.
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Nsec3Param {
    hash_algorithm: u8,
    iterations: u16,
    salt: Vec<u8>,
}

impl Nsec3Param {
    /// Constructs new NSEC3PARAM record data
    pub fn new(hash_algorithm: u8, iterations: u16, salt: Vec<u8>) -> Self {
        Self {
            hash_algorithm,
            iterations,
            salt,
        }
    }

    /// The hash algorithm used by the zone's NSEC3 records
    pub fn hash_algorithm(&self) -> u8 {
        self.hash_algorithm
    }

    /// Additional hash iterations applied beyond the first
    pub fn iterations(&self) -> u16 {
        self.iterations
    }

    /// The salt appended to names before hashing
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>) -> DnsResult<Nsec3Param> {
    let hash_algorithm = decoder.read_u8()?;
    let _flags = decoder.read_u8()?;
    let iterations = decoder.read_u16()?;
    let salt_len = decoder.read_u8()? as usize;
    let salt = decoder.read_vec(salt_len)?;

    Ok(Nsec3Param::new(hash_algorithm, iterations, salt))
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, nsec3param: &Nsec3Param) -> DnsResult<()> {
    encoder.emit_u8(nsec3param.hash_algorithm())?;
    encoder.emit_u8(0)?; // flags, reserved
    encoder.emit_u16(nsec3param.iterations())?;
    encoder.emit_u8(nsec3param.salt().len() as u8)?;
    encoder.emit_bytes(nsec3param.salt())
}

impl fmt::Display for Nsec3Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{alg} 0 {iterations} ",
            alg = self.hash_algorithm,
            iterations = self.iterations,
        )?;
        if self.salt.is_empty() {
            f.write_str("-")
        } else {
            f.write_str(&HEXUPPER_PERMISSIVE.encode(&self.salt))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let rdata = Nsec3Param::new(1, 10, vec![0xBE, 0xEF]);

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(read(&mut WireDecoder::new(&bytes)).unwrap(), rdata);
    }
}
