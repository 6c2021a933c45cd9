// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! SSHFP records for SSH public key fingerprints

use std::fmt;

use data_encoding::HEXUPPER_PERMISSIVE;

use crate::error::DnsResult;
use crate::serialize::binary::{WireDecoder, WireEncoder};

/// [RFC 4255, SSH Key Fingerprints in DNS, January 2006](https://tools.ietf.org/html/rfc4255#section-3.1)
///
/// ```text
/// 3.1.  The SSHFP RDATA Format
///
///    The RDATA for a SSHFP RR consists of an algorithm number, fingerprint
///    type, and the fingerprint of the public host key.
///
///        1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///        0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |   algorithm   |    fp type    |                               /
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+                               /
///        /                                                               /
///        /                          fingerprint                          /
///        /                                                               /
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Sshfp {
    algorithm: u8,
    fingerprint_type: u8,
    fingerprint: Vec<u8>,
}

impl Sshfp {
    /// Constructs a new SSHFP record data
    pub fn new(algorithm: u8, fingerprint_type: u8, fingerprint: Vec<u8>) -> Self {
        Self {
            algorithm,
            fingerprint_type,
            fingerprint,
        }
    }

    /// The public key algorithm: 1 RSA, 2 DSS, 3 ECDSA, 4 Ed25519
    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// The message digest algorithm: 1 SHA-1, 2 SHA-256
    pub fn fingerprint_type(&self) -> u8 {
        self.fingerprint_type
    }

    /// The digest of the public host key
    pub fn fingerprint(&self) -> &[u8] {
        &self.fingerprint
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>, rdata_length: u16) -> DnsResult<Sshfp> {
    let len = (rdata_length as usize)
        .checked_sub(2)
        .ok_or("sshfp rdata too short")?;

    Ok(Sshfp::new(
        decoder.read_u8()?,
        decoder.read_u8()?,
        decoder.read_vec(len)?,
    ))
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, sshfp: &Sshfp) -> DnsResult<()> {
    encoder.emit_u8(sshfp.algorithm())?;
    encoder.emit_u8(sshfp.fingerprint_type())?;
    encoder.emit_bytes(sshfp.fingerprint())
}

impl fmt::Display for Sshfp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{algorithm} {ty} {fp}",
            algorithm = self.algorithm,
            ty = self.fingerprint_type,
            fp = HEXUPPER_PERMISSIVE.encode(&self.fingerprint),
        )
    }
}
