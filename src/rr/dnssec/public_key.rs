// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Public key material recovered from DNSKEY records

use openssl::bn::BigNum;
use openssl::pkey::{PKey, Public};
use openssl::rsa::Rsa;
use openssl::sign::Verifier;

use crate::error::{DnsErrorKind, DnsResult};
use crate::rr::dnssec::rdata::Dnskey;
use crate::rr::dnssec::Algorithm;

/// A verifying key, as published in a DNSKEY (or KEY) record
pub struct PublicKey {
    pkey: PKey<Public>,
    algorithm: Algorithm,
}

impl PublicKey {
    /// Recovers the public key from DNSKEY record data.
    ///
    /// [RFC 3110, RSA/SHA-1 SIGs and RSA KEYs in the DNS, May 2001](https://tools.ietf.org/html/rfc3110#section-2)
    ///
    /// ```text
    ///    RSA public keys are stored in the DNS as KEY RRs using algorithm
    ///    number 5 [RFC2535].  The structure of the algorithm specific portion
    ///    of the RDATA part of such RRs is as shown below.
    ///
    ///          Field             Size
    ///          -----             ----
    ///          exponent length   1 or 3 octets (see text)
    ///          exponent          as specified by length field
    ///          modulus           remaining space
    ///
    ///    For interoperability, the exponent and modulus are each limited to
    ///    4096 bits in length.  The public key exponent is a variable length
    ///    unsigned integer.  Its length in octets is represented as one octet
    ///    if it is in the range of 1 to 255 and by a zero octet followed by a
    ///    two octet unsigned length if it is longer than 255 bytes.
    /// ```
    pub fn from_dnskey(dnskey: &Dnskey) -> DnsResult<Self> {
        let algorithm = dnskey.algorithm();
        if !algorithm.is_supported() {
            return Err(DnsErrorKind::UnsupportedAlgorithm(algorithm.into()).into());
        }

        let raw = dnskey.public_key();
        let (e_len, e_start) = match *raw {
            [0, hi, lo, ..] => ((usize::from(hi) << 8) | usize::from(lo), 3),
            [len, ..] if len != 0 => (usize::from(len), 1),
            _ => return Err("empty rsa public key".into()),
        };

        if raw.len() < e_start + e_len + 1 {
            return Err("rsa public key too short for its exponent".into());
        }

        let e = BigNum::from_slice(&raw[e_start..e_start + e_len])?;
        let n = BigNum::from_slice(&raw[e_start + e_len..])?;

        let rsa = Rsa::from_public_components(n, e)?;
        Ok(Self {
            pkey: PKey::from_rsa(rsa)?,
            algorithm,
        })
    }

    /// The algorithm the key was published for
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Verifies `signature` over `message`
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> DnsResult<()> {
        let digest = super::digest_for(self.algorithm)?;
        let mut verifier = Verifier::new(digest, &self.pkey)?;
        verifier.update(message)?;

        if verifier.verify(signature)? {
            Ok(())
        } else {
            Err(DnsErrorKind::SignatureInvalid.into())
        }
    }
}
