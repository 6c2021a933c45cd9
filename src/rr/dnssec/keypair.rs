// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A private key pair backed by the crypto provider

use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::sign::Signer as SslSigner;

use crate::error::{DnsErrorKind, DnsResult};
use crate::rr::dnssec::rdata::Dnskey;
use crate::rr::dnssec::Algorithm;

/// A private key usable for signing records and transactions.
///
/// Only RSA variants are constructible; DSA key material is understood by
/// the key file parser but deliberately not signable, callers get a clean
/// unsupported-algorithm error instead of an untested signature.
#[derive(Debug)]
pub enum KeyPair {
    /// An RSA private key
    Rsa(PKey<Private>),
}

impl KeyPair {
    /// Wraps an openssl RSA key
    pub fn from_rsa(rsa: Rsa<Private>) -> DnsResult<Self> {
        Ok(Self::Rsa(PKey::from_rsa(rsa)?))
    }

    /// Signs `tbs` with this key under `algorithm`
    pub fn sign(&self, algorithm: Algorithm, tbs: &[u8]) -> DnsResult<Vec<u8>> {
        match self {
            Self::Rsa(pkey) => {
                let digest = super::digest_for(algorithm)?;
                let mut signer = SslSigner::new(digest, pkey)?;
                signer.update(tbs)?;
                Ok(signer.sign_to_vec()?)
            }
        }
    }

    /// The RFC 3110 public key bytes of this key, as stored in a DNSKEY
    pub fn to_public_bytes(&self) -> DnsResult<Vec<u8>> {
        match self {
            Self::Rsa(pkey) => {
                let rsa = pkey.rsa()?;
                let e = rsa.e().to_vec();
                let n = rsa.n().to_vec();

                let mut bytes = Vec::with_capacity(3 + e.len() + n.len());
                if e.len() > 255 {
                    bytes.push(0);
                    bytes.extend_from_slice(&(e.len() as u16).to_be_bytes());
                } else {
                    bytes.push(e.len() as u8);
                }
                bytes.extend_from_slice(&e);
                bytes.extend_from_slice(&n);
                Ok(bytes)
            }
        }
    }

    /// The DNSKEY record data publishing this key
    pub fn to_dnskey(&self, algorithm: Algorithm, secure_entry_point: bool) -> DnsResult<Dnskey> {
        if !algorithm.is_supported() {
            return Err(DnsErrorKind::UnsupportedAlgorithm(algorithm.into()).into());
        }
        Ok(Dnskey::new(
            true,
            secure_entry_point,
            false,
            algorithm,
            self.to_public_bytes()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rr::dnssec::PublicKey;

    #[test]
    fn test_sign_and_verify() {
        let rsa = Rsa::generate(2048).unwrap();
        let key = KeyPair::from_rsa(rsa).unwrap();

        let tbs = b"to be signed";
        let signature = key.sign(Algorithm::RSASHA256, tbs).unwrap();

        let dnskey = key.to_dnskey(Algorithm::RSASHA256, false).unwrap();
        let public = PublicKey::from_dnskey(&dnskey).unwrap();
        public.verify(tbs, &signature).unwrap();

        // tampering breaks it
        assert!(public.verify(b"to be signeD", &signature).is_err());
    }

    #[test]
    fn test_dsa_signing_rejected() {
        let rsa = Rsa::generate(2048).unwrap();
        let key = KeyPair::from_rsa(rsa).unwrap();
        assert!(key.sign(Algorithm::DSA, b"data").is_err());
    }
}
