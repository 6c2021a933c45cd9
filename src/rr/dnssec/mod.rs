// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! DNSSEC and transaction authentication: record data, key material,
//! signing and verification

mod algorithm;
mod digest_type;
mod key_file;
mod keypair;
mod public_key;
pub mod rdata;
mod signer;
pub mod tbs;
pub mod tsig;

use openssl::hash::MessageDigest;

pub use self::algorithm::Algorithm;
pub use self::digest_type::DigestType;
pub use self::key_file::KeyFile;
pub use self::keypair::KeyPair;
pub use self::public_key::PublicKey;
pub use self::signer::{verify_rrset, Signer};
pub use self::tsig::TsigSigner;

use crate::error::{DnsErrorKind, DnsResult};

/// The message digest a signing algorithm hashes with
pub(crate) fn digest_for(algorithm: Algorithm) -> DnsResult<MessageDigest> {
    match algorithm {
        Algorithm::RSASHA1 | Algorithm::RSASHA1NSEC3SHA1 => Ok(MessageDigest::sha1()),
        Algorithm::RSASHA256 => Ok(MessageDigest::sha256()),
        Algorithm::RSASHA512 => Ok(MessageDigest::sha512()),
        unsupported => Err(DnsErrorKind::UnsupportedAlgorithm(unsupported.into()).into()),
    }
}
