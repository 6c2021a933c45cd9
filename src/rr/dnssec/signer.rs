// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! signing of record sets (RRSIG) and whole transactions (SIG(0))

use tracing::debug;

use crate::error::{DnsErrorKind, DnsResult};
use crate::op::{Message, MessageSigner};
use crate::rr::dnssec::rdata::{DnssecRData, Sig};
use crate::rr::dnssec::{tbs, Algorithm, KeyPair, PublicKey};
use crate::rr::{DnsClass, Name, RData, Record, RecordType};

/// How far into the future a SIG(0) expires, RFC 2931 suggests a few
/// minutes to blunt replay
const SIG0_VALIDITY_SECS: u32 = 5 * 60;

/// A private key bound to its owner name, able to produce RRSIG records
/// over RRsets and SIG(0) records over messages
pub struct Signer {
    key: KeyPair,
    algorithm: Algorithm,
    signer_name: Name,
}

impl Signer {
    /// Binds `key` to the zone or host name that publishes it.
    ///
    /// Unsupported algorithms are rejected here, rather than producing a
    /// key that fails on first use.
    pub fn new(key: KeyPair, algorithm: Algorithm, mut signer_name: Name) -> DnsResult<Self> {
        if !algorithm.is_supported() {
            return Err(DnsErrorKind::UnsupportedAlgorithm(algorithm.into()).into());
        }

        signer_name.set_fqdn(true);
        Ok(Self {
            key,
            algorithm,
            signer_name,
        })
    }

    /// The signing key
    pub fn key(&self) -> &KeyPair {
        &self.key
    }

    /// The algorithm signatures are produced under
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The name of the signing entity, matching the key's DNSKEY owner
    pub fn signer_name(&self) -> &Name {
        &self.signer_name
    }

    /// The RFC 4034 Appendix B tag of the public half of this key
    pub fn calculate_key_tag(&self) -> DnsResult<u16> {
        self.key.to_dnskey(self.algorithm, false)?.key_tag()
    }

    /// Signs raw to-be-signed bytes
    pub fn sign(&self, tbs: &[u8]) -> DnsResult<Vec<u8>> {
        self.key.sign(self.algorithm, tbs)
    }

    /// Produces the RRSIG record covering `records`.
    ///
    /// All the records must share owner, class and type; their TTL is
    /// taken as the original TTL. `inception` and `expiration` are seconds
    /// since the epoch.
    pub fn sign_rrset(
        &self,
        records: &[Record],
        inception: u32,
        expiration: u32,
    ) -> DnsResult<Record> {
        let first = records
            .first()
            .ok_or(DnsErrorKind::Message("rrset to sign is empty"))?;
        let name = first.name().clone();
        let dns_class = first.dns_class();
        let type_covered = first.record_type();
        let original_ttl = first.ttl();
        let num_labels = name.num_labels();
        let key_tag = self.calculate_key_tag()?;

        let tbs = tbs::rrset_tbs(
            &name,
            dns_class,
            num_labels,
            type_covered,
            self.algorithm,
            original_ttl,
            expiration,
            inception,
            key_tag,
            &self.signer_name,
            records.iter(),
        )?;
        let signature = self.sign(&tbs)?;

        let rrsig = Sig::new(
            type_covered,
            self.algorithm,
            num_labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            self.signer_name.clone(),
            signature,
        );

        let mut record = Record::from_rdata(
            name,
            original_ttl,
            RData::DNSSEC(DnssecRData::Rrsig(rrsig)),
        );
        record.set_dns_class(dns_class);
        Ok(record)
    }

    /// The DNSKEY record data for the public half of this key
    pub fn to_dnskey(&self) -> DnsResult<crate::rr::dnssec::rdata::Dnskey> {
        self.key.to_dnskey(self.algorithm, false)
    }
}

impl MessageSigner for Signer {
    /// Produces a SIG(0) record over the message, RFC 2931.
    ///
    /// ```text
    /// 3.1 Calculating Request and Transaction SIGs
    ///
    ///    A DNS request may be optionally signed by including one SIG(0)s at
    ///    the end of the query additional information section.  Such a SIG is
    ///    identified by having a "type covered" field of zero. It signs the
    ///    preceding DNS request message including DNS header but not including
    ///    the UDP/IP header and before the request RR counts have been
    ///    adjusted for the inclusions of the request SIG(0).
    /// ```
    fn sign_message(&self, message: &Message, inception_time: u32) -> DnsResult<Record> {
        debug!("signing message with SIG(0) as {}", self.signer_name);
        let key_tag = self.calculate_key_tag()?;

        // the owner SHOULD be root and the TTLs zero, they carry no meaning
        let pre_sig0 = Sig::new(
            RecordType::ZERO,
            self.algorithm,
            0,
            0,
            inception_time.wrapping_add(SIG0_VALIDITY_SECS),
            inception_time,
            key_tag,
            self.signer_name.clone(),
            Vec::new(),
        );

        let tbs = tbs::message_tbs(message, &pre_sig0)?;
        let signature = self.sign(&tbs)?;

        let mut sig0 = Record::from_rdata(
            Name::root(),
            0,
            RData::DNSSEC(DnssecRData::Sig(pre_sig0.set_sig(signature))),
        );
        sig0.set_dns_class(DnsClass::ANY);
        Ok(sig0)
    }

    /// SIG(0) responses are not signed back by the server with the client's
    /// key, there is nothing to verify at this layer
    fn verify_response(&self, _: &[u8], _: &[u8], _: bool) -> DnsResult<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Verifies an RRSIG over its record set with the given public key.
///
/// This checks the cryptographic signature only; walking the chain of trust
/// to the key is the caller's policy.
pub fn verify_rrset(public_key: &PublicKey, rrsig: &Record, records: &[Record]) -> DnsResult<()> {
    let sig = match rrsig.data() {
        RData::DNSSEC(DnssecRData::Rrsig(sig)) | RData::DNSSEC(DnssecRData::Sig(sig)) => sig,
        _ => return Err("record is not an rrsig".into()),
    };

    let tbs = tbs::rrset_tbs_with_sig(rrsig.name(), rrsig.dns_class(), sig, records.iter())?;
    public_key.verify(&tbs, sig.sig())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    use openssl::rsa::Rsa;

    use crate::op::Query;
    use crate::rr::dnssec::rdata::Dnskey;

    fn test_signer() -> Signer {
        let rsa = Rsa::generate(2048).unwrap();
        Signer::new(
            KeyPair::from_rsa(rsa).unwrap(),
            Algorithm::RSASHA256,
            Name::from_str("example.com.").unwrap(),
        )
        .unwrap()
    }

    fn public_key_of(signer: &Signer) -> PublicKey {
        PublicKey::from_dnskey(&signer.to_dnskey().unwrap()).unwrap()
    }

    #[test]
    fn test_rrset_sign_and_verify() {
        let signer = test_signer();
        let name = Name::from_str("host.example.com.").unwrap();
        let records = vec![
            Record::from_rdata(name.clone(), 300, RData::A(Ipv4Addr::new(10, 0, 0, 2))),
            Record::from_rdata(name, 300, RData::A(Ipv4Addr::new(10, 0, 0, 1))),
        ];

        let rrsig = signer.sign_rrset(&records, 0, 1_000_000).unwrap();
        verify_rrset(&public_key_of(&signer), &rrsig, &records).unwrap();

        // a changed record invalidates the signature
        let mut tampered = records.clone();
        tampered[0] = Record::from_rdata(
            tampered[0].name().clone(),
            300,
            RData::A(Ipv4Addr::new(10, 9, 9, 9)),
        );
        assert!(verify_rrset(&public_key_of(&signer), &rrsig, &tampered).is_err());
    }

    #[test]
    fn test_verify_with_wrong_key_fails() {
        let signer = test_signer();
        let other = test_signer();
        let name = Name::from_str("host.example.com.").unwrap();
        let records = vec![Record::from_rdata(
            name,
            300,
            RData::A(Ipv4Addr::new(10, 0, 0, 1)),
        )];

        let rrsig = signer.sign_rrset(&records, 0, 1_000_000).unwrap();
        assert!(verify_rrset(&public_key_of(&other), &rrsig, &records).is_err());
    }

    #[test]
    fn test_sig0_message_roundtrip() {
        let signer = test_signer();

        let mut message = Message::new();
        message.set_id(123).add_query(Query::query(
            Name::from_str("www.example.com.").unwrap(),
            RecordType::A,
        ));

        message.finalize(&signer, 1_700_000_000).unwrap();
        assert_eq!(message.signature().len(), 1);

        // recompute the tbs and check the signature with the public key
        let sig = match message.signature()[0].data() {
            RData::DNSSEC(DnssecRData::Sig(sig)) => sig.clone(),
            _ => panic!("expected SIG(0)"),
        };
        let tbs = tbs::message_tbs(&message, &sig).unwrap();
        public_key_of(&signer).verify(&tbs, sig.sig()).unwrap();
    }

    #[test]
    fn test_key_tag_matches_dnskey() {
        let signer = test_signer();
        let dnskey: Dnskey = signer.to_dnskey().unwrap();
        assert_eq!(signer.calculate_key_tag().unwrap(), dnskey.key_tag().unwrap());
    }
}
