// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Secret Key Transaction Authentication for DNS (TSIG),
//! [RFC 8945](https://www.rfc-editor.org/rfc/rfc8945) November 2020
//!
//! Truncated MACs are not supported: a response carrying a MAC shorter
//! than the algorithm output is rejected outright.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::error::{DnsErrorKind, DnsResult};
use crate::op::{Header, Message, MessageSigner, Query};
use crate::rr::dnssec::rdata::{DnssecRData, Tsig, TsigAlgorithm};
use crate::rr::{DnsClass, Name, RData, Record, RecordType};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// A shared secret used to authenticate requests and the responses to them
pub struct TsigSigner {
    key: Vec<u8>,
    algorithm: TsigAlgorithm,
    signer_name: Name,
    fudge: u16,
}

impl TsigSigner {
    /// Creates a new signer over the shared secret.
    ///
    /// # Arguments
    ///
    /// * `key` - the shared secret bytes
    /// * `algorithm` - HMAC algorithm to authenticate with
    /// * `signer_name` - name of the key, as known to the server
    /// * `fudge` - permitted clock skew between the peers, in seconds; a
    ///   few minutes is customary, longer windows widen replay exposure
    pub fn new(
        key: Vec<u8>,
        algorithm: TsigAlgorithm,
        mut signer_name: Name,
        fudge: u16,
    ) -> DnsResult<Self> {
        if !algorithm.supported() {
            return Err(DnsErrorKind::UnsupportedTsigAlgorithm(algorithm.to_name()).into());
        }

        signer_name.set_fqdn(true);
        Ok(Self {
            key,
            algorithm,
            signer_name,
            fudge,
        })
    }

    /// The name of the key
    pub fn signer_name(&self) -> &Name {
        &self.signer_name
    }

    /// The MAC algorithm
    pub fn algorithm(&self) -> &TsigAlgorithm {
        &self.algorithm
    }

    /// The permitted clock skew, in seconds
    pub fn fudge(&self) -> u16 {
        self.fudge
    }

    /// Computes the MAC over an already-assembled to-be-signed buffer
    pub fn sign(&self, tbs: &[u8]) -> DnsResult<Vec<u8>> {
        self.algorithm.mac_data(&self.key, tbs)
    }

    /// Verifies a received signed message.
    ///
    /// `previous_mac` is the request MAC when verifying the first response,
    /// or the previous response MAC inside a message stream; `first_message`
    /// selects between the full TSIG variables and the abbreviated
    /// time+fudge form used by non-first stream messages, RFC 8945 5.3.1.
    ///
    /// Returns the MAC of this message (for chaining), the signing time and
    /// the fudge the peer declared. Time window checking is left to the
    /// caller so it stays testable.
    pub fn verify_message_bytes(
        &self,
        message: &[u8],
        previous_mac: Option<&[u8]>,
        first_message: bool,
    ) -> DnsResult<(Vec<u8>, u64, u16)> {
        let (tbv, record) = signed_message_to_buf(message, previous_mac, first_message)?;
        let tsig = match record.data() {
            RData::DNSSEC(DnssecRData::Tsig(tsig)) => tsig,
            _ => unreachable!("signed_message_to_buf only returns TSIG records"),
        };

        // RFC 8945 5.2, 1: check key name and algorithm
        if record.name() != &self.signer_name || tsig.algorithm() != &self.algorithm {
            return Err(DnsErrorKind::TsigMalformed(
                "response signed with a different key or algorithm",
            )
            .into());
        }

        // a truncated MAC offers less than the algorithm's security, and is
        // only legal for backwards compatibility; reject it
        if tsig.mac().len() < self.algorithm.output_len()? {
            return Err(DnsErrorKind::TsigMalformed("truncated tsig mac").into());
        }

        // RFC 8945 5.2, 2: check the MAC, constant time
        self.algorithm.verify_mac(&self.key, &tbv, tsig.mac())?;

        // the error field reports a server side authentication failure
        if tsig.error() != 0 {
            return Err(format!(
                "tsig error from peer: {}",
                crate::op::ResponseCode::from(tsig.error())
            )
            .into());
        }

        Ok((tsig.mac().to_vec(), tsig.time(), tsig.fudge()))
    }
}

impl MessageSigner for TsigSigner {
    fn sign_message(&self, message: &Message, inception_time: u32) -> DnsResult<Record> {
        debug!("signing message with key {}", self.signer_name);

        let pre_tsig = Tsig::new(
            self.algorithm.clone(),
            u64::from(inception_time),
            self.fudge,
            Vec::new(),
            message.id(),
            0,
            Vec::new(),
        );

        let tbs = message_tbs(None, &message.to_signable_bytes()?, &pre_tsig, &self.signer_name)?;
        let mac = self.sign(&tbs)?;

        // RFC 8945 4.2: name of the key, class ANY, TTL 0
        let mut record = Record::from_rdata(
            self.signer_name.clone(),
            0,
            RData::DNSSEC(DnssecRData::Tsig(pre_tsig.set_mac(mac))),
        );
        record.set_dns_class(DnsClass::ANY);
        Ok(record)
    }

    fn verify_response(
        &self,
        response: &[u8],
        request_signature: &[u8],
        first: bool,
    ) -> DnsResult<Vec<u8>> {
        let previous = if request_signature.is_empty() {
            None
        } else {
            Some(request_signature)
        };
        let (mac, time, fudge) = self.verify_message_bytes(response, previous, first)?;

        // RFC 8945 5.2, 3: the signing time must be within the fudge window
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before the epoch")
            .as_secs();
        if now.abs_diff(time) > u64::from(fudge) {
            return Err(DnsErrorKind::TsigTimeOutOfRange { time }.into());
        }

        Ok(mac)
    }
}

/// Assembles the to-be-signed buffer for an outgoing message.
///
/// RFC 8945 4.3.3 digest components, in order: the request MAC when
/// responding (or chaining), the message itself without the TSIG record,
/// then the TSIG variables.
pub fn message_tbs(
    previous_mac: Option<&[u8]>,
    message_without_tsig: &[u8],
    pre_tsig: &Tsig,
    key_name: &Name,
) -> DnsResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(message_without_tsig.len() + 64);
    let mut encoder = WireEncoder::new(&mut buf);

    if let Some(previous_mac) = previous_mac {
        encoder.emit_u16(previous_mac.len() as u16)?;
        encoder.emit_bytes(previous_mac)?;
    }
    encoder.emit_bytes(message_without_tsig)?;
    pre_tsig.emit_tsig_for_mac(&mut encoder, key_name)?;
    Ok(buf)
}

/// Reassembles the to-be-verified buffer from a received signed message.
///
/// The TSIG record is split off the tail, ARCOUNT is decremented, the ID
/// replaced with the original ID carried in the TSIG, and the digest
/// components are concatenated as in [`message_tbs`]. Returns the buffer
/// and the TSIG record.
pub fn signed_message_to_buf(
    message: &[u8],
    previous_mac: Option<&[u8]>,
    first_message: bool,
) -> DnsResult<(Vec<u8>, Record)> {
    let mut decoder = WireDecoder::new(message);

    let mut header = Header::decode(&mut decoder)?;
    let additional_count = header.additional_count();
    if additional_count == 0 {
        return Err(DnsErrorKind::TsigMalformed(
            "message to be authenticated carries no tsig",
        )
        .into());
    }
    header.set_additional_count(additional_count - 1);

    for _ in 0..header.query_count() {
        Query::decode(&mut decoder)?;
    }

    // every record but the last, which must be the TSIG
    let record_count = usize::from(header.answer_count())
        + usize::from(header.authority_count())
        + usize::from(header.additional_count());
    for _ in 0..record_count {
        Record::decode(&mut decoder)?;
    }
    let end_data = decoder.index();

    let record = Record::decode(&mut decoder)?;
    let tsig = match (record.record_type(), record.data()) {
        (RecordType::TSIG, RData::DNSSEC(DnssecRData::Tsig(tsig))) => tsig,
        _ => return Err(DnsErrorKind::TsigMalformed("final record is not a tsig").into()),
    };
    header.set_id(tsig.original_id());

    let mut buf = Vec::with_capacity(message.len());
    let mut encoder = WireEncoder::new(&mut buf);

    if let Some(previous_mac) = previous_mac {
        encoder.emit_u16(previous_mac.len() as u16)?;
        encoder.emit_bytes(previous_mac)?;
    }

    // the adjusted header, then the records copied verbatim, compression
    // pointers intact
    header.encode(&mut encoder)?;
    encoder.emit_bytes(&message[Header::len()..end_data])?;

    if first_message {
        tsig.emit_tsig_for_mac(&mut encoder, record.name())?;
    } else {
        // non-first stream messages digest only time and fudge, RFC 8945 5.3.1
        encoder.emit_u16((tsig.time() >> 32) as u16)?;
        encoder.emit_u32(tsig.time() as u32)?;
        encoder.emit_u16(tsig.fudge())?;
    }

    Ok((buf, record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn test_signer(secret: &[u8]) -> TsigSigner {
        TsigSigner::new(
            secret.to_vec(),
            TsigAlgorithm::HmacSha256,
            Name::from_str("mykey.").unwrap(),
            300,
        )
        .unwrap()
    }

    fn signed_query(signer: &TsigSigner, time: u32) -> Message {
        let mut message = Message::new();
        message.set_id(0x99AA).add_query(Query::query(
            Name::from_str("example.com.").unwrap(),
            RecordType::SOA,
        ));
        message.finalize(signer, time).unwrap();
        message
    }

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let signer = test_signer(b"9dnf93asdf39fs");
        let message = signed_query(&signer, 1_700_000_000);
        let bytes = message.to_bytes().unwrap();

        let (mac, time, fudge) = signer.verify_message_bytes(&bytes, None, true).unwrap();
        assert_eq!(time, 1_700_000_000);
        assert_eq!(fudge, 300);
        assert_eq!(mac.len(), 32);
    }

    #[test]
    fn test_verify_with_other_key_fails() {
        let signer = test_signer(b"9dnf93asdf39fs");
        let other = test_signer(b"completely different");
        let bytes = signed_query(&signer, 1_700_000_000).to_bytes().unwrap();

        assert!(other.verify_message_bytes(&bytes, None, true).is_err());
    }

    #[test]
    fn test_flipped_mac_bit_fails() {
        let signer = test_signer(b"9dnf93asdf39fs");
        let message = signed_query(&signer, 1_700_000_000);

        let mac_len = match message.signature()[0].data() {
            RData::DNSSEC(DnssecRData::Tsig(tsig)) => tsig.mac().len(),
            _ => unreachable!(),
        };
        assert_eq!(mac_len, 32);

        let mut bytes = message.to_bytes().unwrap();
        // the mac occupies the bytes before the trailing
        // original-id/error/other-len fields
        let mac_start = bytes.len() - 6 - mac_len;
        bytes[mac_start] ^= 0x01;

        assert!(signer.verify_message_bytes(&bytes, None, true).is_err());
    }

    #[test]
    fn test_tampered_question_fails() {
        let signer = test_signer(b"9dnf93asdf39fs");
        let bytes = {
            let mut bytes = signed_query(&signer, 1_700_000_000).to_bytes().unwrap();
            // uppercase one letter of the qname inside the signed region
            let idx = 12 + 1;
            bytes[idx] = bytes[idx].to_ascii_uppercase();
            bytes
        };

        assert!(signer.verify_message_bytes(&bytes, None, true).is_err());
    }

    #[test]
    fn test_unsigned_message_fails() {
        let signer = test_signer(b"9dnf93asdf39fs");
        let mut message = Message::new();
        message.add_query(Query::query(
            Name::from_str("example.com.").unwrap(),
            RecordType::SOA,
        ));
        let bytes = message.to_bytes().unwrap();

        assert!(signer.verify_message_bytes(&bytes, None, true).is_err());
    }
}
