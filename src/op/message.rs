// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Basic protocol message for DNS

use std::fmt;
use std::mem;

use crate::error::{DnsErrorKind, DnsResult};
use crate::op::{Edns, Header, MessageType, OpCode, Query, ResponseCode};
use crate::rr::{Record, RecordType};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// The basic request and response data structure, used for all DNS protocols.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 4.1. Format
///
/// All communications inside of the domain protocol are carried in a single
/// format called a message.  The top level format of message is divided
/// into 5 sections (some of which are empty in certain cases) shown below:
///
///     +--------------------------+
///     |        Header            |
///     +--------------------------+
///     |  Question / Zone         | the question for the name server
///     +--------------------------+
///     |   Answer / Prerequisite  | RRs answering the question
///     +--------------------------+
///     | Authority / Update       | RRs pointing toward an authority
///     +--------------------------+
///     |      Additional          | RRs holding additional information
///     +--------------------------+
/// ```
///
/// The EDNS OPT pseudo-record and any trailing TSIG or SIG(0) record are
/// lifted out of the additional section on decode and re-appended on
/// encode; the header counts always reflect the wire layout.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Message {
    header: Header,
    queries: Vec<Query>,
    answers: Vec<Record>,
    authorities: Vec<Record>,
    additionals: Vec<Record>,
    signature: Vec<Record>,
    edns: Option<Edns>,
}

impl Message {
    /// Returns a new "empty" message
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an update message, RFC 2136, for the use of the
    /// [`update_message`](crate::op::update_message) builders
    pub fn new_update() -> Self {
        let mut message = Self::new();
        message.set_op_code(OpCode::Update).set_recursion_desired(false);
        message
    }

    /// Sets the entire header
    pub fn set_header(&mut self, header: Header) -> &mut Self {
        self.header = header;
        self
    }

    /// Sets the transaction ID
    pub fn set_id(&mut self, id: u16) -> &mut Self {
        self.header.set_id(id);
        self
    }

    /// Sets query or response
    pub fn set_message_type(&mut self, message_type: MessageType) -> &mut Self {
        self.header.set_message_type(message_type);
        self
    }

    /// Sets the operation
    pub fn set_op_code(&mut self, op_code: OpCode) -> &mut Self {
        self.header.set_op_code(op_code);
        self
    }

    /// Sets the AA bit
    pub fn set_authoritative(&mut self, authoritative: bool) -> &mut Self {
        self.header.set_authoritative(authoritative);
        self
    }

    /// Sets the TC bit
    pub fn set_truncated(&mut self, truncated: bool) -> &mut Self {
        self.header.set_truncated(truncated);
        self
    }

    /// Sets the RD bit
    pub fn set_recursion_desired(&mut self, recursion_desired: bool) -> &mut Self {
        self.header.set_recursion_desired(recursion_desired);
        self
    }

    /// Sets the RA bit
    pub fn set_recursion_available(&mut self, recursion_available: bool) -> &mut Self {
        self.header.set_recursion_available(recursion_available);
        self
    }

    /// Sets the AD bit
    pub fn set_authentic_data(&mut self, authentic_data: bool) -> &mut Self {
        self.header.set_authentic_data(authentic_data);
        self
    }

    /// Sets the CD bit
    pub fn set_checking_disabled(&mut self, checking_disabled: bool) -> &mut Self {
        self.header.set_checking_disabled(checking_disabled);
        self
    }

    /// Sets the response code
    pub fn set_response_code(&mut self, response_code: ResponseCode) -> &mut Self {
        self.header.set_response_code(response_code);
        self
    }

    /// Adds a query, shared with the zone section of updates
    pub fn add_query(&mut self, query: Query) -> &mut Self {
        self.queries.push(query);
        self
    }

    /// Adds a record to the answer section
    pub fn add_answer(&mut self, record: Record) -> &mut Self {
        self.answers.push(record);
        self
    }

    /// Adds records to the answer section
    pub fn add_answers<I: IntoIterator<Item = Record>>(&mut self, records: I) -> &mut Self {
        self.answers.extend(records);
        self
    }

    /// Adds a record to the authority section
    pub fn add_authority(&mut self, record: Record) -> &mut Self {
        self.authorities.push(record);
        self
    }

    /// Adds records to the authority section
    pub fn add_authorities<I: IntoIterator<Item = Record>>(&mut self, records: I) -> &mut Self {
        self.authorities.extend(records);
        self
    }

    /// Adds a record to the additional section
    pub fn add_additional(&mut self, record: Record) -> &mut Self {
        self.additionals.push(record);
        self
    }

    /// Sets the EDNS information, emitted as the OPT pseudo-record
    pub fn set_edns(&mut self, edns: Edns) -> &mut Self {
        self.edns = Some(edns);
        self
    }

    /// Appends a signature record: the TSIG or SIG(0) produced by a
    /// [`MessageSigner`], kept after every other additional record
    pub fn add_signature(&mut self, record: Record) -> &mut Self {
        debug_assert!(matches!(
            record.record_type(),
            RecordType::TSIG | RecordType::SIG
        ));
        self.signature.push(record);
        self
    }

    /// The message header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The transaction ID
    pub fn id(&self) -> u16 {
        self.header.id()
    }

    /// Query or response
    pub fn message_type(&self) -> MessageType {
        self.header.message_type()
    }

    /// The operation of this message
    pub fn op_code(&self) -> OpCode {
        self.header.op_code()
    }

    /// The TC bit
    pub fn truncated(&self) -> bool {
        self.header.truncated()
    }

    /// The RD bit
    pub fn recursion_desired(&self) -> bool {
        self.header.recursion_desired()
    }

    /// The response code, including any EDNS high bits
    pub fn response_code(&self) -> ResponseCode {
        self.header.response_code()
    }

    /// The first query, if one is present
    pub fn query(&self) -> Option<&Query> {
        self.queries.first()
    }

    /// The question section, or the zone section of an update
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    /// The answer section, or the prerequisite section of an update
    pub fn answers(&self) -> &[Record] {
        &self.answers
    }

    /// Removes and returns the answer section
    pub fn take_answers(&mut self) -> Vec<Record> {
        mem::take(&mut self.answers)
    }

    /// The authority section, or the update section of an update
    pub fn authorities(&self) -> &[Record] {
        &self.authorities
    }

    /// The additional section, without OPT and signature records
    pub fn additionals(&self) -> &[Record] {
        &self.additionals
    }

    /// The trailing TSIG or SIG(0) records
    pub fn signature(&self) -> &[Record] {
        &self.signature
    }

    /// Removes the signature records from the message
    pub fn take_signature(&mut self) -> Vec<Record> {
        mem::take(&mut self.signature)
    }

    /// The EDNS information, if the message carries an OPT record
    pub fn edns(&self) -> Option<&Edns> {
        self.edns.as_ref()
    }

    /// The EDNS information, created on demand
    pub fn edns_mut(&mut self) -> &mut Edns {
        self.edns.get_or_insert_with(Edns::new)
    }

    /// The maximum UDP payload the peer advertised, or 512 without EDNS
    pub fn max_payload(&self) -> u16 {
        self.edns
            .as_ref()
            .map_or(512, |edns| edns.max_payload().max(512))
    }

    /// Signs the message, appending the produced TSIG or SIG(0) record.
    ///
    /// `inception_time` is seconds since the epoch.
    pub fn finalize(&mut self, signer: &dyn MessageSigner, inception_time: u32) -> DnsResult<()> {
        let signature = signer.sign_message(self, inception_time)?;
        self.add_signature(signature);
        Ok(())
    }

    /// Encodes the message with or without the trailing signature records;
    /// signing computes over the unsigned form, RFC 2931 4.1.8.1
    fn emit_parts(&self, encoder: &mut WireEncoder<'_>, include_signature: bool) -> DnsResult<()> {
        let mut additional_count = self.additionals.len();
        if self.edns.is_some() {
            additional_count += 1;
        }
        if include_signature {
            additional_count += self.signature.len();
        }

        let mut header = self.header;
        header
            .set_query_count(self.queries.len() as u16)
            .set_answer_count(self.answers.len() as u16)
            .set_authority_count(self.authorities.len() as u16)
            .set_additional_count(additional_count as u16);
        header.encode(encoder)?;

        for query in &self.queries {
            query.encode(encoder)?;
        }
        for record in self
            .answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.additionals.iter())
        {
            record.encode(encoder)?;
        }

        if let Some(edns) = &self.edns {
            // the high bits of the response code ride in the OPT record
            let mut edns = edns.clone();
            edns.set_rcode_high(self.header.response_code().high());
            Record::from(&edns).encode(encoder)?;
        }

        if include_signature {
            for record in &self.signature {
                record.encode(encoder)?;
            }
        }

        Ok(())
    }

    /// The bytes of the message without its signature records, the form
    /// covered by TSIG and SIG(0) computations
    pub fn to_signable_bytes(&self) -> DnsResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(512);
        {
            let mut encoder = WireEncoder::new(&mut bytes);
            self.emit_parts(&mut encoder, false)?;
        }
        Ok(bytes)
    }

    /// Decodes a message from the buffer
    pub fn from_vec(buffer: &[u8]) -> DnsResult<Self> {
        Self::from_bytes(buffer)
    }

    /// Encodes the message into a buffer
    pub fn to_vec(&self) -> DnsResult<Vec<u8>> {
        self.to_bytes()
    }

    /// Reads `count` records of a section.
    ///
    /// For the additional section this splits out the OPT record into the
    /// returned `Edns` and collects trailing SIG(0)/TSIG records, enforcing
    /// that a TSIG is the final record of the message.
    fn read_records(
        decoder: &mut WireDecoder<'_>,
        count: usize,
        is_additional: bool,
    ) -> DnsResult<(Vec<Record>, Option<Edns>, Vec<Record>)> {
        let mut records: Vec<Record> = Vec::with_capacity(count);
        let mut edns: Option<Edns> = None;
        let mut sigs: Vec<Record> = Vec::new();

        let mut saw_sig0 = false;
        let mut saw_tsig = false;
        for _ in 0..count {
            let record = Record::decode(decoder)?;
            if saw_tsig {
                return Err(DnsErrorKind::TsigMalformed("tsig must be the final record").into());
            }
            if !is_additional {
                records.push(record);
                continue;
            }

            match record.record_type() {
                RecordType::SIG => {
                    saw_sig0 = true;
                    sigs.push(record);
                }
                RecordType::TSIG => {
                    saw_tsig = true;
                    sigs.push(record);
                }
                RecordType::OPT => {
                    if saw_sig0 {
                        return Err("sig0 must follow all other additional records".into());
                    }
                    if edns.is_some() {
                        return Err("more than one edns record present".into());
                    }
                    edns = Some((&record).into());
                }
                _ => {
                    if saw_sig0 {
                        return Err("sig0 must follow all other additional records".into());
                    }
                    records.push(record);
                }
            }
        }

        Ok((records, edns, sigs))
    }
}

impl WireEncode for Message {
    fn encode(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()> {
        self.emit_parts(encoder, true)
    }
}

impl<'r> WireDecode<'r> for Message {
    fn decode(decoder: &mut WireDecoder<'r>) -> DnsResult<Self> {
        let mut header = Header::decode(decoder)?;

        let mut queries = Vec::with_capacity(header.query_count() as usize);
        for _ in 0..header.query_count() {
            queries.push(Query::decode(decoder)?);
        }

        let (answers, _, _) = Self::read_records(decoder, header.answer_count() as usize, false)?;
        let (authorities, _, _) =
            Self::read_records(decoder, header.authority_count() as usize, false)?;
        let (additionals, edns, signature) =
            Self::read_records(decoder, header.additional_count() as usize, true)?;

        // the extended response code is split across header and OPT
        if let Some(edns) = &edns {
            header.merge_response_code(edns.rcode_high());
        }

        Ok(Self {
            header,
            queries,
            answers,
            authorities,
            additionals,
            signature,
            edns,
        })
    }
}

/// Types that can append a transaction signature to a message: the TSIG
/// signer for shared secrets and the SIG(0) signer for private keys
pub trait MessageSigner {
    /// Produces the signature record over `message`; `inception_time` is
    /// seconds since the epoch at the moment of sending
    fn sign_message(&self, message: &Message, inception_time: u32) -> DnsResult<Record>;

    /// Verifies a signed response against this signer's key material.
    ///
    /// `request_signature` carries the request's own signature (the request
    /// MAC for TSIG), and `first` whether this is the first message of a
    /// multi-message response stream.
    fn verify_response(
        &self,
        response: &[u8],
        request_signature: &[u8],
        first: bool,
    ) -> DnsResult<Vec<u8>>;
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; header {header}", header = self.header)?;
        if let Some(edns) = &self.edns {
            writeln!(f, "; edns {edns}")?;
        }

        writeln!(f, "; query")?;
        for query in &self.queries {
            writeln!(f, ";; {query}")?;
        }

        if self.header.message_type() == MessageType::Response
            || self.header.op_code() == OpCode::Update
        {
            writeln!(f, "; answers {}", self.answers.len())?;
            for record in &self.answers {
                writeln!(f, "{record}")?;
            }
            writeln!(f, "; authorities {}", self.authorities.len())?;
            for record in &self.authorities {
                writeln!(f, "{record}")?;
            }
            writeln!(f, "; additionals {}", self.additionals.len())?;
            for record in &self.additionals {
                writeln!(f, "{record}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rr::{DnsClass, Name, RData, RecordType};
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    #[test]
    fn test_emit_and_read_empty() {
        let mut message = Message::new();
        message.set_id(10);

        let bytes = message.to_bytes().unwrap();
        assert_eq!(bytes.len(), 12);
        assert_eq!(Message::from_bytes(&bytes).unwrap(), message);
    }

    #[test]
    fn test_emit_and_read_query() {
        let mut message = Message::new();
        message
            .set_id(10)
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Update)
            .set_authoritative(true)
            .set_truncated(true)
            .set_recursion_desired(true)
            .set_recursion_available(true)
            .set_response_code(ResponseCode::ServFail)
            .add_query(Query::query(
                Name::from_str("www.example.com.").unwrap(),
                RecordType::A,
            ));

        let bytes = message.to_bytes().unwrap();
        assert_eq!(Message::from_bytes(&bytes).unwrap(), message);
    }

    #[test]
    fn test_emit_and_read_records() {
        let mut message = Message::new();
        message.set_id(1234);
        let record = Record::from_rdata(
            Name::from_str("www.example.com.").unwrap(),
            600,
            RData::A(Ipv4Addr::new(10, 1, 2, 3)),
        );
        message
            .add_answer(record.clone())
            .add_authority(record.clone())
            .add_additional(record);

        let bytes = message.to_bytes().unwrap();
        let decoded = Message::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.header().answer_count(), 1);
        assert_eq!(decoded.header().authority_count(), 1);
        assert_eq!(decoded.header().additional_count(), 1);
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_header_counts_match_sections() {
        let mut message = Message::new();
        message.add_query(Query::query(
            Name::from_str("example.com.").unwrap(),
            RecordType::SOA,
        ));
        message.edns_mut().set_max_payload(4096);

        let bytes = message.to_bytes().unwrap();
        let decoded = Message::from_bytes(&bytes).unwrap();

        // the OPT record is counted on the wire but projected into edns
        assert_eq!(decoded.header().query_count(), 1);
        assert_eq!(decoded.header().additional_count(), 1);
        assert!(decoded.edns().is_some());
        assert_eq!(decoded.additionals().len(), 0);
        assert_eq!(decoded.max_payload(), 4096);
    }

    #[test]
    fn test_mx_query_wire_format() {
        // a 28 octet query: header, QNAME, QTYPE MX, QCLASS IN
        let mut message = Message::new();
        message.set_id(0x1234).set_recursion_desired(true);
        message.add_query(Query::query(
            Name::from_str("google.com.").unwrap(),
            RecordType::MX,
        ));

        let bytes = message.to_bytes().unwrap();
        assert_eq!(
            bytes,
            vec![
                0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x06,
                b'g', b'o', b'o', b'g', b'l', b'e', 0x03, b'c', b'o', b'm', 0x00, 0x00, 0x0F,
                0x00, 0x01,
            ]
        );
    }

    #[test]
    fn test_double_opt_rejected() {
        let mut message = Message::new();
        message.edns_mut();
        let opt_record = Record::from(&Edns::new());

        let mut bytes = Vec::new();
        {
            let mut encoder = WireEncoder::new(&mut bytes);
            message.emit_parts(&mut encoder, true).unwrap();
            // hand-append a second OPT and fix up ARCOUNT
            opt_record.encode(&mut encoder).unwrap();
        }
        bytes[11] = 2;

        assert!(Message::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_tsig_must_be_last() {
        use crate::rr::dnssec::rdata::{DnssecRData, Tsig, TsigAlgorithm};

        let tsig = Record::from_rdata(
            Name::from_str("key.").unwrap(),
            0,
            RData::DNSSEC(DnssecRData::Tsig(Tsig::new(
                TsigAlgorithm::HmacSha256,
                0,
                300,
                Vec::new(),
                0,
                0,
                Vec::new(),
            ))),
        );

        let a_record = Record::from_rdata(
            Name::from_str("www.example.com.").unwrap(),
            0,
            RData::A(Ipv4Addr::new(1, 2, 3, 4)),
        );

        let mut bytes = Vec::new();
        {
            let mut encoder = WireEncoder::new(&mut bytes);
            let mut header = Header::new();
            header.set_additional_count(2);
            header.encode(&mut encoder).unwrap();
            tsig.encode(&mut encoder).unwrap();
            a_record.encode(&mut encoder).unwrap();
        }

        assert!(Message::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_update_sentinel_class_survives() {
        // delete-rrset sentinel: class ANY, empty rdata
        let mut message = Message::new_update();
        message.add_query(Query::query(
            Name::from_str("example.com.").unwrap(),
            RecordType::SOA,
        ));
        let mut sentinel = Record::with(
            Name::from_str("old.example.com.").unwrap(),
            RecordType::A,
            0,
        );
        sentinel.set_dns_class(DnsClass::ANY);
        message.add_authority(sentinel.clone());

        let bytes = message.to_bytes().unwrap();
        let decoded = Message::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.authorities(), &[sentinel]);
        assert_eq!(decoded.op_code(), OpCode::Update);
    }
}
