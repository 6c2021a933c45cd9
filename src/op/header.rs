// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Message metadata

use std::fmt;

use crate::error::DnsResult;
use crate::op::{OpCode, ResponseCode};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// Metadata for the `Message` struct.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 4.1.1. Header section format
///
/// The header contains the following fields
///
///                                    1  1  1  1  1  1
///      0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      ID                       |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |QR|   Opcode  |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    QDCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    ANCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    NSCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    ARCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// AD and CD from RFC 4035.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    id: u16,
    message_type: MessageType,
    op_code: OpCode,
    authoritative: bool,
    truncated: bool,
    recursion_desired: bool,
    recursion_available: bool,
    authentic_data: bool,
    checking_disabled: bool,
    response_code: ResponseCode,
    query_count: u16,
    answer_count: u16,
    authority_count: u16,
    additional_count: u16,
}

/// Message types are either Query (also Update and Notify) or Response
#[derive(Debug, PartialEq, Eq, PartialOrd, Copy, Clone, Hash)]
pub enum MessageType {
    /// Queries are client requests, these are Queries, Updates or Notifies
    Query,
    /// Response message from the server or upstream recursor
    Response,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Query => "QUERY",
            Self::Response => "RESPONSE",
        };
        f.write_str(s)
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Header {
    /// Length of the header, DNS headers are always 12 bytes
    pub const fn len() -> usize {
        12
    }

    /// A new header for a query with id 0
    pub const fn new() -> Self {
        Self {
            id: 0,
            message_type: MessageType::Query,
            op_code: OpCode::Query,
            authoritative: false,
            truncated: false,
            recursion_desired: false,
            recursion_available: false,
            authentic_data: false,
            checking_disabled: false,
            response_code: ResponseCode::NoError,
            query_count: 0,
            answer_count: 0,
            authority_count: 0,
            additional_count: 0,
        }
    }

    /// Sets the transaction ID
    pub fn set_id(&mut self, id: u16) -> &mut Self {
        self.id = id;
        self
    }

    /// Sets the QR bit, query or response
    pub fn set_message_type(&mut self, message_type: MessageType) -> &mut Self {
        self.message_type = message_type;
        self
    }

    /// Sets the operation being performed
    pub fn set_op_code(&mut self, op_code: OpCode) -> &mut Self {
        self.op_code = op_code;
        self
    }

    /// Sets the AA bit
    pub fn set_authoritative(&mut self, authoritative: bool) -> &mut Self {
        self.authoritative = authoritative;
        self
    }

    /// Sets the TC bit, the message was truncated to fit the transport
    pub fn set_truncated(&mut self, truncated: bool) -> &mut Self {
        self.truncated = truncated;
        self
    }

    /// Sets the RD bit, direct the server to recurse on our behalf
    pub fn set_recursion_desired(&mut self, recursion_desired: bool) -> &mut Self {
        self.recursion_desired = recursion_desired;
        self
    }

    /// Sets the RA bit
    pub fn set_recursion_available(&mut self, recursion_available: bool) -> &mut Self {
        self.recursion_available = recursion_available;
        self
    }

    /// Sets the AD bit, RFC 4035
    pub fn set_authentic_data(&mut self, authentic_data: bool) -> &mut Self {
        self.authentic_data = authentic_data;
        self
    }

    /// Sets the CD bit, RFC 4035
    pub fn set_checking_disabled(&mut self, checking_disabled: bool) -> &mut Self {
        self.checking_disabled = checking_disabled;
        self
    }

    /// Sets the low bits of the response code
    pub fn set_response_code(&mut self, response_code: ResponseCode) -> &mut Self {
        self.response_code = response_code;
        self
    }

    /// Merge the high bits recovered from an OPT record into the response
    /// code read from the header
    pub fn merge_response_code(&mut self, high: u8) {
        if high > 0 {
            self.response_code = ResponseCode::from_parts(high, self.response_code.low());
        }
    }

    /// Sets QDCOUNT
    pub fn set_query_count(&mut self, count: u16) -> &mut Self {
        self.query_count = count;
        self
    }

    /// Sets ANCOUNT
    pub fn set_answer_count(&mut self, count: u16) -> &mut Self {
        self.answer_count = count;
        self
    }

    /// Sets NSCOUNT
    pub fn set_authority_count(&mut self, count: u16) -> &mut Self {
        self.authority_count = count;
        self
    }

    /// Sets ARCOUNT
    pub fn set_additional_count(&mut self, count: u16) -> &mut Self {
        self.additional_count = count;
        self
    }

    /// The transaction ID
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Query or response
    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// The operation of this message
    pub fn op_code(&self) -> OpCode {
        self.op_code
    }

    /// The AA bit
    pub fn authoritative(&self) -> bool {
        self.authoritative
    }

    /// The TC bit
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// The RD bit
    pub fn recursion_desired(&self) -> bool {
        self.recursion_desired
    }

    /// The RA bit
    pub fn recursion_available(&self) -> bool {
        self.recursion_available
    }

    /// The AD bit
    pub fn authentic_data(&self) -> bool {
        self.authentic_data
    }

    /// The CD bit
    pub fn checking_disabled(&self) -> bool {
        self.checking_disabled
    }

    /// The response code, including high bits merged from EDNS if present
    pub fn response_code(&self) -> ResponseCode {
        self.response_code
    }

    /// QDCOUNT, the number of entries in the question section; for updates
    /// this is the zone count
    pub fn query_count(&self) -> u16 {
        self.query_count
    }

    /// ANCOUNT, the number of records in the answer section; for updates
    /// this is the prerequisite count
    pub fn answer_count(&self) -> u16 {
        self.answer_count
    }

    /// NSCOUNT, the number of records in the authority section; for updates
    /// this is the update record count
    pub fn authority_count(&self) -> u16 {
        self.authority_count
    }

    /// ARCOUNT, the number of records in the additional section
    pub fn additional_count(&self) -> u16 {
        self.additional_count
    }
}

impl WireEncode for Header {
    fn encode(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()> {
        encoder.emit_u16(self.id)?;

        // QR, OpCode, AA, TC, RD
        let mut qr_op_aa_tc_rd: u8 = if self.message_type == MessageType::Response {
            0x80
        } else {
            0x00
        };
        qr_op_aa_tc_rd |= u8::from(self.op_code) << 3;
        qr_op_aa_tc_rd |= if self.authoritative { 0x4 } else { 0x0 };
        qr_op_aa_tc_rd |= if self.truncated { 0x2 } else { 0x0 };
        qr_op_aa_tc_rd |= if self.recursion_desired { 0x1 } else { 0x0 };
        encoder.emit_u8(qr_op_aa_tc_rd)?;

        // RA, Z, AD, CD, RCODE
        let mut ra_z_ad_cd_rcode: u8 = if self.recursion_available { 0x80 } else { 0x00 };
        ra_z_ad_cd_rcode |= if self.authentic_data { 0x20 } else { 0x00 };
        ra_z_ad_cd_rcode |= if self.checking_disabled { 0x10 } else { 0x00 };
        ra_z_ad_cd_rcode |= self.response_code.low();
        encoder.emit_u8(ra_z_ad_cd_rcode)?;

        encoder.emit_u16(self.query_count)?;
        encoder.emit_u16(self.answer_count)?;
        encoder.emit_u16(self.authority_count)?;
        encoder.emit_u16(self.additional_count)?;

        Ok(())
    }
}

impl<'r> WireDecode<'r> for Header {
    fn decode(decoder: &mut WireDecoder<'r>) -> DnsResult<Self> {
        let id = decoder.read_u16()?;

        let qr_op_aa_tc_rd = decoder.pop()?;
        let message_type = if qr_op_aa_tc_rd & 0b1000_0000 != 0 {
            MessageType::Response
        } else {
            MessageType::Query
        };
        let op_code = OpCode::from_u8((0b0111_1000 & qr_op_aa_tc_rd) >> 3)?;
        let authoritative = qr_op_aa_tc_rd & 0b0000_0100 != 0;
        let truncated = qr_op_aa_tc_rd & 0b0000_0010 != 0;
        let recursion_desired = qr_op_aa_tc_rd & 0b0000_0001 != 0;

        let ra_z_ad_cd_rcode = decoder.pop()?;
        let recursion_available = ra_z_ad_cd_rcode & 0b1000_0000 != 0;
        let authentic_data = ra_z_ad_cd_rcode & 0b0010_0000 != 0;
        let checking_disabled = ra_z_ad_cd_rcode & 0b0001_0000 != 0;
        let response_code = ResponseCode::from_low(ra_z_ad_cd_rcode & 0b0000_1111);

        let query_count = decoder.read_u16()?;
        let answer_count = decoder.read_u16()?;
        let authority_count = decoder.read_u16()?;
        let additional_count = decoder.read_u16()?;

        Ok(Self {
            id,
            message_type,
            op_code,
            authoritative,
            truncated,
            recursion_desired,
            recursion_available,
            authentic_data,
            checking_disabled,
            response_code,
            query_count,
            answer_count,
            authority_count,
            additional_count,
        })
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{id}:{mt}:{op}:{code}:{answers}/{authorities}/{additionals}",
            id = self.id,
            mt = self.message_type,
            op = self.op_code,
            code = self.response_code,
            answers = self.answer_count,
            authorities = self.authority_count,
            additionals = self.additional_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Header {
        let mut header = Header::new();
        header
            .set_id(0x0110)
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Update)
            .set_truncated(true)
            .set_recursion_available(true)
            .set_response_code(ResponseCode::NXDomain)
            .set_query_count(0x8877)
            .set_answer_count(0x6655)
            .set_authority_count(0x4433)
            .set_additional_count(0x2211);
        header
    }

    const SAMPLE_BYTES: [u8; 12] = [
        0x01, 0x10, 0xAA, 0x83, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11,
    ];

    #[test]
    fn test_encode() {
        assert_eq!(sample().to_bytes().unwrap(), SAMPLE_BYTES);
    }

    #[test]
    fn test_decode() {
        assert_eq!(Header::from_bytes(&SAMPLE_BYTES).unwrap(), sample());
    }

    #[test]
    fn test_short_buffer_rejected() {
        assert!(Header::from_bytes(&SAMPLE_BYTES[..11]).is_err());
    }
}
