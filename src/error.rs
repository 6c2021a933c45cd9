// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Error types for the crate

use std::{fmt, io};

use enum_as_inner::EnumAsInner;
use thiserror::Error;

use crate::op::ResponseCode;
use crate::rr::Name;

/// An alias for results returned by functions of this crate
pub type DnsResult<T> = Result<T, DnsError>;

/// The error kind for errors that get returned in the crate
#[derive(Debug, EnumAsInner, Error)]
#[non_exhaustive]
pub enum DnsErrorKind {
    // ----- configuration -----
    /// The resolver was constructed without any nameservers
    #[error("no nameservers configured")]
    NoNameservers,

    /// Conflicting or otherwise unusable configuration
    #[error("bad configuration: {0}")]
    BadConfig(&'static str),

    // ----- malformed packets -----
    /// An error with an arbitrary message, for one-off decode failures
    #[error("{0}")]
    Message(&'static str),

    /// An error with an arbitrary message, stored as String
    #[error("{0}")]
    Msg(String),

    /// A label exceeded the 63 octet limit
    #[error("label bytes exceed 63: {0}")]
    LabelBytesTooLong(usize),

    /// A name exceeded the 255 octet limit
    #[error("name bytes exceed 255: {0}")]
    DomainNameTooLong(usize),

    /// A compression pointer did not point strictly backwards
    #[error("compression pointer at {idx} does not precede the name")]
    PointerNotPriorToLabel {
        /// index of the bad pointer in the buffer
        idx: usize,
    },

    /// An unrecognized label code was read, `0b10`/`0b01` prefixes are reserved
    #[error("unrecognized label code: {0:b}")]
    UnrecognizedLabelCode(u8),

    /// A character string exceeded the maximum permitted length
    #[error("char data length exceeds {max}: {len}")]
    CharacterDataTooLong {
        /// the maximum allowed
        max: usize,
        /// the length that was read
        len: usize,
    },

    /// The RDATA consumed on read did not match the claimed RDLENGTH
    #[error("incorrect rdata length read: {read} expected: {len}")]
    IncorrectRDataLengthRead {
        /// the number of bytes consumed
        read: usize,
        /// the RDLENGTH claimed by the record
        len: usize,
    },

    /// The OPT pseudo-record carried a non-root owner name
    #[error("edns record name must be root: {0}")]
    EdnsNameNotRoot(Name),

    /// An unknown opcode value was read from a header
    #[error("unknown opcode: {0}")]
    UnknownOpCode(u8),

    // ----- network -----
    /// An underlying socket error
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The per-attempt deadline elapsed without a usable response
    #[error("request timed out")]
    Timeout,

    // ----- invalid responses -----
    /// The response ID did not match the request
    #[error("response id {got} does not match request id {expect}")]
    IdMismatch {
        /// the ID sent in the request
        expect: u16,
        /// the ID found in the response
        got: u16,
    },

    /// The response did not have the QR bit set
    #[error("message is not a response")]
    NotResponse,

    /// The response question did not echo the request question
    #[error("response question does not match request")]
    QuestionMismatch,

    /// The server answered with a response code other than NoError
    #[error("response code: {0}")]
    ErrorResponse(ResponseCode),

    // ----- authentication -----
    /// A TSIG MAC failed to validate
    #[error("tsig mac invalid")]
    TsigInvalidMac,

    /// A TSIG signing time fell outside the fudge window
    #[error("tsig time {time} outside of fudge window")]
    TsigTimeOutOfRange {
        /// the time the peer claims to have signed at
        time: u64,
    },

    /// A TSIG record was expected and missing, or not in final position
    #[error("{0}")]
    TsigMalformed(&'static str),

    /// A SIG(0) or RRSIG signature failed to validate
    #[error("signature verification failed")]
    SignatureInvalid,

    /// An algorithm number the crate cannot operate with
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(u8),

    /// A TSIG algorithm name the crate cannot operate with
    #[error("unsupported tsig algorithm: {0}")]
    UnsupportedTsigAlgorithm(Name),

    // ----- key material -----
    /// A private key file could not be parsed
    #[error("key file: {0}")]
    KeyFileSyntax(String),

    /// The `Algorithm:` line disagrees with the algorithm in the filename
    #[error("key file algorithm {found} does not match filename algorithm {expect}")]
    KeyFileAlgorithmMismatch {
        /// the algorithm number encoded in the filename
        expect: u8,
        /// the algorithm number declared inside the file
        found: u8,
    },

    // ----- crypto backend -----
    /// An error from the crypto backend
    #[error("ssl error: {0}")]
    Ssl(#[from] openssl::error::ErrorStack),
}

/// The error type for errors that get returned in the crate
#[derive(Debug)]
pub struct DnsError {
    kind: Box<DnsErrorKind>,
}

impl std::error::Error for DnsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&*self.kind)
    }
}

impl DnsError {
    /// Get the kind of the error
    pub fn kind(&self) -> &DnsErrorKind {
        &self.kind
    }

    /// True for error kinds that should push the resolver on to the next
    /// configured nameserver rather than aborting the request.
    pub(crate) fn is_retriable(&self) -> bool {
        matches!(
            *self.kind,
            DnsErrorKind::Io(_) | DnsErrorKind::Timeout | DnsErrorKind::NotResponse
        )
    }
}

impl fmt::Display for DnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl From<DnsErrorKind> for DnsError {
    fn from(kind: DnsErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
        }
    }
}

impl From<&'static str> for DnsError {
    fn from(msg: &'static str) -> Self {
        DnsErrorKind::Message(msg).into()
    }
}

impl From<String> for DnsError {
    fn from(msg: String) -> Self {
        DnsErrorKind::Msg(msg).into()
    }
}

impl From<io::Error> for DnsError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => DnsErrorKind::Timeout.into(),
            _ => DnsErrorKind::Io(e).into(),
        }
    }
}

impl From<openssl::error::ErrorStack> for DnsError {
    fn from(e: openssl::error::ErrorStack) -> Self {
        DnsErrorKind::Ssl(e).into()
    }
}
