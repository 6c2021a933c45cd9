// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! null record type, generally not used except as an internal tool for
//! representing opaque RDATA and the empty-RDATA update sentinels

use std::fmt;

use data_encoding::BASE64;

use crate::error::DnsResult;
use crate::serialize::binary::{WireDecoder, WireEncoder};

/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 3.3.10. NULL RDATA format (EXPERIMENTAL)
///
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     /                  <anything>                   /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///
/// Anything at all may be in the RDATA field so long as it is 65535 octets
/// or less.
/// ```
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct Null {
    anything: Vec<u8>,
}

impl Null {
    /// Construct a new NULL RData with no, i.e. empty, data
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new NULL RData with the associated data
    pub fn with(anything: Vec<u8>) -> Self {
        Self { anything }
    }

    /// The raw bytes of the RDATA
    pub fn anything(&self) -> &[u8] {
        &self.anything
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>, rdata_length: u16) -> DnsResult<Null> {
    Ok(Null::with(decoder.read_vec(rdata_length as usize)?))
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, null: &Null) -> DnsResult<()> {
    encoder.emit_bytes(null.anything())
}

impl fmt::Display for Null {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&BASE64.encode(self.anything()))
    }
}
