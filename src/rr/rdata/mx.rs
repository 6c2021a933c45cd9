// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! mail exchange, email, record

use std::fmt;

use crate::error::DnsResult;
use crate::rr::Name;
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncoder};

/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 3.3.9. MX RDATA format
///
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                  PREFERENCE                   |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     /                   EXCHANGE                    /
///     /                                               /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///
/// MX records cause type A additional section processing for the host
/// specified by EXCHANGE.
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Mx {
    preference: u16,
    exchange: Name,
}

impl Mx {
    /// Constructs a new MX RData
    ///
    /// # Arguments
    ///
    /// * `preference` - weight of this MX record among others at the same
    ///   owner, lower values are preferred
    /// * `exchange` - name of the mail server
    pub fn new(preference: u16, exchange: Name) -> Self {
        Self {
            preference,
            exchange,
        }
    }

    /// The preference of this record, lower values preferred
    pub fn preference(&self) -> u16 {
        self.preference
    }

    /// A name which specifies a host willing to act as a mail exchange
    pub fn exchange(&self) -> &Name {
        &self.exchange
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>) -> DnsResult<Mx> {
    Ok(Mx::new(decoder.read_u16()?, Name::decode(decoder)?))
}

/// Write the RData to the given encoder, the exchange lowercases in
/// canonical mode per RFC 4034 6.2
pub fn emit(encoder: &mut WireEncoder<'_>, mx: &Mx) -> DnsResult<()> {
    let is_canonical = encoder.is_canonical_names();
    encoder.emit_u16(mx.preference())?;
    mx.exchange().emit_with_lowercase(encoder, is_canonical)
}

impl fmt::Display for Mx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{pref} {ex}", pref = self.preference, ex = self.exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_roundtrip() {
        let rdata = Mx::new(16, Name::from_str("mail.example.com.").unwrap());

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        let read_rdata = read(&mut WireDecoder::new(&bytes)).expect("decoding error");
        assert_eq!(rdata, read_rdata);
    }
}
