// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! option record for passing EDNS information

use std::fmt;

use crate::error::DnsResult;
use crate::serialize::binary::{WireDecoder, WireEncoder};

/// [RFC 6891, Extension Mechanisms for DNS, April 2013](https://tools.ietf.org/html/rfc6891#section-6.1.2)
///
/// ```text
/// 6.1.2.  Wire Format
///
///    The variable part of an OPT RR may contain zero or more options in
///    the RDATA.  Each option MUST be treated as a bit field.  Each option
///    is encoded as:
///
///                   +0 (MSB)                            +1 (LSB)
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///     0: |                          OPTION-CODE                          |
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///     2: |                         OPTION-LENGTH                         |
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///     4: |                                                               |
///        /                          OPTION-DATA                          /
///        /                                                               /
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
/// ```
///
/// The fixed header fields of the OPT pseudo-record (payload size,
/// extended RCODE, version, flags) are carried by
/// [`Edns`](crate::op::Edns); this type models only the RDATA.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Opt {
    options: Vec<EdnsOption>,
}

impl Opt {
    /// Creates a new OPT record data with the given options
    pub fn new(options: Vec<EdnsOption>) -> Self {
        Self { options }
    }

    /// The options in wire order
    pub fn options(&self) -> &[EdnsOption] {
        &self.options
    }

    /// Returns the first option with the given code, if present
    pub fn get(&self, code: EdnsCode) -> Option<&EdnsOption> {
        self.options.iter().find(|o| o.code == code)
    }

    /// Appends an option, replacing an existing option of the same code
    pub fn insert(&mut self, option: EdnsOption) {
        self.options.retain(|o| o.code != option.code);
        self.options.push(option);
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>, rdata_length: u16) -> DnsResult<Opt> {
    let end = decoder.index() + rdata_length as usize;

    let mut options = Vec::new();
    while decoder.index() < end {
        let code = EdnsCode::from(decoder.read_u16()?);
        let len = decoder.read_u16()? as usize;
        if decoder.index() + len > end {
            return Err("edns option overruns rdata".into());
        }
        let data = decoder.read_vec(len)?;
        options.push(EdnsOption::new(code, data));
    }

    Ok(Opt::new(options))
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, opt: &Opt) -> DnsResult<()> {
    for option in opt.options() {
        encoder.emit_u16(option.code.into())?;
        encoder.emit_u16(option.data.len() as u16)?;
        encoder.emit_bytes(&option.data)?;
    }
    Ok(())
}

impl fmt::Display for Opt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for option in &self.options {
            write!(f, "{:?} ", option.code)?;
        }
        Ok(())
    }
}

/// A single EDNS option, an opaque `{option-code, option-data}` pair
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EdnsOption {
    code: EdnsCode,
    data: Vec<u8>,
}

impl EdnsOption {
    /// Creates a new option from the code and its data
    pub fn new(code: EdnsCode, data: Vec<u8>) -> Self {
        Self { code, data }
    }

    /// The option code
    pub fn code(&self) -> EdnsCode {
        self.code
    }

    /// The option data, opaque to this library
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// EDNS option codes from the IANA registry
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub enum EdnsCode {
    /// [RFC 5001, DNS Name Server Identifier (NSID) Option](https://tools.ietf.org/html/rfc5001)
    Nsid,
    /// [RFC 7871, Client Subnet in DNS Queries](https://tools.ietf.org/html/rfc7871)
    Subnet,
    /// [RFC 7314, DNS (EDNS) EXPIRE Option](https://tools.ietf.org/html/rfc7314)
    Expire,
    /// [RFC 7873, Domain Name System (DNS) Cookies](https://tools.ietf.org/html/rfc7873)
    Cookie,
    /// [RFC 7828, The edns-tcp-keepalive EDNS0 Option](https://tools.ietf.org/html/rfc7828)
    Keepalive,
    /// [RFC 7830, The EDNS(0) Padding Option](https://tools.ietf.org/html/rfc7830)
    Padding,
    /// Unknown, the code is preserved
    Unknown(u16),
}

impl From<u16> for EdnsCode {
    fn from(value: u16) -> Self {
        match value {
            3 => Self::Nsid,
            8 => Self::Subnet,
            9 => Self::Expire,
            10 => Self::Cookie,
            11 => Self::Keepalive,
            12 => Self::Padding,
            _ => Self::Unknown(value),
        }
    }
}

impl From<EdnsCode> for u16 {
    fn from(code: EdnsCode) -> Self {
        match code {
            EdnsCode::Nsid => 3,
            EdnsCode::Subnet => 8,
            EdnsCode::Expire => 9,
            EdnsCode::Cookie => 10,
            EdnsCode::Keepalive => 11,
            EdnsCode::Padding => 12,
            EdnsCode::Unknown(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let rdata = Opt::new(vec![
            EdnsOption::new(EdnsCode::Cookie, vec![1, 2, 3, 4, 5, 6, 7, 8]),
            EdnsOption::new(EdnsCode::Unknown(65001), vec![0xFF]),
        ]);

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(
            read(&mut WireDecoder::new(&bytes), bytes.len() as u16).unwrap(),
            rdata
        );
    }

    #[test]
    fn test_option_overrun_is_error() {
        // cookie option claiming 8 bytes with only 2 present
        let bytes = [0x00, 0x0A, 0x00, 0x08, 0xAA, 0xBB];
        assert!(read(&mut WireDecoder::new(&bytes), 6).is_err());
    }

    #[test]
    fn test_insert_replaces() {
        let mut opt = Opt::default();
        opt.insert(EdnsOption::new(EdnsCode::Nsid, vec![]));
        opt.insert(EdnsOption::new(EdnsCode::Nsid, vec![1]));
        assert_eq!(opt.options().len(), 1);
        assert_eq!(opt.get(EdnsCode::Nsid).unwrap().data(), [1]);
    }
}
