// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! allows a DNS domain name holder to specify the Certification Authorities
//! authorized to issue certificates for that domain

use std::fmt;
use std::str;

use crate::error::{DnsErrorKind, DnsResult};
use crate::serialize::binary::{WireDecoder, WireEncoder};

/// [RFC 6844, DNS Certification Authority Authorization, January 2013](https://tools.ietf.org/html/rfc6844#section-5.1)
///
/// ```text
/// 5.1.  Syntax
///
/// A CAA RR contains a single property entry consisting of a tag-value
/// pair.  Each tag represents a property of the CAA record.  The value
/// of a CAA property is that specified in the corresponding value field.
///
/// +0-1-2-3-4-5-6-7-|0-1-2-3-4-5-6-7-|
/// | Flags          | Tag Length = n |
/// +----------------+----------------+...+---------------+
/// | Tag char 0     | Tag char 1     |...| Tag char n-1  |
/// +----------------+----------------+...+---------------+
/// +----------------+----------------+.....+----------------+
/// | Value byte 0   | Value byte 1   |.....| Value byte m-1 |
/// +----------------+----------------+.....+----------------+
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Caa {
    issuer_critical: bool,
    tag: String,
    value: Vec<u8>,
}

impl Caa {
    /// Creates a new CAA record data.
    ///
    /// The tag must be 1..=15 alphanumeric US-ASCII characters; it is
    /// stored lowercased, as tags are case insensitive.
    pub fn new(issuer_critical: bool, tag: &str, value: Vec<u8>) -> DnsResult<Self> {
        if tag.is_empty() || tag.len() > 15 || !tag.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err("caa tag must be 1..=15 alphanumeric characters".into());
        }

        Ok(Self {
            issuer_critical,
            tag: tag.to_ascii_lowercase(),
            value,
        })
    }

    /// The issuer critical flag: an unknown tag must then be treated as a
    /// refusal to issue
    pub fn issuer_critical(&self) -> bool {
        self.issuer_critical
    }

    /// The property tag, e.g. `issue`, `issuewild` or `iodef`
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The property value bytes
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>, rdata_length: u16) -> DnsResult<Caa> {
    let end = decoder
        .index()
        .checked_add(rdata_length as usize)
        .ok_or(DnsErrorKind::Message("rdata end position overflow"))?;

    let flags = decoder.read_u8()?;
    let issuer_critical = flags & 0b1000_0000 != 0;

    let tag_bytes = decoder.read_character_data()?;
    let tag = str::from_utf8(tag_bytes).map_err(|_| "caa tag is not ascii")?;

    if decoder.index() > end {
        return Err("caa tag overruns rdata".into());
    }
    let value = decoder.read_vec(end - decoder.index())?;

    Caa::new(issuer_critical, tag, value)
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, caa: &Caa) -> DnsResult<()> {
    let flags = if caa.issuer_critical() { 0b1000_0000 } else { 0 };
    encoder.emit_u8(flags)?;
    encoder.emit_character_data(caa.tag())?;
    encoder.emit_bytes(caa.value())
}

impl fmt::Display for Caa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = if self.issuer_critical { 128 } else { 0 };
        write!(f, "{flags} {tag} \"", tag = self.tag)?;
        for &b in &self.value {
            match b {
                b'"' | b'\\' => write!(f, "\\{}", b as char)?,
                0x20..=0x7E => write!(f, "{}", b as char)?,
                _ => write!(f, "\\{b:03}")?,
            }
        }
        f.write_str("\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let rdata = Caa::new(true, "issue", b"ca.example.net".to_vec()).unwrap();

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(
            read(&mut WireDecoder::new(&bytes), bytes.len() as u16).unwrap(),
            rdata
        );
    }

    #[test]
    fn test_tag_validation() {
        assert!(Caa::new(false, "", Vec::new()).is_err());
        assert!(Caa::new(false, "has space", Vec::new()).is_err());
        assert!(Caa::new(false, "sixteencharslong", Vec::new()).is_err());
    }

    #[test]
    fn test_tag_case_folds() {
        let rdata = Caa::new(false, "IssueWild", Vec::new()).unwrap();
        assert_eq!(rdata.tag(), "issuewild");
    }
}
