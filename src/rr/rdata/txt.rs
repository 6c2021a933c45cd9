// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! text records for storing arbitrary data

use std::fmt;

use crate::error::DnsResult;
use crate::serialize::binary::{WireDecoder, WireEncoder};

/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 3.3.14. TXT RDATA format
///
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     /                   TXT-DATA                    /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///
/// TXT RRs are used to hold descriptive text.  The semantics of the text
/// depends on the domain where it is found.
/// ```
///
/// The RDATA is one or more `<character-string>`s, each 0..255 octets.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct Txt {
    txt_data: Vec<Box<[u8]>>,
}

impl Txt {
    /// Creates a new TXT record data from strings
    pub fn new(txt_data: Vec<String>) -> Self {
        Self {
            txt_data: txt_data
                .into_iter()
                .map(|s| s.into_bytes().into_boxed_slice())
                .collect(),
        }
    }

    /// Creates a new TXT record data from raw character-strings
    pub fn from_bytes(txt_data: Vec<&[u8]>) -> Self {
        Self {
            txt_data: txt_data.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the raw character-strings of this TXT record
    pub fn txt_data(&self) -> &[Box<[u8]>] {
        &self.txt_data
    }
}

/// Read the RData from the given decoder, consuming exactly `rdata_length`
pub fn read(decoder: &mut WireDecoder<'_>, rdata_length: u16) -> DnsResult<Txt> {
    let end = decoder.index() + rdata_length as usize;

    let mut strings = Vec::with_capacity(1);
    while decoder.index() < end {
        let string = decoder.read_character_data()?;
        strings.push(string);
    }

    Ok(Txt::from_bytes(strings))
}

/// Write the RData to the given encoder
pub fn emit(encoder: &mut WireEncoder<'_>, txt: &Txt) -> DnsResult<()> {
    for string in txt.txt_data() {
        encoder.emit_character_data(string)?;
    }
    Ok(())
}

impl fmt::Display for Txt {
    /// Each character-string is quoted; `"` and `\` inside the data are
    /// escaped, other non-printable octets render as `\DDD`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for string in &self.txt_data {
            if !first {
                f.write_str(" ")?;
            }
            first = false;

            f.write_str("\"")?;
            for &b in string.iter() {
                match b {
                    b'"' | b'\\' => write!(f, "\\{}", b as char)?,
                    0x20..=0x7E => write!(f, "{}", b as char)?,
                    _ => write!(f, "\\{b:03}")?,
                }
            }
            f.write_str("\"")?;
        }
        Ok(())
    }
}
