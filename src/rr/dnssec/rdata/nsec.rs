// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! negative cache proof for closest name

use std::fmt;

use crate::error::DnsResult;
use crate::rr::type_bit_map::{decode_type_bit_maps, encode_type_bit_maps};
use crate::rr::{Name, RecordType};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncoder};

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-4.1)
///
/// ```text
/// 4.1.  NSEC RDATA Wire Format
///
///    The RDATA of the NSEC RR is as shown below:
///
///                         1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    /                      Next Domain Name                         /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    /                       Type Bit Maps                           /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Nsec {
    next_domain_name: Name,
    type_bit_maps: Vec<RecordType>,
}

impl Nsec {
    /// Constructs a new NSEC record data
    pub fn new(next_domain_name: Name, type_bit_maps: Vec<RecordType>) -> Self {
        Self {
            next_domain_name,
            type_bit_maps,
        }
    }

    /// The next owner name in the canonical ordering of the zone
    pub fn next_domain_name(&self) -> &Name {
        &self.next_domain_name
    }

    /// The record types that exist at this record's owner name
    pub fn type_bit_maps(&self) -> &[RecordType] {
        &self.type_bit_maps
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>, rdata_length: u16) -> DnsResult<Nsec> {
    let start = decoder.index();
    let next_domain_name = Name::decode(decoder)?;

    let bit_map_len = (rdata_length as usize)
        .checked_sub(decoder.index() - start)
        .ok_or("nsec name overruns rdata")?;
    let type_bit_maps = decode_type_bit_maps(decoder, bit_map_len)?;

    Ok(Nsec::new(next_domain_name, type_bit_maps))
}

/// Write the RData to the given encoder.
///
/// The next domain name is never compressed, and per RFC 6840 5.1 it is
/// not lowercased in the canonical form.
pub fn emit(encoder: &mut WireEncoder<'_>, nsec: &Nsec) -> DnsResult<()> {
    nsec.next_domain_name().emit_as_canonical(encoder, true)?;
    encode_type_bit_maps(encoder, nsec.type_bit_maps())
}

impl fmt::Display for Nsec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.next_domain_name)?;
        for ty in &self.type_bit_maps {
            write!(f, " {ty}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_roundtrip() {
        let rdata = Nsec::new(
            Name::from_str("host.example.com.").unwrap(),
            vec![RecordType::A, RecordType::MX, RecordType::RRSIG, RecordType::NSEC],
        );

        let mut bytes = Vec::new();
        emit(&mut WireEncoder::new(&mut bytes), &rdata).unwrap();
        assert_eq!(
            read(&mut WireDecoder::new(&bytes), bytes.len() as u16).unwrap(),
            rdata
        );
    }
}
