// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! type bit map helpers for NSEC and NSEC3 records

use crate::error::DnsResult;
use crate::rr::RecordType;
use crate::serialize::binary::{WireDecoder, WireEncoder};

/// Encodes the list of record types into the window block format.
///
/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-4.1.2)
///
/// ```text
/// 4.1.2.  The Type Bit Maps Field
///
///    The RR type space is split into 256 window blocks, each representing
///    the low-order 8 bits of the 16-bit RR type space.  Each block that
///    has at least one active RR type is encoded using a single octet
///    window number (from 0 to 255), a single octet bitmap length (from 1
///    to 32) indicating the number of octets used for the window block's
///    bitmap, and up to 32 octets (256 bits) of bitmap.
///
///    Blocks are present in the NSEC RR RDATA in increasing numerical
///    order.
/// ```
pub(crate) fn encode_type_bit_maps(
    encoder: &mut WireEncoder<'_>,
    type_bit_maps: &[RecordType],
) -> DnsResult<()> {
    let mut codes: Vec<u16> = type_bit_maps.iter().map(|t| u16::from(*t)).collect();
    codes.sort_unstable();
    codes.dedup();

    let mut codes = codes.into_iter().peekable();
    while let Some(&first) = codes.peek() {
        let window = (first >> 8) as u8;

        let mut bitmap = [0u8; 32];
        let mut len = 0usize;
        while let Some(&code) = codes.peek() {
            if (code >> 8) as u8 != window {
                break;
            }
            codes.next();

            let low = (code & 0xFF) as usize;
            bitmap[low / 8] |= 0x80 >> (low % 8);
            len = len.max(low / 8 + 1);
        }

        encoder.emit_u8(window)?;
        encoder.emit_u8(len as u8)?;
        encoder.emit_bytes(&bitmap[..len])?;
    }

    Ok(())
}

/// Decodes a window block encoded type list of `bit_map_len` total bytes
pub(crate) fn decode_type_bit_maps(
    decoder: &mut WireDecoder<'_>,
    bit_map_len: usize,
) -> DnsResult<Vec<RecordType>> {
    let end = decoder.index() + bit_map_len;
    let mut record_types = Vec::new();

    while decoder.index() < end {
        let window = decoder.read_u8()?;
        let len = decoder.read_u8()?;
        if len == 0 || len > 32 {
            return Err("type bit map block length out of range".into());
        }

        let bitmap = decoder.read_slice(len as usize)?;
        for (i, &byte) in bitmap.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0x80 >> bit) != 0 {
                    let code = (u16::from(window) << 8) | (i * 8 + bit) as u16;
                    record_types.push(RecordType::from(code));
                }
            }
        }
    }

    if decoder.index() != end {
        return Err("type bit map overruns rdata".into());
    }

    Ok(record_types)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let types = vec![
            RecordType::A,
            RecordType::MX,
            RecordType::RRSIG,
            RecordType::NSEC,
            RecordType::CAA,
        ];

        let mut bytes = Vec::new();
        encode_type_bit_maps(&mut WireEncoder::new(&mut bytes), &types).unwrap();
        let decoded = decode_type_bit_maps(&mut WireDecoder::new(&bytes), bytes.len()).unwrap();

        let mut expected = types;
        expected.sort();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_rfc4034_example() {
        // A MX RRSIG NSEC TYPE1234 from RFC 4034 4.3
        let types = vec![
            RecordType::A,
            RecordType::MX,
            RecordType::RRSIG,
            RecordType::NSEC,
            RecordType::Unknown(1234),
        ];

        let mut bytes = Vec::new();
        encode_type_bit_maps(&mut WireEncoder::new(&mut bytes), &types).unwrap();
        assert_eq!(
            bytes,
            [
                0x00, 0x06, 0x40, 0x01, 0x00, 0x00, 0x00, 0x03, 0x04, 0x1b, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20,
            ]
        );
    }
}
