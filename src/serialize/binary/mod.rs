// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Binary serialization types

mod decoder;
mod encoder;

pub use self::decoder::WireDecoder;
pub use self::encoder::{Place, WireEncoder};

use crate::error::DnsResult;

/// A type which can be encoded into the DNS binary format
pub trait WireEncode {
    /// Write the type to the encoder
    fn encode(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()>;

    /// Returns the object in binary form
    fn to_bytes(&self) -> DnsResult<Vec<u8>> {
        let mut bytes = Vec::new();
        {
            let mut encoder = WireEncoder::new(&mut bytes);
            self.encode(&mut encoder)?;
        }

        Ok(bytes)
    }
}

/// A type which can be decoded from the DNS binary format
pub trait WireDecode<'r>: Sized {
    /// Read the type from the decoder
    fn decode(decoder: &mut WireDecoder<'r>) -> DnsResult<Self>;

    /// Parses the object from its binary form
    fn from_bytes(bytes: &'r [u8]) -> DnsResult<Self> {
        let mut decoder = WireDecoder::new(bytes);
        Self::decode(&mut decoder)
    }
}
