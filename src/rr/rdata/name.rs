// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Record data containing a single domain name: CNAME, NS and PTR

use crate::error::DnsResult;
use crate::rr::Name;
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncoder};

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>) -> DnsResult<Name> {
    Name::decode(decoder)
}

/// Write the RData to the given encoder.
///
/// These are RFC 1035 well-known types: the embedded name compresses in
/// normal mode and is lowercased in canonical mode per RFC 4034 6.2.
pub fn emit(encoder: &mut WireEncoder<'_>, name: &Name) -> DnsResult<()> {
    let is_canonical = encoder.is_canonical_names();
    name.emit_with_lowercase(encoder, is_canonical)
}
