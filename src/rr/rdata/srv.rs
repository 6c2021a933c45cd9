// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! service records for identifying the host of a particular service

use std::fmt;

use crate::error::DnsResult;
use crate::rr::Name;
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncoder};

/// [RFC 2782, DNS SRV RR, February 2000](https://tools.ietf.org/html/rfc2782)
///
/// ```text
/// The format of the SRV RR
///
///  _Service._Proto.Name TTL Class SRV Priority Weight Port Target
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Srv {
    priority: u16,
    weight: u16,
    port: u16,
    target: Name,
}

impl Srv {
    /// Creates a new SRV record data
    pub fn new(priority: u16, weight: u16, port: u16, target: Name) -> Self {
        Self {
            priority,
            weight,
            port,
            target,
        }
    }

    /// The priority of this target host, lower values contacted first
    pub fn priority(&self) -> u16 {
        self.priority
    }

    /// Relative weight for entries with the same priority
    pub fn weight(&self) -> u16 {
        self.weight
    }

    /// The port on this target host of this service
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The domain name of the target host, not an alias
    pub fn target(&self) -> &Name {
        &self.target
    }
}

/// Read the RData from the given decoder
pub fn read(decoder: &mut WireDecoder<'_>) -> DnsResult<Srv> {
    Ok(Srv::new(
        decoder.read_u16()?,
        decoder.read_u16()?,
        decoder.read_u16()?,
        Name::decode(decoder)?,
    ))
}

/// Write the RData to the given encoder.
///
/// RFC 2782 prohibits compressing the target, though RFC 2052 mandated it;
/// the name is always written uncompressed.
pub fn emit(encoder: &mut WireEncoder<'_>, srv: &Srv) -> DnsResult<()> {
    encoder.emit_u16(srv.priority())?;
    encoder.emit_u16(srv.weight())?;
    encoder.emit_u16(srv.port())?;
    srv.target().emit_as_canonical(encoder, true)
}

impl fmt::Display for Srv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{priority} {weight} {port} {target}",
            priority = self.priority,
            weight = self.weight,
            port = self.port,
            target = self.target,
        )
    }
}
