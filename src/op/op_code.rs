// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! operation code for queries, updates and notifications

use std::fmt;

use crate::error::{DnsErrorKind, DnsResult};

/// Operation code of a message, RFC 1035 4.1.1 with the RFC 1996 and
/// RFC 2136 extensions
#[derive(Debug, PartialEq, Eq, PartialOrd, Copy, Clone, Hash)]
pub enum OpCode {
    /// Standard query
    Query,
    /// Server to server notification of a zone change, RFC 1996
    Notify,
    /// Dynamic update, RFC 2136
    Update,
}

impl OpCode {
    /// Decode the 4-bit opcode field
    pub fn from_u8(value: u8) -> DnsResult<Self> {
        match value {
            0 => Ok(Self::Query),
            4 => Ok(Self::Notify),
            5 => Ok(Self::Update),
            _ => Err(DnsErrorKind::UnknownOpCode(value).into()),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        match op {
            OpCode::Query => 0,
            OpCode::Notify => 4,
            OpCode::Update => 5,
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Query => "QUERY",
            Self::Notify => "NOTIFY",
            Self::Update => "UPDATE",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for op in [OpCode::Query, OpCode::Notify, OpCode::Update] {
            assert_eq!(OpCode::from_u8(u8::from(op)).unwrap(), op);
        }
        assert!(OpCode::from_u8(2).is_err());
    }
}
