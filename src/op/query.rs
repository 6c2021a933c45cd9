// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Query struct for looking up resource records

use std::fmt;

use crate::error::DnsResult;
use crate::rr::{DnsClass, Name, RecordType};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// Query struct for looking up resource records.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 4.1.2. Question section format
///
/// The question section is used to carry the "question" in most queries,
/// i.e., the parameters that define what is being asked.  The section
/// contains QDCOUNT (usually 1) entries, each of the following format:
///
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                                               |
///     /                     QNAME                     /
///     /                                               /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     QTYPE                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     QCLASS                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// For dynamic updates the same shape describes the zone section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Query {
    name: Name,
    query_type: RecordType,
    query_class: DnsClass,
}

impl Query {
    /// Return a new, empty, query: `. A IN`
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a query from its parts
    pub fn query(name: Name, query_type: RecordType) -> Self {
        Self {
            name,
            query_type,
            query_class: DnsClass::IN,
        }
    }

    /// Sets the name of the query
    pub fn set_name(&mut self, name: Name) -> &mut Self {
        self.name = name;
        self
    }

    /// Sets the type of the query
    pub fn set_query_type(&mut self, query_type: RecordType) -> &mut Self {
        self.query_type = query_type;
        self
    }

    /// Sets the class of the query
    pub fn set_query_class(&mut self, query_class: DnsClass) -> &mut Self {
        self.query_class = query_class;
        self
    }

    /// The name being queried
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The type of the query
    pub fn query_type(&self) -> RecordType {
        self.query_type
    }

    /// The class of the query
    pub fn query_class(&self) -> DnsClass {
        self.query_class
    }
}

impl WireEncode for Query {
    fn encode(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()> {
        self.name.encode(encoder)?;
        self.query_type.encode(encoder)?;
        self.query_class.encode(encoder)
    }
}

impl<'r> WireDecode<'r> for Query {
    fn decode(decoder: &mut WireDecoder<'r>) -> DnsResult<Self> {
        let name = Name::decode(decoder)?;
        let query_type = RecordType::decode(decoder)?;
        let query_class = DnsClass::decode(decoder)?;

        Ok(Self {
            name,
            query_type,
            query_class,
        })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{name} {class} {ty}",
            name = self.name,
            class = self.query_class,
            ty = self.query_type,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_roundtrip() {
        let query = Query::query(Name::from_str("WWW.example.com.").unwrap(), RecordType::MX);
        let bytes = query.to_bytes().unwrap();
        assert_eq!(Query::from_bytes(&bytes).unwrap(), query);
    }
}
