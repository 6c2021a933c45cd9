// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Presentation (zone file) format for record data: a tokenizer for the
//! BIND-style field syntax and the per-type text parsers, the inverse of
//! each type's `Display` implementation

use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use data_encoding::{BASE32_DNSSEC, BASE64, HEXUPPER_PERMISSIVE};

use crate::error::{DnsError, DnsResult};
use crate::rr::dnssec::rdata::{sig, DnssecRData};
use crate::rr::dnssec::{Algorithm, DigestType};
use crate::rr::rdata::{Caa, Mx, Naptr, Null, Soa, Srv, Sshfp, Tlsa, Txt};
use crate::rr::{Name, RData, RecordType};

/// A single field of a record's presentation form
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    /// An unquoted field
    CharData(String),
    /// A quoted character-string, quotes removed and escapes resolved
    Quoted(String),
}

impl Token {
    fn text(&self) -> &str {
        match self {
            Self::CharData(s) | Self::Quoted(s) => s,
        }
    }
}

/// Splits one rdata's presentation text into tokens.
///
/// Fields separate on whitespace; a `"`-delimited field may contain
/// whitespace, with `\"` and `\\` escaping the delimiters themselves and
/// `\DDD` a decimal octet value.
pub fn tokenize(text: &str) -> DnsResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut data = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => data.push(unescape(&mut chars)?),
                    Some(other) => data.push(other),
                    None => return Err("unterminated quoted string".into()),
                }
            }
            tokens.push(Token::Quoted(data));
        } else {
            let mut data = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                chars.next();
                if c == '\\' {
                    // keep name escapes intact, the name parser handles them
                    data.push('\\');
                    data.push(chars.next().ok_or("dangling escape")?);
                } else {
                    data.push(c);
                }
            }
            tokens.push(Token::CharData(data));
        }
    }

    Ok(tokens)
}

fn unescape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> DnsResult<char> {
    match chars.next() {
        Some(digit @ '0'..='9') => {
            let mut value = digit.to_digit(10).unwrap_or_default();
            for _ in 0..2 {
                value = value * 10
                    + chars
                        .next()
                        .and_then(|c| c.to_digit(10))
                        .ok_or("bad decimal escape")?;
            }
            u8::try_from(value)
                .map(char::from)
                .map_err(|_| DnsError::from("escape exceeds 255"))
        }
        Some(c) => Ok(c),
        None => Err("dangling escape".into()),
    }
}

/// A cursor over the tokens of one rdata
struct Fields<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> Fields<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, index: 0 }
    }

    fn next(&mut self, what: &'static str) -> DnsResult<&'a Token> {
        let tokens = self.tokens;
        let token = tokens
            .get(self.index)
            .ok_or_else(|| DnsError::from(format!("missing field: {what}")))?;
        self.index += 1;
        Ok(token)
    }

    fn next_str(&mut self, what: &'static str) -> DnsResult<&'a str> {
        Ok(self.next(what)?.text())
    }

    fn num<N: FromStr>(&mut self, what: &'static str) -> DnsResult<N> {
        let text = self.next_str(what)?;
        text.parse()
            .map_err(|_| DnsError::from(format!("bad {what}: {text}")))
    }

    fn name(&mut self, what: &'static str, origin: Option<&Name>) -> DnsResult<Name> {
        Name::parse(self.next_str(what)?, origin)
    }

    fn rest(&mut self) -> impl Iterator<Item = &'a Token> {
        let tokens = self.tokens;
        let rest = &tokens[self.index.min(tokens.len())..];
        self.index = tokens.len();
        rest.iter()
    }

    fn finish(self) -> DnsResult<()> {
        if self.index < self.tokens.len() {
            return Err("trailing fields in rdata".into());
        }
        Ok(())
    }
}

/// Parses the rdata of `record_type` from its tokenized presentation form.
///
/// Relative names resolve against `origin`. The meta types OPT, TSIG and
/// SIG(0) have no presentation form and are rejected.
pub fn parse_rdata(
    record_type: RecordType,
    tokens: &[Token],
    origin: Option<&Name>,
) -> DnsResult<RData> {
    let mut fields = Fields::new(tokens);

    let rdata = match record_type {
        RecordType::A => RData::A(
            Ipv4Addr::from_str(fields.next_str("address")?)
                .map_err(|e| DnsError::from(format!("bad address: {e}")))?,
        ),
        RecordType::AAAA => RData::AAAA(
            Ipv6Addr::from_str(fields.next_str("address")?)
                .map_err(|e| DnsError::from(format!("bad address: {e}")))?,
        ),
        RecordType::CAA => {
            let flags: u8 = fields.num("flags")?;
            let tag = fields.next_str("tag")?;
            let value = match fields.next("value")? {
                Token::Quoted(s) | Token::CharData(s) => s.clone().into_bytes(),
            };
            RData::CAA(Caa::new(flags & 0b1000_0000 != 0, tag, value)?)
        }
        RecordType::CNAME => RData::CNAME(fields.name("cname", origin)?),
        RecordType::MX => RData::MX(Mx::new(
            fields.num("preference")?,
            fields.name("exchange", origin)?,
        )),
        RecordType::NAPTR => RData::NAPTR(Naptr::new(
            fields.num("order")?,
            fields.num("preference")?,
            fields.next_str("flags")?.as_bytes().into(),
            fields.next_str("services")?.as_bytes().into(),
            fields.next_str("regexp")?.as_bytes().into(),
            fields.name("replacement", origin)?,
        )),
        RecordType::NS => RData::NS(fields.name("nsdname", origin)?),
        RecordType::NULL => RData::NULL(Null::with(base64_field(&mut fields, "data")?)),
        RecordType::PTR => RData::PTR(fields.name("ptrdname", origin)?),
        RecordType::SOA => RData::SOA(Soa::new(
            fields.name("mname", origin)?,
            fields.name("rname", origin)?,
            fields.num("serial")?,
            fields.num("refresh")?,
            fields.num("retry")?,
            fields.num("expire")?,
            fields.num("minimum")?,
        )),
        RecordType::SRV => RData::SRV(Srv::new(
            fields.num("priority")?,
            fields.num("weight")?,
            fields.num("port")?,
            fields.name("target", origin)?,
        )),
        RecordType::SSHFP => RData::SSHFP(Sshfp::new(
            fields.num("algorithm")?,
            fields.num("fptype")?,
            hex_field(&mut fields, "fingerprint")?,
        )),
        RecordType::TLSA => RData::TLSA(Tlsa::new(
            fields.num("usage")?,
            fields.num("selector")?,
            fields.num("matching")?,
            hex_field(&mut fields, "certificate data")?,
        )),
        RecordType::TXT => {
            let strings = fields
                .rest()
                .map(|token| token.text().to_string())
                .collect();
            RData::TXT(Txt::new(strings))
        }
        RecordType::CDNSKEY | RecordType::DNSKEY => {
            let rdata = parse_dnskey(&mut fields)?;
            if record_type == RecordType::DNSKEY {
                RData::DNSSEC(DnssecRData::Dnskey(rdata))
            } else {
                RData::DNSSEC(DnssecRData::Cdnskey(rdata))
            }
        }
        RecordType::CDS | RecordType::DS => {
            let rdata = parse_ds(&mut fields)?;
            if record_type == RecordType::DS {
                RData::DNSSEC(DnssecRData::Ds(rdata))
            } else {
                RData::DNSSEC(DnssecRData::Cds(rdata))
            }
        }
        RecordType::NSEC => {
            let next = fields.name("next domain name", origin)?;
            let types = type_list(&mut fields)?;
            RData::DNSSEC(DnssecRData::Nsec(
                crate::rr::dnssec::rdata::Nsec::new(next, types),
            ))
        }
        RecordType::NSEC3 => {
            let hash_algorithm = fields.num("hash algorithm")?;
            let flags: u8 = fields.num("flags")?;
            let iterations = fields.num("iterations")?;
            let salt = salt_field(&mut fields)?;
            let next = fields.next_str("next hashed owner")?;
            let next_hashed = BASE32_DNSSEC
                .decode(next.as_bytes())
                .map_err(|_| DnsError::from(format!("bad base32 hash: {next}")))?;
            let types = type_list(&mut fields)?;
            RData::DNSSEC(DnssecRData::Nsec3(crate::rr::dnssec::rdata::Nsec3::new(
                hash_algorithm,
                flags & 0x01 != 0,
                iterations,
                salt,
                next_hashed,
                types,
            )))
        }
        RecordType::NSEC3PARAM => {
            let hash_algorithm = fields.num("hash algorithm")?;
            let _flags: u8 = fields.num("flags")?;
            let iterations = fields.num("iterations")?;
            let salt = salt_field(&mut fields)?;
            RData::DNSSEC(DnssecRData::Nsec3Param(
                crate::rr::dnssec::rdata::Nsec3Param::new(hash_algorithm, iterations, salt),
            ))
        }
        RecordType::RRSIG => {
            let type_covered = RecordType::from_str(fields.next_str("type covered")?)?;
            let algorithm = Algorithm::from_u8(fields.num("algorithm")?);
            let num_labels = fields.num("labels")?;
            let original_ttl = fields.num("original ttl")?;
            let expiration = fields.num("expiration")?;
            let inception = fields.num("inception")?;
            let key_tag = fields.num("key tag")?;
            let signer_name = fields.name("signer name", origin)?;
            let signature = base64_field(&mut fields, "signature")?;
            RData::DNSSEC(DnssecRData::Rrsig(sig::Sig::new(
                type_covered,
                algorithm,
                num_labels,
                original_ttl,
                expiration,
                inception,
                key_tag,
                signer_name,
                signature,
            )))
        }
        unhandled => {
            return Err(DnsError::from(format!(
                "{unhandled} records have no parseable presentation form"
            )))
        }
    };

    fields.finish()?;
    Ok(rdata)
}

fn parse_dnskey(fields: &mut Fields<'_>) -> DnsResult<crate::rr::dnssec::rdata::Dnskey> {
    let flags: u16 = fields.num("flags")?;
    let protocol: u8 = fields.num("protocol")?;
    if protocol != 3 {
        return Err(DnsError::from(format!("dnskey protocol must be 3: {protocol}")));
    }
    let algorithm = Algorithm::from_u8(fields.num("algorithm")?);
    let public_key = base64_field(fields, "public key")?;

    Ok(crate::rr::dnssec::rdata::Dnskey::new(
        flags & 0x0100 != 0,
        flags & 0x0001 != 0,
        flags & 0x0080 != 0,
        algorithm,
        public_key,
    ))
}

fn parse_ds(fields: &mut Fields<'_>) -> DnsResult<crate::rr::dnssec::rdata::Ds> {
    Ok(crate::rr::dnssec::rdata::Ds::new(
        fields.num("key tag")?,
        Algorithm::from_u8(fields.num("algorithm")?),
        DigestType::from_u8(fields.num("digest type")?),
        hex_field(fields, "digest")?,
    ))
}

/// Remaining fields concatenated and decoded as base64; multi-line zone
/// data arrives as several whitespace-separated chunks
fn base64_field(fields: &mut Fields<'_>, what: &'static str) -> DnsResult<Vec<u8>> {
    let joined: String = fields.rest().map(Token::text).collect();
    if joined.is_empty() {
        return Err(DnsError::from(format!("missing field: {what}")));
    }
    BASE64
        .decode(joined.as_bytes())
        .map_err(|_| DnsError::from(format!("bad base64 {what}")))
}

fn hex_field(fields: &mut Fields<'_>, what: &'static str) -> DnsResult<Vec<u8>> {
    let joined: String = fields.rest().map(Token::text).collect();
    if joined.is_empty() {
        return Err(DnsError::from(format!("missing field: {what}")));
    }
    HEXUPPER_PERMISSIVE
        .decode(joined.to_ascii_uppercase().as_bytes())
        .map_err(|_| DnsError::from(format!("bad hex {what}")))
}

/// `-` denotes the empty salt in NSEC3 and NSEC3PARAM presentation
fn salt_field(fields: &mut Fields<'_>) -> DnsResult<Vec<u8>> {
    let text = fields.next_str("salt")?;
    if text == "-" {
        Ok(Vec::new())
    } else {
        HEXUPPER_PERMISSIVE
            .decode(text.to_ascii_uppercase().as_bytes())
            .map_err(|_| DnsError::from(format!("bad hex salt: {text}")))
    }
}

fn type_list(fields: &mut Fields<'_>) -> DnsResult<Vec<RecordType>> {
    fields
        .rest()
        .map(|token| RecordType::from_str(token.text()))
        .collect()
}
