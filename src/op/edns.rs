// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Extended DNS options

use std::fmt;

use crate::rr::rdata::{EdnsCode, EdnsOption, Opt};
use crate::rr::{DnsClass, Name, RData, Record, RecordType};

/// The high level concepts of extended DNS, projected out of (and back
/// into) the OPT pseudo-record of the additional section.
///
/// [RFC 6891, EDNS(0) Extensions, April 2013](https://tools.ietf.org/html/rfc6891#section-6.1.1)
///
/// ```text
/// 6.1.1.  Basic Elements
///
///    An OPT pseudo-RR (sometimes called a meta-RR) MAY be added to the
///    additional data section of a request.
///
///    The OPT RR has RR type 41.
///
///    If an OPT record is present in a received request, compliant
///    responders MUST include an OPT record in their respective responses.
///
///    An OPT record does not carry any DNS data.  It is used only to
///    contain control information pertaining to the question-and-answer
///    sequence of a specific transaction.  OPT RRs MUST NOT be cached,
///    forwarded, or stored in or loaded from master files.
///
///    The OPT RR MAY be placed anywhere within the additional data section.
///    When an OPT RR is included within any DNS message, it MUST be the
///    only OPT RR in that message.
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Edns {
    // the high 8 bits of the 12 bit response code, from the TTL field
    rcode_high: u8,
    // implementation level of the sender, from the TTL field
    version: u8,
    // DNSSEC OK and the Z flags, from the TTL field
    flags: u16,
    // requestor's maximum UDP payload, from the CLASS field
    max_payload: u16,
    options: Opt,
}

impl Default for Edns {
    fn default() -> Self {
        Self {
            rcode_high: 0,
            version: 0,
            flags: 0,
            max_payload: 512,
            options: Opt::default(),
        }
    }
}

impl Edns {
    /// Creates a new EDNS view with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// The high 8 bits of the extended response code
    pub fn rcode_high(&self) -> u8 {
        self.rcode_high
    }

    /// The EDNS version, 0 is the only one defined
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The DO bit: the requestor is able to accept DNSSEC records
    pub fn dnssec_ok(&self) -> bool {
        self.flags & 0x8000 != 0
    }

    /// The requestor's maximum UDP payload size
    pub fn max_payload(&self) -> u16 {
        self.max_payload
    }

    /// The option with the given code, if present
    pub fn option(&self, code: EdnsCode) -> Option<&EdnsOption> {
        self.options.get(code)
    }

    /// The options portion of EDNS
    pub fn options(&self) -> &Opt {
        &self.options
    }

    /// Mutable access to the options
    pub fn options_mut(&mut self) -> &mut Opt {
        &mut self.options
    }

    /// Sets the high bits of the extended response code
    pub fn set_rcode_high(&mut self, rcode_high: u8) -> &mut Self {
        self.rcode_high = rcode_high;
        self
    }

    /// Sets the EDNS version
    pub fn set_version(&mut self, version: u8) -> &mut Self {
        self.version = version;
        self
    }

    /// Sets the DO bit
    pub fn set_dnssec_ok(&mut self, dnssec_ok: bool) -> &mut Self {
        if dnssec_ok {
            self.flags |= 0x8000;
        } else {
            self.flags &= !0x8000;
        }
        self
    }

    /// Sets the maximum UDP payload this requestor accepts
    pub fn set_max_payload(&mut self, max_payload: u16) -> &mut Self {
        self.max_payload = max_payload;
        self
    }
}

impl From<&Record> for Edns {
    fn from(record: &Record) -> Self {
        debug_assert_eq!(record.record_type(), RecordType::OPT);

        // the TTL field encodes ext-rcode, version and flags
        let ttl = record.ttl();
        let rcode_high = (ttl >> 24) as u8;
        let version = (ttl >> 16) as u8;
        let flags = (ttl & 0xFFFF) as u16;
        let max_payload = u16::from(record.dns_class());

        let options = match record.data() {
            RData::OPT(opt) => opt.clone(),
            _ => Opt::default(),
        };

        Self {
            rcode_high,
            version,
            flags,
            max_payload,
            options,
        }
    }
}

impl From<&Edns> for Record {
    /// The OPT pseudo-record form of this EDNS data, root owner
    fn from(edns: &Edns) -> Self {
        let ttl = (u32::from(edns.rcode_high) << 24)
            | (u32::from(edns.version) << 16)
            | u32::from(edns.flags);

        let mut record = Self::from_rdata(Name::root(), ttl, RData::OPT(edns.options.clone()));
        record.set_dns_class(DnsClass::for_opt(edns.max_payload));
        record
    }
}

impl fmt::Display for Edns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "version: {version} dnssec_ok: {do_bit} max_payload: {payload} opts: {opts}",
            version = self.version,
            do_bit = self.dnssec_ok(),
            payload = self.max_payload,
            opts = self.options,
        )
    }
}
