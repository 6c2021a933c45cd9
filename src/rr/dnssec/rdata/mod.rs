// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! All record data structures for DNSSEC and transaction authentication

pub mod dnskey;
pub mod ds;
pub mod nsec;
pub mod nsec3;
pub mod nsec3param;
pub mod sig;
pub mod tsig;

use std::fmt;

use enum_as_inner::EnumAsInner;

use crate::error::DnsResult;
use crate::rr::RecordType;
use crate::serialize::binary::{WireDecoder, WireEncoder};

pub use self::dnskey::Dnskey;
pub use self::ds::Ds;
pub use self::nsec::Nsec;
pub use self::nsec3::Nsec3;
pub use self::nsec3param::Nsec3Param;
pub use self::sig::Sig;
pub use self::tsig::{Tsig, TsigAlgorithm};

/// The DNSSEC and transaction authentication subset of record data.
///
/// CDS and CDNSKEY (RFC 7344) share the wire format of DS and DNSKEY, only
/// the type code differs, so they reuse those structures.
#[derive(Debug, EnumAsInner, PartialEq, Eq, Clone)]
pub enum DnssecRData {
    /// A child copy of a DNSKEY, signalling the desired DS state
    Cdnskey(Dnskey),
    /// A child copy of a DS
    Cds(Ds),
    /// The public key of a zone signing key
    Dnskey(Dnskey),
    /// A digest of a DNSKEY, published in the parent zone
    Ds(Ds),
    /// Authenticated denial of existence
    Nsec(Nsec),
    /// Hashed authenticated denial of existence
    Nsec3(Nsec3),
    /// The NSEC3 hashing parameters of a zone
    Nsec3Param(Nsec3Param),
    /// A signature over an RRset
    Rrsig(Sig),
    /// A transaction signature under an asymmetric key, SIG(0)
    Sig(Sig),
    /// A transaction signature under a shared secret
    Tsig(Tsig),
}

impl DnssecRData {
    /// Read the RData for `record_type` from the decoder
    pub(crate) fn read(
        decoder: &mut WireDecoder<'_>,
        record_type: RecordType,
        rdata_length: u16,
    ) -> DnsResult<Self> {
        match record_type {
            RecordType::CDNSKEY => dnskey::read(decoder, rdata_length).map(Self::Cdnskey),
            RecordType::CDS => ds::read(decoder, rdata_length).map(Self::Cds),
            RecordType::DNSKEY => dnskey::read(decoder, rdata_length).map(Self::Dnskey),
            RecordType::DS => ds::read(decoder, rdata_length).map(Self::Ds),
            RecordType::NSEC => nsec::read(decoder, rdata_length).map(Self::Nsec),
            RecordType::NSEC3 => nsec3::read(decoder, rdata_length).map(Self::Nsec3),
            RecordType::NSEC3PARAM => nsec3param::read(decoder).map(Self::Nsec3Param),
            RecordType::RRSIG => sig::read(decoder, rdata_length).map(Self::Rrsig),
            RecordType::SIG => sig::read(decoder, rdata_length).map(Self::Sig),
            RecordType::TSIG => tsig::read(decoder, rdata_length).map(Self::Tsig),
            _ => unreachable!("only dnssec record types are dispatched here"),
        }
    }

    /// Write the RData to the given encoder.
    ///
    /// Names inside these types never compress, RFC 3597 4; the registry
    /// dispatch enforces that by putting the encoder in canonical mode.
    pub(crate) fn emit(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()> {
        match self {
            Self::Cdnskey(dnskey) | Self::Dnskey(dnskey) => dnskey::emit(encoder, dnskey),
            Self::Cds(ds) | Self::Ds(ds) => ds::emit(encoder, ds),
            Self::Nsec(nsec) => nsec::emit(encoder, nsec),
            Self::Nsec3(nsec3) => nsec3::emit(encoder, nsec3),
            Self::Nsec3Param(nsec3param) => nsec3param::emit(encoder, nsec3param),
            Self::Rrsig(sig) | Self::Sig(sig) => sig::emit(encoder, sig),
            Self::Tsig(tsig) => tsig::emit(encoder, tsig),
        }
    }

    /// The record type of this data
    pub fn to_record_type(&self) -> RecordType {
        match self {
            Self::Cdnskey(..) => RecordType::CDNSKEY,
            Self::Cds(..) => RecordType::CDS,
            Self::Dnskey(..) => RecordType::DNSKEY,
            Self::Ds(..) => RecordType::DS,
            Self::Nsec(..) => RecordType::NSEC,
            Self::Nsec3(..) => RecordType::NSEC3,
            Self::Nsec3Param(..) => RecordType::NSEC3PARAM,
            Self::Rrsig(..) => RecordType::RRSIG,
            Self::Sig(..) => RecordType::SIG,
            Self::Tsig(..) => RecordType::TSIG,
        }
    }
}

impl fmt::Display for DnssecRData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cdnskey(dnskey) | Self::Dnskey(dnskey) => dnskey.fmt(f),
            Self::Cds(ds) | Self::Ds(ds) => ds.fmt(f),
            Self::Nsec(nsec) => nsec.fmt(f),
            Self::Nsec3(nsec3) => nsec3.fmt(f),
            Self::Nsec3Param(nsec3param) => nsec3param.fmt(f),
            Self::Rrsig(sig) | Self::Sig(sig) => sig.fmt(f),
            Self::Tsig(tsig) => tsig.fmt(f),
        }
    }
}
