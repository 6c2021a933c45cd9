// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! construction of the to-be-signed data for RRSIG and SIG(0)

use crate::error::{DnsError, DnsResult};
use crate::op::Message;
use crate::rr::dnssec::rdata::{sig, Sig};
use crate::rr::dnssec::Algorithm;
use crate::rr::{DnsClass, Name, Record, RecordType};
use crate::serialize::binary::{WireEncode, WireEncoder};

/// Returns the serialization signed by an RRSIG over a record set.
///
/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-3.1.8.1)
///
/// ```text
/// 3.1.8.1.  Signature Calculation
///
///    A signature covers the RRSIG RDATA (excluding the Signature field)
///    and covers the data RRset specified by the RRSIG owner name, RRSIG
///    class, and RRSIG Type Covered field.  The RRset is in canonical form
///    (see Section 6), and the data (RRSIG RDATA | RR(1) | RR(2)...) is
///    serialized as follows:
///
///          signed_data = RRSIG_RDATA | RR(1) | RR(2)...  where
///
///             "|" denotes concatenation;
///
///             RRSIG_RDATA is the wire format of the RRSIG RDATA fields
///                with the Signer's Name field in canonical form and the
///                Signature field excluded;
///
///             RR(i) = owner | type | class | TTL | RDATA length | RDATA
///
///                "owner" is the fully qualified owner name of the RRset in
///                canonical form (for RRs with wildcard owner names, the
///                wildcard label is included in the owner name);
///
///                Each RR MUST have the same owner name as the RRSIG RR;
///
///                Each RR MUST have the same class as the RRSIG RR;
///
///                Each RR in the RRset MUST have the TTL listed in the
///                RRSIG Original TTL Field;
///
///                Any wildcard expansions of the RRset's owner name are
///                undone, restoring the "*" label;
///
///                The RRset MUST be sorted in canonical order.
/// ```
#[allow(clippy::too_many_arguments)]
pub fn rrset_tbs<'a>(
    name: &Name,
    dns_class: DnsClass,
    num_labels: u8,
    type_covered: RecordType,
    algorithm: Algorithm,
    original_ttl: u32,
    sig_expiration: u32,
    sig_inception: u32,
    key_tag: u16,
    signer_name: &Name,
    records: impl Iterator<Item = &'a Record>,
) -> DnsResult<Vec<u8>> {
    // only the records of this rrset participate
    let mut rrset: Vec<&Record> = records
        .filter(|record| {
            dns_class == record.dns_class()
                && type_covered == record.record_type()
                && name == record.name()
        })
        .collect();
    if rrset.is_empty() {
        return Err("rrset to sign is empty".into());
    }

    // canonical order
    rrset.sort();

    let name = determine_name(name, num_labels)?;

    let mut buf: Vec<u8> = Vec::new();
    {
        let mut encoder = WireEncoder::new(&mut buf);
        encoder.set_canonical_names(true);

        sig::emit_pre_sig(
            &mut encoder,
            type_covered,
            algorithm,
            num_labels,
            original_ttl,
            sig_expiration,
            sig_inception,
            key_tag,
            signer_name,
        )?;

        for record in rrset {
            name.to_lowercase().emit_as_canonical(&mut encoder, true)?;
            type_covered.encode(&mut encoder)?;
            dns_class.encode(&mut encoder)?;
            encoder.emit_u32(original_ttl)?;

            // RDATA length precedes the canonical-form RDATA; the length is
            // not known until the names inside are written, so buffer it
            let mut rdata_buf = Vec::new();
            {
                let mut rdata_encoder = WireEncoder::new(&mut rdata_buf);
                rdata_encoder.set_canonical_names(true);
                record.data().emit(&mut rdata_encoder)?;
            }
            encoder.emit_u16(rdata_buf.len() as u16)?;
            encoder.emit_bytes(&rdata_buf)?;
        }
    }

    Ok(buf)
}

/// Convenience form of [`rrset_tbs`] driven by an existing signature record
pub fn rrset_tbs_with_sig<'a>(
    name: &Name,
    dns_class: DnsClass,
    sig: &Sig,
    records: impl Iterator<Item = &'a Record>,
) -> DnsResult<Vec<u8>> {
    rrset_tbs(
        name,
        dns_class,
        sig.num_labels(),
        sig.type_covered(),
        sig.algorithm(),
        sig.original_ttl(),
        sig.sig_expiration(),
        sig.sig_inception(),
        sig.key_tag(),
        sig.signer_name(),
        records,
    )
}

/// Returns the serialization signed by a SIG(0) over a whole message.
///
/// [RFC 2931](https://tools.ietf.org/html/rfc2931#section-3.1): the data is
/// the SIG RDATA with the signature excluded, concatenated with the message
/// before the SIG(0) was added and before ARCOUNT was adjusted for it.
pub fn message_tbs(message: &Message, pre_sig0: &Sig) -> DnsResult<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::with_capacity(512);
    {
        let mut encoder = WireEncoder::new(&mut buf);
        sig::emit_pre_sig(
            &mut encoder,
            pre_sig0.type_covered(),
            pre_sig0.algorithm(),
            pre_sig0.num_labels(),
            pre_sig0.original_ttl(),
            pre_sig0.sig_expiration(),
            pre_sig0.sig_inception(),
            pre_sig0.key_tag(),
            pre_sig0.signer_name(),
        )?;
    }

    // the message is rendered separately: compression offsets are relative
    // to the message start, sharing the buffer would corrupt them
    buf.append(&mut message.to_signable_bytes()?);
    Ok(buf)
}

/// Restores the pre-expansion owner name of a signed RRset.
///
/// [RFC 4035, 5.3.2](https://tools.ietf.org/html/rfc4035#section-5.3.2):
/// when the RRSIG label count is smaller than the owner name's, the name
/// was synthesized from a wildcard and the `*` label is restored.
pub fn determine_name(name: &Name, num_labels: u8) -> DnsResult<Name> {
    let fqdn_labels = name.num_labels();
    if fqdn_labels == num_labels {
        return Ok(name.clone());
    }

    if num_labels < fqdn_labels {
        let rightmost = name.trim_to(num_labels as usize);
        return Name::from_labels([b"*" as &[u8]])?.append_domain(&rightmost);
    }

    // an RRSIG claiming more labels than the owner name has is invalid
    Err(DnsError::from(format!(
        "rrsig has more labels than its owner name {name}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    use crate::rr::RData;

    #[test]
    fn test_determine_name() {
        let name = Name::from_str("www.example.com.").unwrap();
        assert_eq!(determine_name(&name, 3).unwrap(), name);
        assert_eq!(
            determine_name(&name, 2).unwrap(),
            Name::from_str("*.example.com.").unwrap()
        );
        assert!(determine_name(&name, 4).is_err());
    }

    #[test]
    fn test_rrset_order_and_ttl_are_normalized() {
        let name = Name::from_str("host.example.com.").unwrap();
        let signer = Name::from_str("example.com.").unwrap();

        let rec = |ttl, ip| Record::from_rdata(name.clone(), ttl, RData::A(ip));

        // same rrset, different observed TTLs and order
        let one = [
            rec(300, Ipv4Addr::new(10, 0, 0, 2)),
            rec(300, Ipv4Addr::new(10, 0, 0, 1)),
        ];
        let two = [
            rec(120, Ipv4Addr::new(10, 0, 0, 1)),
            rec(120, Ipv4Addr::new(10, 0, 0, 2)),
        ];

        let tbs = |records: &[Record]| {
            rrset_tbs(
                &name,
                DnsClass::IN,
                3,
                RecordType::A,
                Algorithm::RSASHA256,
                300,
                1000,
                0,
                42,
                &signer,
                records.iter(),
            )
            .unwrap()
        };

        assert_eq!(tbs(&one), tbs(&two));
    }
}
