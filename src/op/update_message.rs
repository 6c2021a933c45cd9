// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Builders for the RFC 2136 dynamic update operations.
//!
//! Update messages reuse the four message sections under different names:
//! the question carries the zone, the answer section the prerequisites and
//! the authority section the update records.

use crate::error::{DnsError, DnsResult};
use crate::op::{Message, Query};
use crate::rr::{DnsClass, Name, Record, RecordType};

/// The zone section entry shared by all update messages, and the class to
/// use for added records, taken from the first record of the set
fn zone_and_class(rrset: &[Record], zone_origin: &Name) -> DnsResult<(Query, DnsClass)> {
    let first = rrset
        .first()
        .ok_or(DnsError::from("update rrset must not be empty"))?;
    if !zone_origin.zone_of(first.name()) {
        return Err(format!(
            "record name {} is not within zone {}",
            first.name(),
            zone_origin
        )
        .into());
    }

    let mut zone = Query::new();
    zone.set_name(zone_origin.clone())
        .set_query_class(first.dns_class())
        .set_query_type(RecordType::SOA);
    Ok((zone, first.dns_class()))
}

/// Creates a record set on the server, failing if any record of the same
/// name and type already exists.
///
/// [RFC 2136](https://tools.ietf.org/html/rfc2136), DNS Update, April 1997
///
/// ```text
///  2.4.3 - RRset Does Not Exist
///
///   No RRs with a specified NAME and TYPE (in the zone and class denoted
///   by the Zone Section) can exist.
///
///   For this prerequisite, a requestor adds to the section a single RR
///   whose NAME and TYPE are equal to that of the RRset whose nonexistence
///   is required.  The RDLENGTH of this record is zero (0), and RDATA
///   field is therefore empty.  CLASS must be specified as NONE in order
///   to distinguish this condition from a valid RR whose RDLENGTH is
///   naturally zero (0) (for example, the NULL RR).  TTL must be specified
///   as zero (0).
/// ```
pub fn create(rrset: Vec<Record>, zone_origin: Name) -> DnsResult<Message> {
    let (zone, _) = zone_and_class(&rrset, &zone_origin)?;
    let first = &rrset[0];

    let mut prerequisite = Record::with(first.name().clone(), first.record_type(), 0);
    prerequisite.set_dns_class(DnsClass::NONE);

    let mut message = Message::new_update();
    message.add_query(zone).add_answer(prerequisite);
    message.add_authorities(rrset);
    Ok(message)
}

/// Appends records to an existing rrset; with `must_exist` the update fails
/// unless at least one record of the name and type is already present.
///
/// ```text
///  2.4.1 - RRset Exists (Value Independent)
///
///   At least one RR with a specified NAME and TYPE (in the zone and class
///   specified in the Zone Section) must exist.
///
///   For this prerequisite, a requestor adds to the section a single RR
///   whose NAME and TYPE are equal to that of the zone RRset whose
///   existence is required.  RDLENGTH is zero and RDATA is therefore
///   empty.  CLASS must be specified as ANY to differentiate this
///   condition from that of an actual RR whose RDLENGTH is naturally zero
///   (0) (e.g., NULL).  TTL is specified as zero (0).
/// ```
pub fn append(rrset: Vec<Record>, zone_origin: Name, must_exist: bool) -> DnsResult<Message> {
    let (zone, _) = zone_and_class(&rrset, &zone_origin)?;

    let mut message = Message::new_update();
    message.add_query(zone);

    if must_exist {
        let first = &rrset[0];
        let mut prerequisite = Record::with(first.name().clone(), first.record_type(), 0);
        prerequisite.set_dns_class(DnsClass::ANY);
        message.add_answer(prerequisite);
    }

    message.add_authorities(rrset);
    Ok(message)
}

/// Atomically (depending on the server) replaces `current` with `new`.
///
/// The prerequisite requires the current rrset to exist with exactly the
/// given values, 2.4.2; the update deletes the rrset and installs the new
/// records.
pub fn compare_and_swap(
    current: Vec<Record>,
    new: Vec<Record>,
    zone_origin: Name,
) -> DnsResult<Message> {
    let (zone, _) = zone_and_class(&new, &zone_origin)?;
    zone_and_class(&current, &zone_origin)?;

    let mut message = Message::new_update();
    message.add_query(zone);

    // 2.4.2 - RRset Exists (Value Dependent): TTL 0, class of the zone
    let current_name = current[0].name().clone();
    let current_type = current[0].record_type();
    message.add_answers(current.into_iter().map(|mut record| {
        record.set_ttl(0);
        record
    }));

    // delete the whole current rrset before installing the replacement
    let mut delete = Record::with(current_name, current_type, 0);
    delete.set_dns_class(DnsClass::ANY);
    message.add_authority(delete);
    message.add_authorities(new);
    Ok(message)
}

/// Deletes exactly the given records from an rrset, leaving any others at
/// the name in place.
///
/// ```text
///  2.5.4 - Delete An RR From An RRset
///
///   RRs to be deleted are added to the Update Section.  The NAME, TYPE,
///   RDLENGTH and RDATA must match the RR being deleted.  TTL must be
///   specified as zero (0) and will otherwise be ignored by the Primary
///   Zone Server.  CLASS must be specified as NONE to distinguish this from an
///   RR addition.
/// ```
pub fn delete_by_rdata(rrset: Vec<Record>, zone_origin: Name) -> DnsResult<Message> {
    let (zone, _) = zone_and_class(&rrset, &zone_origin)?;

    let mut message = Message::new_update();
    message.add_query(zone);
    message.add_authorities(rrset.into_iter().map(|mut record| {
        record.set_ttl(0);
        record.set_dns_class(DnsClass::NONE);
        record
    }));
    Ok(message)
}

/// Deletes an entire rrset, all records at the name of the given type.
///
/// ```text
///  2.5.2 - Delete An RRset
///
///   One RR is added to the Update Section whose NAME and TYPE are those
///   of the RRset to be deleted.  TTL must be specified as zero (0) and is
///   otherwise not used by the Primary Zone Server.  CLASS must be specified as
///   ANY.  RDLENGTH must be zero (0) and RDATA must therefore be empty.
/// ```
pub fn delete_rrset(record: Record, zone_origin: Name) -> DnsResult<Message> {
    if !zone_origin.zone_of(record.name()) {
        return Err(format!(
            "record name {} is not within zone {}",
            record.name(),
            zone_origin
        )
        .into());
    }

    let mut zone = Query::new();
    zone.set_name(zone_origin)
        .set_query_class(record.dns_class())
        .set_query_type(RecordType::SOA);

    let mut delete = Record::with(record.name().clone(), record.record_type(), 0);
    delete.set_dns_class(DnsClass::ANY);

    let mut message = Message::new_update();
    message.add_query(zone).add_authority(delete);
    Ok(message)
}

/// Deletes all rrsets at a name regardless of type.
///
/// ```text
///  2.5.3 - Delete All RRsets From A Name
///
///   One RR is added to the Update Section whose NAME is that of the name
///   to be cleansed of RRsets.  TYPE must be specified as ANY.  TTL must
///   be specified as zero (0) and is otherwise not used by the Primary
///   Zone Server.  CLASS must be specified as ANY.  RDLENGTH must be zero (0)
///   and RDATA must therefore be empty.
/// ```
pub fn delete_all(
    name_of_records: Name,
    zone_origin: Name,
    dns_class: DnsClass,
) -> DnsResult<Message> {
    if !zone_origin.zone_of(&name_of_records) {
        return Err(format!(
            "record name {name_of_records} is not within zone {zone_origin}"
        )
        .into());
    }

    let mut zone = Query::new();
    zone.set_name(zone_origin)
        .set_query_class(dns_class)
        .set_query_type(RecordType::SOA);

    let mut delete = Record::with(name_of_records, RecordType::ANY, 0);
    delete.set_dns_class(DnsClass::ANY);

    let mut message = Message::new_update();
    message.add_query(zone).add_authority(delete);
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rr::RData;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    fn a_record() -> Record {
        Record::from_rdata(
            Name::from_str("host.example.com.").unwrap(),
            300,
            RData::A(Ipv4Addr::new(10, 0, 0, 1)),
        )
    }

    #[test]
    fn test_create_sections() {
        let message = create(vec![a_record()], Name::from_str("example.com.").unwrap()).unwrap();

        let zone = message.query().unwrap();
        assert_eq!(zone.query_type(), RecordType::SOA);
        assert_eq!(zone.query_class(), DnsClass::IN);

        // prerequisite: rrset does not exist
        let prereq = &message.answers()[0];
        assert_eq!(prereq.dns_class(), DnsClass::NONE);
        assert_eq!(prereq.ttl(), 0);
        assert!(matches!(prereq.data(), RData::ZERO));

        assert_eq!(message.authorities(), &[a_record()]);
    }

    #[test]
    fn test_append_without_prerequisite() {
        let message = append(
            vec![a_record()],
            Name::from_str("example.com.").unwrap(),
            false,
        )
        .unwrap();
        assert!(message.answers().is_empty());
        assert_eq!(message.authorities().len(), 1);
    }

    #[test]
    fn test_delete_by_rdata_markers() {
        let message =
            delete_by_rdata(vec![a_record()], Name::from_str("example.com.").unwrap()).unwrap();
        let delete = &message.authorities()[0];
        assert_eq!(delete.dns_class(), DnsClass::NONE);
        assert_eq!(delete.ttl(), 0);
        assert!(matches!(delete.data(), RData::A(_)));
    }

    #[test]
    fn test_delete_all_markers() {
        let message = delete_all(
            Name::from_str("host.example.com.").unwrap(),
            Name::from_str("example.com.").unwrap(),
            DnsClass::IN,
        )
        .unwrap();
        let delete = &message.authorities()[0];
        assert_eq!(delete.dns_class(), DnsClass::ANY);
        assert_eq!(delete.record_type(), RecordType::ANY);
    }

    #[test]
    fn test_record_outside_zone_rejected() {
        let result = create(vec![a_record()], Name::from_str("example.net.").unwrap());
        assert!(result.is_err());
    }
}
