// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! domain name, aka labels, implementation

use std::cmp::Ordering;
use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use tinyvec::TinyVec;

use crate::error::{DnsError, DnsErrorKind, DnsResult};
use crate::serialize::binary::{WireDecode, WireDecoder, WireEncode, WireEncoder};

/// A domain name
#[derive(Clone, Default, Eq)]
pub struct Name {
    is_fqdn: bool,
    label_data: TinyVec<[u8; 32]>,
    // label_ends[i] is the offset one past the end of label i in label_data
    label_ends: TinyVec<[u8; 24]>,
}

impl Name {
    /// Maximum legal length of a domain name in wire form
    pub const MAX_LENGTH: usize = 255;

    /// Create a new empty, relative, name
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the root label, i.e. no labels
    pub fn root() -> Self {
        let mut this = Self::new();
        this.is_fqdn = true;
        this
    }

    /// Returns true if there are no labels, i.e. it's empty.
    ///
    /// In DNS the root is represented by `.`
    pub fn is_root(&self) -> bool {
        self.label_ends.is_empty() && self.is_fqdn
    }

    /// Returns true if the name is fully qualified, i.e. absolute
    pub fn is_fqdn(&self) -> bool {
        self.is_fqdn
    }

    /// Specifies this name is fully qualified
    pub fn set_fqdn(&mut self, val: bool) -> &mut Self {
        self.is_fqdn = val;
        self
    }

    /// Returns true if the first label is the `*` wildcard
    pub fn is_wildcard(&self) -> bool {
        self.iter().next() == Some(b"*" as &[u8])
    }

    /// Extend the name with the offered label, and ensure the maximum name
    /// length is not exceeded.
    fn extend_name(&mut self, label: &[u8]) -> DnsResult<()> {
        let new_len = self.len() + label.len() + 1;
        if new_len > Self::MAX_LENGTH {
            return Err(DnsErrorKind::DomainNameTooLong(new_len).into());
        }

        self.label_data.extend_from_slice(label);
        self.label_ends.push(self.label_data.len() as u8);
        Ok(())
    }

    /// Appends a single label to the end of this name, preserving FQDN-ness
    pub fn append_label(mut self, label: &[u8]) -> DnsResult<Self> {
        if label.is_empty() || label.len() > 63 {
            return Err(DnsErrorKind::LabelBytesTooLong(label.len()).into());
        }
        self.extend_name(label)?;
        Ok(self)
    }

    /// Creates a relative name from a sequence of labels
    pub fn from_labels<I, L>(labels: I) -> DnsResult<Self>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut name = Self::new();
        for label in labels {
            name = name.append_label(label.as_ref())?;
        }
        Ok(name)
    }

    /// Appends `other` to the end of this name, taking FQDN-ness from `other`
    pub fn append_name(mut self, other: &Self) -> DnsResult<Self> {
        for label in other.iter() {
            self.extend_name(label)?;
        }
        self.is_fqdn = other.is_fqdn;
        Ok(self)
    }

    /// Appends `domain` to this name, the result is always fully qualified
    pub fn append_domain(self, domain: &Self) -> DnsResult<Self> {
        let mut this = self.append_name(domain)?;
        this.set_fqdn(true);
        Ok(this)
    }

    /// Returns an iterator over the labels of the name
    pub fn iter(&self) -> LabelIter<'_> {
        LabelIter {
            name: self,
            start: 0,
            end: self.label_ends.len(),
        }
    }

    /// Number of labels in the name, discounting a leading wildcard.
    ///
    /// This is the value carried by the RRSIG Labels field, RFC 4034 3.1.3.
    pub fn num_labels(&self) -> u8 {
        let num = self.label_ends.len() as u8;
        if self.is_wildcard() {
            num - 1
        } else {
            num
        }
    }

    /// Length of the name in wire form: the label octets plus a length octet
    /// per label, plus the terminating root octet.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.label_data.len() + self.label_ends.len() + 1
    }

    /// Trims this name down to its `num_labels` rightmost labels
    pub fn trim_to(&self, num_labels: usize) -> Self {
        if num_labels > self.label_ends.len() {
            return self.clone();
        }

        let mut name = Self::root();
        for label in self.iter().skip(self.label_ends.len() - num_labels) {
            name = name
                .append_label(label)
                .expect("trimmed name cannot outgrow the original");
        }
        name
    }

    /// Returns true if `name` falls under this zone, ignoring case.
    ///
    /// The root is the zone of all names; a name is a zone of itself.
    pub fn zone_of(&self, name: &Self) -> bool {
        let self_len = self.label_ends.len();
        let name_len = name.label_ends.len();
        if self_len > name_len {
            return false;
        }

        self.iter()
            .rev()
            .zip(name.iter().rev())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Returns a copy with all ASCII letters lowercased
    pub fn to_lowercase(&self) -> Self {
        let mut this = self.clone();
        this.label_data.make_ascii_lowercase();
        this
    }

    /// Parses the string, appending `origin` when the input is relative.
    ///
    /// The input is BIND presentation format: `.` separates labels, a
    /// trailing dot makes the name fully qualified, `\X` escapes a literal
    /// character and `\DDD` a decimal octet value.
    pub fn parse(local: &str, origin: Option<&Self>) -> DnsResult<Self> {
        let mut name = Self::new();
        let mut label = Vec::new();

        // `.` alone is the root
        if local == "." {
            name.is_fqdn = true;
            return Ok(name);
        }

        let mut chars = local.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if label.is_empty() {
                        return Err("double dot or leading dot in name".into());
                    }
                    name = name.append_label(&label)?;
                    label.clear();
                }
                '\\' => match chars.next() {
                    Some(digit @ '0'..='9') => {
                        let mut value = digit.to_digit(10).unwrap_or_default();
                        for _ in 0..2 {
                            match chars.next().and_then(|c| c.to_digit(10)) {
                                Some(d) => value = value * 10 + d,
                                None => return Err("bad decimal escape in name".into()),
                            }
                        }
                        let byte =
                            u8::try_from(value).map_err(|_| DnsError::from("escape exceeds 255"))?;
                        label.push(byte);
                    }
                    Some(escaped) if escaped.is_ascii() => label.push(escaped as u8),
                    _ => return Err("bad escape in name".into()),
                },
                _ if ch.is_ascii() && ch != '\0' => label.push(ch as u8),
                _ => return Err("non-ascii char in name".into()),
            }
        }

        if !label.is_empty() {
            name = name.append_label(&label)?;
        }

        // a trailing unescaped dot leaves the last label empty
        if label.is_empty() && !local.is_empty() {
            name.set_fqdn(true);
        } else if let Some(other) = origin {
            return name.append_domain(other);
        }

        Ok(name)
    }

    /// Parses an ASCII presentation-format name, see [`Self::parse`]
    pub fn from_ascii<S: AsRef<str>>(name: S) -> DnsResult<Self> {
        Self::parse(name.as_ref(), None)
    }

    /// Emits the name to the encoder.
    ///
    /// In canonical form no pointers are written (i.e. no compression) and
    /// the labels are written as stored; callers wanting the RFC 4034
    /// lowercased form pair this with [`Self::to_lowercase`].
    pub fn emit_as_canonical(
        &self,
        encoder: &mut WireEncoder<'_>,
        canonical: bool,
    ) -> DnsResult<()> {
        let buf_len = encoder.len();

        // write out each label, remembering where each started
        let mut labels_written = Vec::with_capacity(self.label_ends.len());
        for label in self.iter() {
            if label.len() > 63 {
                return Err(DnsErrorKind::LabelBytesTooLong(label.len()).into());
            }

            labels_written.push(encoder.offset());
            encoder.emit_character_data(label)?;
        }
        let last_index = encoder.offset();

        // from the first label inwards, look for an identical already-written
        // suffix; on a hit replace the tail with a pointer and stop
        for label_idx in labels_written {
            match encoder.get_label_pointer(label_idx, last_index) {
                Some(_) if canonical => continue,
                Some(loc) => {
                    encoder.trim_to(label_idx);
                    encoder.emit_u16(0xC000 | (loc & 0x3FFF))?;
                    return Ok(());
                }
                None => {
                    encoder.store_label_pointer(label_idx, last_index);
                }
            }
        }

        // no pointer closed the name, terminate with the root label
        encoder.emit_u8(0)?;

        let length = encoder.len() - buf_len;
        if length > Self::MAX_LENGTH {
            return Err(DnsErrorKind::DomainNameTooLong(length).into());
        }

        Ok(())
    }

    /// Writes the name, lowercased when `lowercase` is set
    pub fn emit_with_lowercase(
        &self,
        encoder: &mut WireEncoder<'_>,
        lowercase: bool,
    ) -> DnsResult<()> {
        let is_canonical = encoder.is_canonical_names();
        if lowercase {
            self.to_lowercase().emit_as_canonical(encoder, is_canonical)
        } else {
            self.emit_as_canonical(encoder, is_canonical)
        }
    }

    fn cmp_with_case(&self, other: &Self, ignore_case: bool) -> Ordering {
        if self.label_ends.is_empty() && other.label_ends.is_empty() {
            return Ordering::Equal;
        }

        // compare from the root towards the leaf, RFC 4034 6.1
        for (l, r) in self.iter().rev().zip(other.iter().rev()) {
            let ord = if ignore_case {
                let l = l.iter().map(u8::to_ascii_lowercase);
                let r = r.iter().map(u8::to_ascii_lowercase);
                l.cmp(r)
            } else {
                l.cmp(r)
            };
            match ord {
                Ordering::Equal => continue,
                not_eq => return not_eq,
            }
        }

        self.label_ends.len().cmp(&other.label_ends.len())
    }

    /// Case sensitive comparison
    pub fn cmp_case(&self, other: &Self) -> Ordering {
        self.cmp_with_case(other, false)
    }

    /// Compares the names in a case sensitive manner
    pub fn eq_case(&self, other: &Self) -> bool {
        self.cmp_case(other) == Ordering::Equal
    }

    fn write_labels<W: Write>(&self, f: &mut W) -> Result<(), fmt::Error> {
        let mut iter = self.iter();
        if let Some(label) = iter.next() {
            Self::write_label(f, label)?;
            for label in iter {
                f.write_char('.')?;
                Self::write_label(f, label)?;
            }
        }

        // the root or an fqdn renders the trailing dot
        if self.is_root() || self.is_fqdn() {
            f.write_char('.')?;
        }

        Ok(())
    }

    fn write_label<W: Write>(f: &mut W, label: &[u8]) -> Result<(), fmt::Error> {
        for &b in label {
            match b {
                b'.' | b'\\' => write!(f, "\\{}", b as char)?,
                0x20..=0x7E => f.write_char(b as char)?,
                _ => write!(f, "\\{b:03}")?,
            }
        }
        Ok(())
    }

    /// Returns the presentation format of this name
    pub fn to_ascii(&self) -> String {
        let mut s = String::with_capacity(self.len());
        self.write_labels(&mut s)
            .expect("string formatting cannot fail");
        s
    }
}

/// An iterator over the labels of a [`Name`]
pub struct LabelIter<'a> {
    name: &'a Name,
    start: usize,
    end: usize,
}

impl<'a> LabelIter<'a> {
    fn get(&self, idx: usize) -> &'a [u8] {
        let end = self.name.label_ends[idx] as usize;
        let start = if idx == 0 {
            0
        } else {
            self.name.label_ends[idx - 1] as usize
        };
        &self.name.label_data[start..end]
    }
}

impl<'a> Iterator for LabelIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.start >= self.end {
            return None;
        }
        let label = self.get(self.start);
        self.start += 1;
        Some(label)
    }
}

impl DoubleEndedIterator for LabelIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start >= self.end {
            return None;
        }
        self.end -= 1;
        Some(self.get(self.end))
    }
}

impl ExactSizeIterator for LabelIter<'_> {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl WireEncode for Name {
    fn encode(&self, encoder: &mut WireEncoder<'_>) -> DnsResult<()> {
        let canonical = encoder.is_canonical_names();
        self.emit_with_lowercase(encoder, canonical)
    }
}

impl<'r> WireDecode<'r> for Name {
    /// Parses the chain of labels, following compression pointers.
    ///
    /// A name may be at most 255 octets with each label at most 63; pointers
    /// must point strictly backwards and are bounded in number, so malformed
    /// pointer loops terminate with an error rather than spinning.
    fn decode(decoder: &mut WireDecoder<'r>) -> DnsResult<Self> {
        let mut name = Self::default();

        // after the first pointer the outer cursor no longer moves; we chase
        // the chain on cloned cursors
        let mut cursor: Option<WireDecoder<'r>> = None;
        // every pointer target must precede the position it was read from
        let mut horizon = decoder.index();
        let mut derefs: u8 = 0;

        loop {
            let current = cursor.as_mut().unwrap_or(&mut *decoder);
            let byte = match current.peek() {
                Some(byte) => byte,
                // valid names end in the root octet, running out is an error
                None => return Err("buffer exhausted reading name".into()),
            };

            match byte & 0b1100_0000 {
                0b0000_0000 if byte == 0 => {
                    current.pop()?;
                    name.set_fqdn(true);
                    return Ok(name);
                }
                0b0000_0000 => {
                    let label = current.read_character_data()?;
                    if label.len() > 63 {
                        return Err(DnsErrorKind::LabelBytesTooLong(label.len()).into());
                    }
                    name.extend_name(label)?;
                }
                0b1100_0000 => {
                    let idx = current.index();
                    let location = current.read_u16()? & 0x3FFF;
                    if location as usize >= horizon {
                        return Err(DnsErrorKind::PointerNotPriorToLabel { idx }.into());
                    }
                    derefs += 1;
                    if derefs == u8::MAX {
                        return Err("compression pointer limit exceeded".into());
                    }

                    horizon = location as usize;
                    let jumped = current.seek(location);
                    cursor = Some(jumped);
                }
                code => return Err(DnsErrorKind::UnrecognizedLabelCode(code).into()),
            }
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_labels(f)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Name(")?;
        self.write_labels(f)?;
        f.write_str(")")
    }
}

impl PartialEq<Self> for Name {
    fn eq(&self, other: &Self) -> bool {
        self.is_fqdn == other.is_fqdn && self.cmp_with_case(other, true) == Ordering::Equal
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_fqdn.hash(state);
        for label in self.iter() {
            for b in label {
                state.write_u8(b.to_ascii_lowercase());
            }
            state.write_u8(0);
        }
    }
}

impl PartialOrd<Self> for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    /// Case insensitive comparison in the RFC 4034 6.1 canonical ordering:
    /// names compare by their most significant (rightmost) labels first,
    /// uppercase US-ASCII treated as lowercase.
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_with_case(other, true)
    }
}

impl FromStr for Name {
    type Err = DnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ascii(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::binary::{WireDecode, WireEncode};

    #[test]
    fn test_from_ascii() {
        let name = Name::from_ascii("www.example.com.").unwrap();
        assert!(name.is_fqdn());
        assert_eq!(name.iter().count(), 3);
        assert_eq!(name.to_ascii(), "www.example.com.");

        let relative = Name::from_ascii("www.example.com").unwrap();
        assert!(!relative.is_fqdn());
        assert_eq!(relative.to_ascii(), "www.example.com");

        assert_eq!(Name::from_ascii(".").unwrap(), Name::root());
    }

    #[test]
    fn test_parse_with_origin() {
        let origin = Name::from_ascii("example.com.").unwrap();
        let name = Name::parse("www", Some(&origin)).unwrap();
        assert!(name.is_fqdn());
        assert_eq!(name.to_ascii(), "www.example.com.");
    }

    #[test]
    fn test_escapes() {
        let name = Name::from_ascii(r"a\.b.example.com.").unwrap();
        assert_eq!(name.iter().count(), 3);
        assert_eq!(name.iter().next().unwrap(), b"a.b");
        assert_eq!(name.to_ascii(), r"a\.b.example.com.");

        let name = Name::from_ascii(r"\097.example.com.").unwrap();
        assert_eq!(name.iter().next().unwrap(), b"a");
    }

    #[test]
    fn test_encode_roundtrip() {
        let name = Name::from_ascii("WWW.Example.COM.").unwrap();
        let bytes = name.to_bytes().unwrap();
        let decoded = Name::from_bytes(&bytes).unwrap();
        // comparison ignores case
        assert_eq!(name, decoded);
        // the wire form preserves it
        assert!(name.eq_case(&decoded));
    }

    #[test]
    fn test_decode_root() {
        let decoded = Name::from_bytes(&[0]).unwrap();
        assert!(decoded.is_root());
    }

    #[test]
    fn test_pointer_decode() {
        // www.example.com followed by ftp at a pointer to example.com
        let bytes = [
            0x03, b'w', b'w', b'w', 0x07, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 0x03, b'c',
            b'o', b'm', 0x00, 0x03, b'f', b't', b'p', 0xC0, 0x04,
        ];
        let mut decoder = WireDecoder::new(&bytes);
        let first = Name::decode(&mut decoder).unwrap();
        let second = Name::decode(&mut decoder).unwrap();
        assert_eq!(first, Name::from_ascii("www.example.com.").unwrap());
        assert_eq!(second, Name::from_ascii("ftp.example.com.").unwrap());
    }

    #[test]
    fn test_pointer_to_self_rejected() {
        // a name starting at offset 2 pointing at itself
        let bytes = [0x00, 0x00, 0xC0, 0x02];
        let mut decoder = WireDecoder::new(&bytes);
        decoder.read_u16().unwrap();
        assert!(Name::decode(&mut decoder).is_err());
    }

    #[test]
    fn test_forward_pointer_rejected() {
        let bytes = [0xC0, 0x04, 0x00, 0x00, 0x01, b'a', 0x00];
        let mut decoder = WireDecoder::new(&bytes);
        assert!(Name::decode(&mut decoder).is_err());
    }

    #[test]
    fn test_pointer_loop_rejected() {
        // two pointers at offsets 2 and 4: the second points forward
        let bytes = [0x00, 0x00, 0xC0, 0x04, 0xC0, 0x02];
        let mut decoder = WireDecoder::new(&bytes);
        decoder.read_u16().unwrap();
        assert!(Name::decode(&mut decoder).is_err());
    }

    #[test]
    fn test_name_too_long() {
        // 4 * 63 + prefixes pushes past 255
        let label = "a".repeat(63);
        let long = format!("{label}.{label}.{label}.{label}.");
        assert!(Name::from_ascii(long).is_err());
    }

    #[test]
    fn test_label_too_long() {
        let label = "a".repeat(64);
        assert!(Name::from_ascii(label).is_err());
    }

    #[test]
    fn test_compression_on_encode() {
        let mut bytes = Vec::new();
        {
            let mut encoder = WireEncoder::new(&mut bytes);
            Name::from_ascii("www.example.com.")
                .unwrap()
                .encode(&mut encoder)
                .unwrap();
            Name::from_ascii("ftp.example.com.")
                .unwrap()
                .encode(&mut encoder)
                .unwrap();
        }

        // second name is 4 label bytes plus a 2 byte pointer
        assert_eq!(bytes.len(), 17 + 4 + 2);
        assert_eq!(&bytes[21..], &[0xC0, 0x04]);

        let mut decoder = WireDecoder::new(&bytes);
        assert_eq!(
            Name::decode(&mut decoder).unwrap().to_ascii(),
            "www.example.com."
        );
        assert_eq!(
            Name::decode(&mut decoder).unwrap().to_ascii(),
            "ftp.example.com."
        );
    }

    #[test]
    fn test_canonical_never_compresses() {
        let mut bytes = Vec::new();
        {
            let mut encoder = WireEncoder::new(&mut bytes);
            encoder.set_canonical_names(true);
            let name = Name::from_ascii("www.example.com.").unwrap();
            name.encode(&mut encoder).unwrap();
            name.encode(&mut encoder).unwrap();
        }
        assert_eq!(bytes.len(), 34);
        assert_eq!(&bytes[..17], &bytes[17..]);
    }

    #[test]
    fn test_zone_of() {
        let zone = Name::from_ascii("example.com.").unwrap();
        let record = Name::from_ascii("www.EXAMPLE.com.").unwrap();
        let other = Name::from_ascii("www.example.net.").unwrap();
        assert!(zone.zone_of(&record));
        assert!(zone.zone_of(&zone));
        assert!(!zone.zone_of(&other));
        assert!(Name::root().zone_of(&record));
    }

    #[test]
    fn test_canonical_ordering() {
        // RFC 4034 6.1 example ordering
        let mut names = vec![
            Name::from_ascii("*.z.example.").unwrap(),
            Name::from_ascii("yljkjljk.a.example.").unwrap(),
            Name::from_ascii("example.").unwrap(),
            Name::from_ascii("zABC.a.EXAMPLE.").unwrap(),
            Name::from_ascii("a.example.").unwrap(),
            Name::from_ascii("z.example.").unwrap(),
            Name::from_ascii("Z.a.example.").unwrap(),
        ];
        names.sort();
        let rendered: Vec<String> = names.iter().map(Name::to_ascii).collect();
        assert_eq!(
            rendered,
            vec![
                "example.",
                "a.example.",
                "yljkjljk.a.example.",
                "Z.a.example.",
                "zABC.a.EXAMPLE.",
                "z.example.",
                "*.z.example.",
            ]
        );
    }

    #[test]
    fn test_num_labels() {
        assert_eq!(Name::root().num_labels(), 0);
        assert_eq!(Name::from_ascii("a.com.").unwrap().num_labels(), 2);
        assert_eq!(Name::from_ascii("*.a.com.").unwrap().num_labels(), 2);
    }
}
