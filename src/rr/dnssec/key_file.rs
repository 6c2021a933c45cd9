// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Reader for private keys in the BIND `dnssec-keygen` text format.
//!
//! A key is a pair of files named `K<name>.+<algorithm>+<tag>.key` (the
//! public DNSKEY) and `K<name>.+<algorithm>+<tag>.private`. The private
//! file is line oriented `Field: value` pairs, the values base64:
//!
//! ```text
//! Private-key-format: v1.2
//! Algorithm: 8 (RSASHA256)
//! Modulus: wK1n...
//! PublicExponent: AQAB
//! PrivateExponent: C6cJ...
//! Prime1: 7Daf...
//! Prime2: zG1j...
//! Exponent1: o9Vx...
//! Exponent2: HBrM...
//! Coefficient: PBMk...
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use data_encoding::BASE64;
use openssl::bn::BigNum;
use openssl::rsa::Rsa;
use tracing::warn;

use crate::error::{DnsError, DnsErrorKind, DnsResult};
use crate::rr::dnssec::{Algorithm, KeyPair, Signer};
use crate::rr::Name;

/// A private key read from a `K*.private` file, with the identity encoded
/// in its filename
#[derive(Debug)]
pub struct KeyFile {
    signer_name: Name,
    algorithm: Algorithm,
    key_tag: u16,
    key: KeyPair,
}

impl KeyFile {
    /// Reads and validates a `K<name>.+<algorithm>+<tag>.private` file.
    ///
    /// The algorithm number declared on the `Algorithm:` line must match
    /// the one encoded in the filename; a disagreement means the file was
    /// renamed or corrupted and is a hard error. Keys of algorithms this
    /// crate cannot sign with (DSA among them) are rejected here rather
    /// than failing on first use.
    pub fn read<P: AsRef<Path>>(path: P) -> DnsResult<Self> {
        let path = path.as_ref();
        let (signer_name, file_algorithm, file_tag) = parse_file_name(path)?;

        let contents = fs::read_to_string(path)?;
        let mut lines = contents.lines();

        // Private-key-format must lead
        let (field, value) = split_field_value(lines.next().unwrap_or_default())?;
        if field != "Private-key-format" {
            return Err(DnsErrorKind::KeyFileSyntax(format!(
                "expected Private-key-format, found {field}"
            ))
            .into());
        }
        if !value.starts_with("v1.") {
            warn!("un-tested key format version: {value}");
        }

        // then the algorithm
        let (field, value) = split_field_value(lines.next().unwrap_or_default())?;
        if field != "Algorithm" {
            return Err(DnsErrorKind::KeyFileSyntax(format!(
                "expected Algorithm, found {field}"
            ))
            .into());
        }
        let declared = value
            .split(' ')
            .next()
            .and_then(|num| u8::from_str(num).ok())
            .ok_or_else(|| {
                DnsError::from(DnsErrorKind::KeyFileSyntax(format!(
                    "bad algorithm line: {value}"
                )))
            })?;

        if declared != file_algorithm {
            return Err(DnsErrorKind::KeyFileAlgorithmMismatch {
                expect: file_algorithm,
                found: declared,
            }
            .into());
        }

        let algorithm = Algorithm::from_u8(declared);
        if !algorithm.is_supported() {
            return Err(DnsErrorKind::UnsupportedAlgorithm(declared).into());
        }

        let key = read_rsa(lines)?;

        let key_file = Self {
            signer_name,
            algorithm,
            key_tag: file_tag,
            key,
        };

        // the filename tag is advisory; flag a disagreement but prefer the
        // tag computed from the key itself
        let computed = key_file.key.to_dnskey(algorithm, false)?.key_tag()?;
        if computed != file_tag {
            warn!("key tag {computed} does not match filename tag {file_tag}");
        }

        Ok(key_file)
    }

    /// The owner name of the key, from the filename
    pub fn signer_name(&self) -> &Name {
        &self.signer_name
    }

    /// The algorithm of the key
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The key tag from the filename
    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// Converts into a [`Signer`] bound to the key's owner name
    pub fn into_signer(self) -> DnsResult<Signer> {
        Signer::new(self.key, self.algorithm, self.signer_name)
    }
}

/// Splits `K<name>.+<algorithm>+<tag>.private` into its parts
fn parse_file_name(path: &Path) -> DnsResult<(Name, u8, u16)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            DnsError::from(DnsErrorKind::KeyFileSyntax("unreadable file name".to_string()))
        })?;

    let bad_name =
        || DnsError::from(DnsErrorKind::KeyFileSyntax(format!("bad key file name: {file_name}")));

    let stem = file_name
        .strip_prefix('K')
        .and_then(|rest| rest.strip_suffix(".private"))
        .ok_or_else(bad_name)?;

    let mut parts = stem.split('+');
    let name = parts.next().ok_or_else(bad_name)?;
    let algorithm = parts.next().ok_or_else(bad_name)?;
    let tag = parts.next().ok_or_else(bad_name)?;
    if parts.next().is_some() {
        return Err(bad_name());
    }

    let signer_name = Name::from_ascii(name).map_err(|_| bad_name())?;
    let algorithm = u8::from_str(algorithm).map_err(|_| bad_name())?;
    let tag = u16::from_str(tag).map_err(|_| bad_name())?;

    Ok((signer_name, algorithm, tag))
}

fn split_field_value(line: &str) -> DnsResult<(&str, &str)> {
    line.split_once(": ")
        .ok_or_else(|| DnsErrorKind::KeyFileSyntax(format!("missing value: {line}")).into())
}

fn read_rsa<'a>(lines: impl Iterator<Item = &'a str>) -> DnsResult<KeyPair> {
    let mut modulus = None;
    let mut public_exponent = None;
    let mut private_exponent = None;
    let mut prime1 = None;
    let mut prime2 = None;
    let mut exponent1 = None;
    let mut exponent2 = None;
    let mut coefficient = None;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let (field, value) = split_field_value(line)?;

        // timing metadata appears in v1.3 files
        if matches!(field, "Created" | "Publish" | "Activate") {
            continue;
        }

        let decoded = BASE64.decode(value.as_bytes()).map_err(|_| {
            DnsError::from(DnsErrorKind::KeyFileSyntax(format!(
                "expected base64 value: {line}"
            )))
        })?;
        let num = Some(BigNum::from_slice(&decoded)?);

        match field {
            "Modulus" => modulus = num,
            "PublicExponent" => public_exponent = num,
            "PrivateExponent" => private_exponent = num,
            "Prime1" => prime1 = num,
            "Prime2" => prime2 = num,
            "Exponent1" => exponent1 = num,
            "Exponent2" => exponent2 = num,
            "Coefficient" => coefficient = num,
            _ => {
                return Err(DnsErrorKind::KeyFileSyntax(format!(
                    "unrecognized field: {field}"
                ))
                .into())
            }
        }
    }

    let missing =
        |field: &str| DnsError::from(DnsErrorKind::KeyFileSyntax(format!("missing {field}")));

    let rsa = Rsa::from_private_components(
        modulus.ok_or_else(|| missing("Modulus"))?,
        public_exponent.ok_or_else(|| missing("PublicExponent"))?,
        private_exponent.ok_or_else(|| missing("PrivateExponent"))?,
        prime1.ok_or_else(|| missing("Prime1"))?,
        prime2.ok_or_else(|| missing("Prime2"))?,
        exponent1.ok_or_else(|| missing("Exponent1"))?,
        exponent2.ok_or_else(|| missing("Exponent2"))?,
        coefficient.ok_or_else(|| missing("Coefficient"))?,
    )?;

    KeyPair::from_rsa(rsa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    /// Renders a generated RSA key in the dnssec-keygen private format
    fn write_key_file(dir: &Path, name: &str, declared_algorithm: u8, tag: u16) -> std::path::PathBuf {
        let rsa = Rsa::generate(2048).unwrap();

        let mut contents = String::new();
        writeln!(contents, "Private-key-format: v1.2").unwrap();
        writeln!(contents, "Algorithm: {declared_algorithm} (RSASHA256)").unwrap();
        for (field, value) in [
            ("Modulus", rsa.n().to_vec()),
            ("PublicExponent", rsa.e().to_vec()),
            ("PrivateExponent", rsa.d().to_vec()),
            ("Prime1", rsa.p().unwrap().to_vec()),
            ("Prime2", rsa.q().unwrap().to_vec()),
            ("Exponent1", rsa.dmp1().unwrap().to_vec()),
            ("Exponent2", rsa.dmq1().unwrap().to_vec()),
            ("Coefficient", rsa.iqmp().unwrap().to_vec()),
        ] {
            writeln!(contents, "{field}: {}", BASE64.encode(&value)).unwrap();
        }

        let path = dir.join(format!("K{name}+008+{tag:05}.private"));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_valid_key() {
        let dir = std::env::temp_dir().join("pecan-key-file-valid");
        fs::create_dir_all(&dir).unwrap();
        let path = write_key_file(&dir, "example.com.", 8, 12345);

        let key_file = KeyFile::read(&path).unwrap();
        assert_eq!(key_file.algorithm(), Algorithm::RSASHA256);
        assert_eq!(key_file.key_tag(), 12345);
        assert_eq!(
            key_file.signer_name(),
            &Name::from_ascii("example.com.").unwrap()
        );

        let signer = key_file.into_signer().unwrap();
        assert_eq!(signer.algorithm(), Algorithm::RSASHA256);
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let dir = std::env::temp_dir().join("pecan-key-file-mismatch");
        fs::create_dir_all(&dir).unwrap();
        // filename says 8, contents say 5
        let path = write_key_file(&dir, "example.com.", 5, 54321);

        let err = KeyFile::read(&path).unwrap_err();
        assert!(matches!(
            err.kind(),
            DnsErrorKind::KeyFileAlgorithmMismatch {
                expect: 8,
                found: 5
            }
        ));
    }

    #[test]
    fn test_bad_file_name_rejected() {
        assert!(parse_file_name(Path::new("example.com.+008+12345.private")).is_err());
        assert!(parse_file_name(Path::new("Kexample.com.+008+12345.key")).is_err());
        assert!(parse_file_name(Path::new("Kexample.com.+abc+12345.private")).is_err());
    }

    #[test]
    fn test_file_name_parts() {
        let (name, algorithm, tag) =
            parse_file_name(Path::new("Kexample.com.+008+12345.private")).unwrap();
        assert_eq!(name, Name::from_ascii("example.com.").unwrap());
        assert_eq!(algorithm, 8);
        assert_eq!(tag, 12345);
    }
}
