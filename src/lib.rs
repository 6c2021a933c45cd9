// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Pecan-DNS is a DNS client library.
//!
//! It implements the DNS wire and presentation codecs, a blocking stub
//! resolver and dynamic updater over UDP and TCP with nameserver rotation
//! and truncation fallback, zone transfers, EDNS, TSIG and SIG(0)
//! transaction authentication, and DNSSEC record signing given key
//! material (chain validation from the root is out of scope).
//!
//! The resolver is deliberately not internally threaded: each [`client::Resolver`]
//! owns its sockets and serves one caller; programs wanting concurrency
//! create a resolver per worker.
//!
//! # Example
//!
//! ```no_run
//! use pecan_dns::client::{Resolver, ResolverConfig};
//! use pecan_dns::rr::{DnsClass, Name, RecordType};
//! use std::str::FromStr;
//!
//! let config = ResolverConfig::new(vec!["192.0.2.53:53".parse().unwrap()]);
//! let mut resolver = Resolver::new(config).unwrap();
//!
//! let response = resolver
//!     .query(Name::from_str("example.com.").unwrap(), DnsClass::IN, RecordType::MX)
//!     .unwrap();
//! for answer in response.answers() {
//!     println!("{answer}");
//! }
//! ```

#![warn(
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::unimplemented,
    missing_docs,
    rust_2018_idioms,
    unreachable_pub
)]
#![allow(clippy::needless_doctest_main)]

pub mod client;
pub mod error;
pub mod op;
pub mod rr;
pub mod serialize;
pub mod tcp;
pub mod udp;

pub use crate::error::{DnsError, DnsErrorKind, DnsResult};

/// The version of this crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
