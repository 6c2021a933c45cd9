// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Resource record related components, e.g. `Name` aka label, `Record` and
//! `RData`, the latter being the typed variants of all supported record
//! data, plus the DNSSEC subset

mod dns_class;
pub mod dnssec;
mod name;
pub mod rdata;
mod record_data;
mod record_type;
mod resource;
pub(crate) mod type_bit_map;

pub use self::dns_class::DnsClass;
pub use self::name::{LabelIter, Name};
pub use self::rdata::{EdnsCode, EdnsOption};
pub use self::record_data::RData;
pub use self::record_type::RecordType;
pub use self::resource::Record;
