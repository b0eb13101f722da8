pub mod asn;

pub use asn::{AsnDatabase, LookupError, NetworkLookup, OpenError};
