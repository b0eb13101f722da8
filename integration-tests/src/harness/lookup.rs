use connwatch_core::enrichment::{LookupError, NetworkLookup};
use std::collections::HashMap;
use std::net::IpAddr;

/// In-memory stand-in for the ASN database.
#[derive(Default)]
pub struct StaticLookup {
    entries: HashMap<IpAddr, u32>,
}

impl StaticLookup {
    pub fn with(mut self, address: &str, asn: u32) -> Self {
        self.entries
            .insert(address.parse().expect("valid test address"), asn);
        self
    }
}

impl NetworkLookup for StaticLookup {
    fn resolve_network_id(&self, address: &str) -> Result<u32, LookupError> {
        let ip = address
            .parse::<IpAddr>()
            .map_err(|_| LookupError::InvalidAddress {
                address: address.to_string(),
            })?;

        self.entries
            .get(&ip)
            .copied()
            .ok_or_else(|| LookupError::LookupMiss {
                address: ip,
                reason: "no matching record".into(),
            })
    }
}
