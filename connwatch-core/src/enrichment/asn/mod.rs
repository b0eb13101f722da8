use maxminddb::PathElement;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("could not parse {address:?} as IP")]
    InvalidAddress { address: String },

    #[error("could not look up {address}: {reason}")]
    LookupMiss { address: IpAddr, reason: String },
}

#[derive(Debug, Error)]
#[error("failed to open ASN database {path}: {source}")]
pub struct OpenError {
    pub path: PathBuf,
    #[source]
    pub source: maxminddb::MaxMindDbError,
}

/// Resolves a remote address to the number of the network that owns it.
///
/// Implementations are read-only and shared across tasks.
pub trait NetworkLookup: Send + Sync {
    fn resolve_network_id(&self, address: &str) -> Result<u32, LookupError>;
}

/// GeoLite2/GeoIP2 ASN database, memory-mapped for the lifetime of the process.
pub struct AsnDatabase {
    reader: maxminddb::Reader<maxminddb::Mmap>,
}

impl AsnDatabase {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, OpenError> {
        let path = path.as_ref();

        // The mmdb file is opened read-only and never written by this process.
        let reader = unsafe { maxminddb::Reader::open_mmap(path) }.map_err(|source| OpenError {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(
            path = %path.display(),
            database_type = %reader.metadata.database_type,
            "ASN database opened"
        );

        Ok(Self { reader })
    }
}

impl NetworkLookup for AsnDatabase {
    fn resolve_network_id(&self, address: &str) -> Result<u32, LookupError> {
        let ip = parse_address(address)?;

        let lookup = self
            .reader
            .lookup(ip)
            .map_err(|e| LookupError::LookupMiss {
                address: ip,
                reason: e.to_string(),
            })?;

        lookup
            .decode_path::<u32>(&[PathElement::Key("autonomous_system_number")])
            .map_err(|e| LookupError::LookupMiss {
                address: ip,
                reason: e.to_string(),
            })?
            .ok_or_else(|| LookupError::LookupMiss {
                address: ip,
                reason: "no matching record".to_string(),
            })
    }
}

pub(crate) fn parse_address(address: &str) -> Result<IpAddr, LookupError> {
    address
        .parse::<IpAddr>()
        .map_err(|_| LookupError::InvalidAddress {
            address: address.to_string(),
        })
}
