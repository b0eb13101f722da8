use crate::extract::DEFAULT_PROTOCOLS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConnwatchConfig {
    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Application tags (first comma-delimited token) that are tracked.
    #[serde(default = "default_protocols")]
    pub protocols: Vec<String>,

    #[serde(default)]
    pub devices: Vec<DeviceAliasConfig>,
}

impl Default for ConnwatchConfig {
    fn default() -> Self {
        Self {
            ingest: IngestConfig::default(),
            metrics: MetricsConfig::default(),
            enrichment: EnrichmentConfig::default(),
            protocols: default_protocols(),
            devices: Vec::new(),
        }
    }
}

/// Syslog TCP intake.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IngestConfig {
    #[serde(default = "default_ingest_listen")]
    pub listen: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            listen: default_ingest_listen(),
        }
    }
}

/// Prometheus scrape endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_listen")]
    pub listen: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen: default_metrics_listen(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnrichmentConfig {
    #[serde(default = "default_asn_db")]
    pub asn_db: PathBuf,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            asn_db: default_asn_db(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceAliasConfig {
    /// Hostname or address as it appears in the syslog header.
    pub host: String,
    pub name: String,
}

fn default_ingest_listen() -> String {
    "0.0.0.0:2514".to_string()
}

fn default_metrics_listen() -> String {
    "0.0.0.0:8122".to_string()
}

fn default_asn_db() -> PathBuf {
    PathBuf::from("GeoLite2-ASN.mmdb")
}

fn default_protocols() -> Vec<String> {
    DEFAULT_PROTOCOLS.iter().map(|p| p.to_string()).collect()
}
