use crate::conf::ConfigError;
use crate::conf::types::ConnwatchConfig;
use ahash::AHashSet;
use std::net::SocketAddr;

/// Check the whole config and report every problem at once.
pub fn validate(cfg: &ConnwatchConfig) -> Result<(), ConfigError> {
    let mut issues = Vec::new();

    for (what, addr) in [
        ("ingest.listen", &cfg.ingest.listen),
        ("metrics.listen", &cfg.metrics.listen),
    ] {
        if addr.parse::<SocketAddr>().is_err() {
            issues.push(format!("{what}: {addr:?} is not a valid socket address"));
        }
    }

    if cfg.ingest.listen == cfg.metrics.listen {
        issues.push(format!(
            "ingest.listen and metrics.listen are both {:?}",
            cfg.ingest.listen
        ));
    }

    if cfg.protocols.is_empty() {
        issues.push("protocols: at least one protocol must be monitored".to_string());
    }
    for protocol in &cfg.protocols {
        if protocol.is_empty() || protocol.contains(',') || protocol.contains(char::is_whitespace)
        {
            issues.push(format!("protocols: {protocol:?} is not a valid protocol tag"));
        }
    }

    let mut seen = AHashSet::new();
    for device in &cfg.devices {
        if !seen.insert(device.host.as_str()) {
            issues.push(format!("devices: host {:?} is aliased more than once", device.host));
        }
        if device.name.is_empty() {
            issues.push(format!("devices: host {:?} has an empty name", device.host));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation { issues })
    }
}
