use crate::conf::types::{ConnwatchConfig, DeviceAliasConfig};
use crate::conf::{ConfigError, validate};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/connwatch.hcl";

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub syslog_listen: Option<String>,
    pub http_listen: Option<String>,
    pub geoip_file: Option<PathBuf>,
    pub device_names: Option<String>,
}

/// Load, override and validate the configuration.
///
/// An explicit `path` must exist. Without one, `DEFAULT_CONFIG_PATH` is used
/// when present and built-in defaults otherwise.
pub fn load_config(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<ConnwatchConfig, ConfigError> {
    let mut cfg = match path {
        Some(path) => read_config(path)?,
        None => match read_config(Path::new(DEFAULT_CONFIG_PATH)) {
            Err(ConfigError::ReadFile { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = DEFAULT_CONFIG_PATH, "no config file, using defaults");
                ConnwatchConfig::default()
            }
            other => other?,
        },
    };

    apply_overrides(&mut cfg, overrides)?;
    validate(&cfg)?;

    Ok(cfg)
}

fn read_config(path: &Path) -> Result<ConnwatchConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    hcl::from_str(&raw).map_err(|e| ConfigError::parse(path, e))
}

fn apply_overrides(cfg: &mut ConnwatchConfig, overrides: &Overrides) -> Result<(), ConfigError> {
    if let Some(listen) = &overrides.syslog_listen {
        cfg.ingest.listen = listen.clone();
    }
    if let Some(listen) = &overrides.http_listen {
        cfg.metrics.listen = listen.clone();
    }
    if let Some(path) = &overrides.geoip_file {
        cfg.enrichment.asn_db = path.clone();
    }
    if let Some(names) = &overrides.device_names {
        cfg.devices = parse_device_names(names)?;
    }
    Ok(())
}

/// Parse `"10.11.12.13/router1,10.0.0.1/core"` into alias entries.
pub fn parse_device_names(list: &str) -> Result<Vec<DeviceAliasConfig>, ConfigError> {
    list.split(',')
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (host, name) = entry
                .split_once('/')
                .filter(|(host, name)| !host.is_empty() && !name.is_empty())
                .ok_or_else(|| ConfigError::InvalidDeviceName {
                    entry: entry.to_string(),
                })?;

            Ok(DeviceAliasConfig {
                host: host.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}
