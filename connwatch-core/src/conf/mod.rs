mod error;
mod loader;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use loader::{DEFAULT_CONFIG_PATH, Overrides, load_config, parse_device_names};
pub use types::{ConnwatchConfig, DeviceAliasConfig, EnrichmentConfig, IngestConfig, MetricsConfig};
pub use validation::validate;
