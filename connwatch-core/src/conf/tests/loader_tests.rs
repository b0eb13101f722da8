use crate::conf::{
    ConfigError, ConnwatchConfig, DeviceAliasConfig, Overrides, load_config, parse_device_names,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn alias(host: &str, name: &str) -> DeviceAliasConfig {
    DeviceAliasConfig {
        host: host.into(),
        name: name.into(),
    }
}

#[test]
fn loads_full_hcl_config() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("connwatch.hcl");
    fs::write(
        &path,
        r#"
ingest {
  listen = "127.0.0.1:6514"
}

metrics {
  listen = "127.0.0.1:9100"
}

enrichment {
  asn_db = "/var/lib/geoip/GeoLite2-ASN.mmdb"
}

protocols = ["ovpn", "l2tp"]

devices = [
  { host = "10.11.12.13", name = "router1" },
  { host = "10.0.0.1", name = "core" },
]
"#,
    )
    .unwrap();

    // Act
    let cfg = load_config(Some(&path), &Overrides::default()).unwrap();

    // Assert
    assert_eq!(cfg.ingest.listen, "127.0.0.1:6514");
    assert_eq!(cfg.metrics.listen, "127.0.0.1:9100");
    assert_eq!(
        cfg.enrichment.asn_db,
        PathBuf::from("/var/lib/geoip/GeoLite2-ASN.mmdb")
    );
    assert_eq!(cfg.protocols, vec!["ovpn", "l2tp"]);
    assert_eq!(
        cfg.devices,
        vec![alias("10.11.12.13", "router1"), alias("10.0.0.1", "core")]
    );
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("connwatch.hcl");
    fs::write(&path, "").unwrap();

    let cfg = load_config(Some(&path), &Overrides::default()).unwrap();

    assert_eq!(cfg, ConnwatchConfig::default());
    assert_eq!(cfg.ingest.listen, "0.0.0.0:2514");
    assert_eq!(cfg.metrics.listen, "0.0.0.0:8122");
    assert_eq!(cfg.protocols, vec!["ovpn", "sstp"]);
}

#[test]
fn overrides_take_precedence_over_file() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("connwatch.hcl");
    fs::write(
        &path,
        r#"
ingest {
  listen = "127.0.0.1:6514"
}
devices = [{ host = "10.0.0.1", name = "core" }]
"#,
    )
    .unwrap();
    let overrides = Overrides {
        syslog_listen: Some("127.0.0.1:7514".into()),
        http_listen: None,
        geoip_file: Some("asn.mmdb".into()),
        device_names: Some("10.11.12.13/router1".into()),
    };

    // Act
    let cfg = load_config(Some(&path), &overrides).unwrap();

    // Assert
    assert_eq!(cfg.ingest.listen, "127.0.0.1:7514");
    assert_eq!(cfg.metrics.listen, "0.0.0.0:8122");
    assert_eq!(cfg.enrichment.asn_db, PathBuf::from("asn.mmdb"));
    assert_eq!(cfg.devices, vec![alias("10.11.12.13", "router1")]);
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.hcl");

    let err = load_config(Some(&path), &Overrides::default()).unwrap_err();

    assert!(matches!(err, ConfigError::ReadFile { .. }), "{err}");
}

#[test]
fn malformed_hcl_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("connwatch.hcl");
    fs::write(&path, "ingest { listen = ").unwrap();

    let err = load_config(Some(&path), &Overrides::default()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
}

#[test]
fn unknown_field_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("connwatch.hcl");
    fs::write(&path, "ingest {\n  port = 514\n}\n").unwrap();

    let err = load_config(Some(&path), &Overrides::default()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
}

#[test]
fn parses_device_name_list() {
    let devices = parse_device_names("10.11.12.13/router1,,10.0.0.1/core").unwrap();

    assert_eq!(
        devices,
        vec![alias("10.11.12.13", "router1"), alias("10.0.0.1", "core")]
    );
    assert!(parse_device_names("").unwrap().is_empty());
}

#[test]
fn device_name_without_separator_is_rejected() {
    for list in ["router1", "10.0.0.1/", "/core"] {
        let err = parse_device_names(list).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidDeviceName { .. }),
            "{list}: {err}"
        );
    }
}
