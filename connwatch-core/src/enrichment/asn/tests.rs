use super::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::net::Ipv4Addr;
use tempfile::{TempDir, tempdir};

#[test]
fn parses_ipv4_and_ipv6_literals() {
    assert_eq!(
        parse_address("81.2.69.142").unwrap(),
        "81.2.69.142".parse::<IpAddr>().unwrap()
    );
    assert_eq!(
        parse_address("2001:db8::1").unwrap(),
        "2001:db8::1".parse::<IpAddr>().unwrap()
    );
}

#[test]
fn rejects_non_ip_address() {
    for address in ["not-an-ip", "", "81.2.69", "81.2.69.142:1194", "router.example"] {
        assert_eq!(
            parse_address(address),
            Err(LookupError::InvalidAddress {
                address: address.to_string()
            })
        );
    }
}

#[test]
fn open_fails_for_missing_file() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.mmdb");

    // Act
    let err = AsnDatabase::open(&path).err().unwrap();

    // Assert
    assert_eq!(err.path, path);
}

#[test]
fn open_fails_for_garbage_file() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.mmdb");
    fs::write(&path, b"definitely not a maxmind database").unwrap();

    // Act
    let result = AsnDatabase::open(&path);

    // Assert
    assert!(result.is_err());
}

//------------------------------------------------------------------------------
// Lookups against a generated database
//------------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Record {
    Empty,
    Node(u32),
    Data(u32),
}

/// Writes a small IPv4 MaxMind DB (24-bit records) with one data record per network.
struct MmdbBuilder {
    nodes: Vec<[Record; 2]>,
    data: Vec<u8>,
}

impl MmdbBuilder {
    fn new() -> Self {
        Self {
            nodes: vec![[Record::Empty; 2]],
            data: Vec::new(),
        }
    }

    fn network(mut self, network: Ipv4Addr, prefix_len: u32, record: Vec<u8>) -> Self {
        let offset = self.data.len() as u32;
        self.data.extend(record);

        let bits = u32::from(network);
        let mut node = 0;
        for depth in 0..prefix_len {
            let bit = ((bits >> (31 - depth)) & 1) as usize;
            if depth + 1 == prefix_len {
                self.nodes[node][bit] = Record::Data(offset);
                break;
            }
            node = match self.nodes[node][bit] {
                Record::Node(next) => next as usize,
                _ => {
                    self.nodes.push([Record::Empty; 2]);
                    let next = self.nodes.len() - 1;
                    self.nodes[node][bit] = Record::Node(next as u32);
                    next
                }
            };
        }
        self
    }

    fn write(self, dir: &TempDir) -> std::path::PathBuf {
        let node_count = self.nodes.len() as u32;
        let mut out = Vec::new();

        for node in &self.nodes {
            for record in node {
                let value = match *record {
                    Record::Empty => node_count,
                    Record::Node(next) => next,
                    Record::Data(offset) => node_count + 16 + offset,
                };
                out.extend_from_slice(&value.to_be_bytes()[1..]);
            }
        }
        out.extend_from_slice(&[0; 16]);
        out.extend(self.data);

        out.extend_from_slice(b"\xab\xcd\xefMaxMind.com");
        out.extend(map(vec![
            ("binary_format_major_version", uint(TYPE_UINT16, 2)),
            ("binary_format_minor_version", uint(TYPE_UINT16, 0)),
            ("build_epoch", uint(TYPE_UINT64, 1_700_000_000)),
            ("database_type", string("GeoLite2-ASN")),
            ("description", map(vec![("en", string("connwatch test data"))])),
            ("ip_version", uint(TYPE_UINT16, 4)),
            ("languages", array(vec![string("en")])),
            ("node_count", uint(TYPE_UINT32, node_count.into())),
            ("record_size", uint(TYPE_UINT16, 24)),
        ]));

        let path = dir.path().join("GeoLite2-ASN-test.mmdb");
        fs::write(&path, out).unwrap();
        path
    }
}

const TYPE_STRING: u8 = 2;
const TYPE_UINT16: u8 = 5;
const TYPE_UINT32: u8 = 6;
const TYPE_MAP: u8 = 7;
const TYPE_UINT64: u8 = 9;
const TYPE_ARRAY: u8 = 11;

fn control(type_num: u8, size: usize) -> Vec<u8> {
    assert!(size < 29, "long fields are not needed here");
    if type_num <= TYPE_MAP {
        vec![(type_num << 5) | size as u8]
    } else {
        vec![size as u8, type_num - TYPE_MAP]
    }
}

fn string(s: &str) -> Vec<u8> {
    let mut out = control(TYPE_STRING, s.len());
    out.extend_from_slice(s.as_bytes());
    out
}

fn uint(type_num: u8, value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    let mut out = control(type_num, bytes.len() - skip);
    out.extend_from_slice(&bytes[skip..]);
    out
}

fn map(entries: Vec<(&str, Vec<u8>)>) -> Vec<u8> {
    let mut out = control(TYPE_MAP, entries.len());
    for (key, value) in entries {
        out.extend(string(key));
        out.extend(value);
    }
    out
}

fn array(items: Vec<Vec<u8>>) -> Vec<u8> {
    let mut out = control(TYPE_ARRAY, items.len());
    for item in items {
        out.extend(item);
    }
    out
}

fn asn_record(number: u32, organization: &str) -> Vec<u8> {
    map(vec![
        ("autonomous_system_number", uint(TYPE_UINT32, number.into())),
        ("autonomous_system_organization", string(organization)),
    ])
}

fn test_database(dir: &TempDir) -> AsnDatabase {
    let path = MmdbBuilder::new()
        .network(Ipv4Addr::new(81, 2, 69, 0), 24, asn_record(3215, "Orange"))
        .network(Ipv4Addr::new(198, 51, 100, 0), 24, asn_record(64500, "Documentation"))
        .network(
            Ipv4Addr::new(203, 0, 113, 0),
            24,
            map(vec![("autonomous_system_organization", string("No number"))]),
        )
        .write(dir);

    AsnDatabase::open(path).unwrap()
}

#[test]
fn resolves_asn_for_known_networks() {
    // Arrange
    let dir = tempdir().unwrap();
    let db = test_database(&dir);

    // Act / Assert
    assert_eq!(db.resolve_network_id("81.2.69.142"), Ok(3215));
    assert_eq!(db.resolve_network_id("81.2.69.1"), Ok(3215));
    assert_eq!(db.resolve_network_id("198.51.100.9"), Ok(64500));
}

#[test]
fn address_outside_every_network_is_a_miss() {
    // Arrange
    let dir = tempdir().unwrap();
    let db = test_database(&dir);

    // Act
    let err = db.resolve_network_id("81.2.70.1").unwrap_err();

    // Assert
    assert_eq!(
        err,
        LookupError::LookupMiss {
            address: "81.2.70.1".parse().unwrap(),
            reason: "no matching record".to_string(),
        }
    );
}

#[test]
fn record_without_asn_is_a_miss() {
    let dir = tempdir().unwrap();
    let db = test_database(&dir);

    let err = db.resolve_network_id("203.0.113.7").unwrap_err();

    assert!(
        matches!(err, LookupError::LookupMiss { ref reason, .. } if reason == "no matching record"),
        "{err:?}"
    );
}

#[test]
fn ipv6_address_in_ipv4_database_is_a_miss() {
    let dir = tempdir().unwrap();
    let db = test_database(&dir);

    let err = db.resolve_network_id("2001:db8::1").unwrap_err();

    assert!(matches!(err, LookupError::LookupMiss { .. }), "{err:?}");
}

#[test]
fn invalid_address_never_reaches_the_database() {
    let dir = tempdir().unwrap();
    let db = test_database(&dir);

    assert_eq!(
        db.resolve_network_id("not-an-ip"),
        Err(LookupError::InvalidAddress {
            address: "not-an-ip".to_string()
        })
    );
}
