use ahash::AHashMap;

/// Static host -> display name table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct DeviceAliasTable {
    names: AHashMap<String, String>,
}

impl DeviceAliasTable {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(host, name)| (host.into(), name.into()))
                .collect(),
        }
    }

    /// Returns the configured alias, or `host` itself when none exists.
    pub fn resolve<'a>(&'a self, host: &'a str) -> &'a str {
        self.names.get(host).map(String::as_str).unwrap_or(host)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_host_resolves_to_alias() {
        let table = DeviceAliasTable::new([("10.11.12.13", "router1"), ("10.0.0.1", "core")]);

        assert_eq!(table.resolve("10.11.12.13"), "router1");
        assert_eq!(table.resolve("10.0.0.1"), "core");
    }

    #[test]
    fn unknown_host_passes_through() {
        let table = DeviceAliasTable::new([("10.11.12.13", "router1")]);

        assert_eq!(table.resolve("10.11.12.14"), "10.11.12.14");
        assert_eq!(table.resolve("MikroTik"), "MikroTik");
    }

    #[test]
    fn empty_table_passes_everything_through() {
        let table = DeviceAliasTable::default();

        assert!(table.is_empty());
        assert_eq!(table.resolve("router1"), "router1");
    }
}
