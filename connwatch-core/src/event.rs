use std::fmt;

/// One decoded log line as handed over by the intake listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessageRecord {
    pub host: String,
    pub app_tag: String,
    pub message: String,
}

impl RawMessageRecord {
    pub fn new(
        host: impl Into<String>,
        app_tag: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            app_tag: app_tag.into(),
            message: message.into(),
        }
    }

    /// First comma-delimited token of the application tag (`"ovpn,info"` -> `"ovpn"`).
    pub fn protocol(&self) -> &str {
        self.app_tag.split(',').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    Login {
        remote_addr: String,
    },
    Logout {
        duration_seconds: f64,
        remote_addr: String,
    },
    Ignored,
}

impl ConnectionEvent {
    pub fn remote_addr(&self) -> Option<&str> {
        match self {
            ConnectionEvent::Login { remote_addr }
            | ConnectionEvent::Logout { remote_addr, .. } => Some(remote_addr),
            ConnectionEvent::Ignored => None,
        }
    }
}

/// Aggregation key shared by every connection metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelSet {
    pub device: String,
    pub protocol: String,
    pub network_id: String,
}

impl LabelSet {
    pub fn new(device: impl Into<String>, protocol: impl Into<String>, network_id: u32) -> Self {
        Self {
            device: device.into(),
            protocol: protocol.into(),
            network_id: network_id.to_string(),
        }
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "device={} protocol={} asn={}",
            self.device, self.protocol, self.network_id
        )
    }
}
