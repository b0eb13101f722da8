use crate::event::{ConnectionEvent, RawMessageRecord};
use crate::extract::ExtractError;
use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// Protocols watched when the configuration does not name any.
pub const DEFAULT_PROTOCOLS: &[&str] = &["ovpn", "sstp"];

static LOGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+ logged in, \S+ from (\S+)").expect("valid login pattern"));

// The duration is captured loosely so a garbled value surfaces as an error
// instead of silently failing the match.
static LOGOUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\S+ logged out, (\S+) \d+ \d+ \d+ \d+ from (\S+)")
        .expect("valid logout pattern")
});

/// Classifies raw router messages into connection events.
#[derive(Debug, Clone)]
pub struct Extractor {
    protocols: AHashSet<String>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_PROTOCOLS.iter().copied())
    }
}

impl Extractor {
    pub fn new<I, S>(protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            protocols: protocols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_monitored(&self, protocol: &str) -> bool {
        self.protocols.contains(protocol)
    }

    /// Returns `Ignored` for unmonitored protocols and unknown message shapes.
    pub fn extract(&self, record: &RawMessageRecord) -> Result<ConnectionEvent, ExtractError> {
        if !self.is_monitored(record.protocol()) {
            return Ok(ConnectionEvent::Ignored);
        }

        if let Some(caps) = LOGIN_RE.captures(&record.message) {
            return Ok(ConnectionEvent::Login {
                remote_addr: caps[1].to_string(),
            });
        }

        if let Some(caps) = LOGOUT_RE.captures(&record.message) {
            let remote_addr = caps[2].to_string();
            let duration_seconds = parse_duration(&caps[1]).ok_or_else(|| {
                ExtractError::MalformedDuration {
                    value: caps[1].to_string(),
                    remote_addr: remote_addr.clone(),
                }
            })?;

            return Ok(ConnectionEvent::Logout {
                duration_seconds,
                remote_addr,
            });
        }

        Ok(ConnectionEvent::Ignored)
    }
}

// f64's parser accepts "inf" and "NaN"; neither is a session length.
fn parse_duration(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}
