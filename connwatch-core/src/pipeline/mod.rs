use crate::alias::DeviceAliasTable;
use crate::enrichment::{LookupError, NetworkLookup};
use crate::event::{ConnectionEvent, LabelSet, RawMessageRecord};
use crate::extract::{ExtractError, Extractor};
use crate::metrics::Aggregator;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;


/// What happened to a single record.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Login(LabelSet),
    Logout(LabelSet, f64),
    Ignored,
    Dropped(DropReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    Extract(ExtractError),
    Lookup(LookupError),
}

/// Drives records through extraction, aliasing and enrichment into the aggregator.
///
/// Holds no per-record state; a failure on one record never affects the next.
pub struct Pipeline {
    extractor: Extractor,
    aliases: Arc<DeviceAliasTable>,
    lookup: Arc<dyn NetworkLookup>,
    aggregator: Arc<Aggregator>,
}

impl Pipeline {
    pub fn new(
        extractor: Extractor,
        aliases: Arc<DeviceAliasTable>,
        lookup: Arc<dyn NetworkLookup>,
        aggregator: Arc<Aggregator>,
    ) -> Self {
        Self {
            extractor,
            aliases,
            lookup,
            aggregator,
        }
    }

    /// Drain `records` in arrival order until every sender is gone.
    pub async fn run(self, mut records: UnboundedReceiver<RawMessageRecord>) {
        tracing::info!("pipeline started");

        while let Some(record) = records.recv().await {
            self.process(&record);
        }

        tracing::info!("record channel closed, pipeline stopping");
    }

    pub fn process(&self, record: &RawMessageRecord) -> Outcome {
        let device = self.aliases.resolve(&record.host);

        let event = match self.extractor.extract(record) {
            Ok(ConnectionEvent::Ignored) => return Outcome::Ignored,
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(
                    device,
                    app_tag = %record.app_tag,
                    error = %e,
                    "dropping record with malformed duration"
                );
                return Outcome::Dropped(DropReason::Extract(e));
            }
        };

        let remote_addr = event.remote_addr().unwrap_or_default();
        let network_id = match self.lookup.resolve_network_id(remote_addr) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(
                    device,
                    address = remote_addr,
                    error = %e,
                    "network lookup failed, dropping record"
                );
                return Outcome::Dropped(DropReason::Lookup(e));
            }
        };

        let labels = LabelSet::new(device, record.protocol(), network_id);

        match event {
            ConnectionEvent::Login { .. } => {
                self.aggregator.record_login(&labels);
                tracing::debug!(%labels, "login recorded");
                Outcome::Login(labels)
            }
            ConnectionEvent::Logout {
                duration_seconds, ..
            } => {
                self.aggregator.record_logout(&labels, duration_seconds);
                tracing::debug!(%labels, duration_seconds, "logout recorded");
                Outcome::Logout(labels, duration_seconds)
            }
            ConnectionEvent::Ignored => Outcome::Ignored,
        }
    }
}
