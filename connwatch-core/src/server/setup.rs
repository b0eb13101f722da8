use crate::alias::DeviceAliasTable;
use crate::conf::ConnwatchConfig;
use crate::enrichment::{AsnDatabase, NetworkLookup};
use crate::exporter::metrics_service;
use crate::extract::Extractor;
use crate::metrics::Aggregator;
use crate::pipeline::Pipeline;
use crate::server::start_ingest;
use anyhow::{Context, Result};
use pingora::server::Server;
use std::sync::Arc;

/// Everything the pipeline and the exporter share for the life of the process.
pub struct RuntimeState {
    pub extractor: Extractor,
    pub aliases: Arc<DeviceAliasTable>,
    pub lookup: Arc<dyn NetworkLookup>,
    pub aggregator: Arc<Aggregator>,
}

impl RuntimeState {
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(
            self.extractor.clone(),
            self.aliases.clone(),
            self.lookup.clone(),
            self.aggregator.clone(),
        )
    }
}

pub fn build_runtime_state(cfg: &ConnwatchConfig) -> Result<RuntimeState> {
    let lookup = AsnDatabase::open(&cfg.enrichment.asn_db)?;

    let aliases = DeviceAliasTable::new(
        cfg.devices
            .iter()
            .map(|d| (d.host.clone(), d.name.clone())),
    );

    tracing::info!(
        devices = aliases.len(),
        protocols = ?cfg.protocols,
        "runtime state built"
    );

    Ok(RuntimeState {
        extractor: Extractor::new(cfg.protocols.iter().cloned()),
        aliases: Arc::new(aliases),
        lookup: Arc::new(lookup),
        aggregator: Arc::new(Aggregator::new().context("failed to build metrics registry")?),
    })
}

/// Start intake, pipeline and the metrics endpoint. Never returns on success.
pub fn run(cfg: ConnwatchConfig) -> Result<()> {
    use tokio::runtime::Builder;

    let state = build_runtime_state(&cfg)?;

    // Pingora binds lazily inside run_forever; fail before anything starts instead.
    // Losing the port between this probe and pingora's own bind panics the service
    // thread, which aborts the process (both binary profiles set panic = "abort").
    std::net::TcpListener::bind(&cfg.metrics.listen)
        .with_context(|| format!("failed to bind metrics listener on {}", cfg.metrics.listen))?;

    // Ingest runtime (syslog listener + pipeline)
    let ingest_rt = Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("connwatch-ingest")
        .enable_all()
        .build()
        .context("failed to build ingest Tokio runtime")?;

    let ingest = ingest_rt.block_on(start_ingest(&cfg.ingest.listen, state.pipeline()))?;
    tracing::info!(addr = %ingest.local_addr(), "syslog intake listening");

    ingest_rt.spawn(async move {
        let reason = ingest.supervise().await;
        tracing::error!(error = %reason, "ingest stopped, shutting down");
        std::process::exit(1);
    });

    // Pingora owns its own runtimes for the metrics endpoint.
    let mut server = Server::new(None)?;
    server.bootstrap();
    server.add_service(metrics_service(&cfg.metrics.listen, state.aggregator.clone()));
    tracing::info!(addr = %cfg.metrics.listen, "metrics endpoint configured");

    // ingest_rt must stay in scope so its workers keep running.
    server.run_forever();
}

#[cfg(test)]
mod tests {
    const WORKSPACE_MANIFEST: &str = include_str!("../../../Cargo.toml");

    fn profile_setting(profile: &str, key: &str) -> Option<&'static str> {
        let header = format!("[profile.{profile}]");
        WORKSPACE_MANIFEST
            .lines()
            .skip_while(|l| l.trim() != header)
            .skip(1)
            .take_while(|l| !l.trim_start().starts_with('['))
            .filter_map(|l| l.split('#').next())
            .filter_map(|l| l.split_once('='))
            .find(|(k, _)| k.trim() == key)
            .map(|(_, v)| v.trim().trim_matches('"'))
    }

    #[test]
    fn service_panics_abort_in_every_binary_profile() {
        // A panic in the metrics service thread must not leave intake running alone.
        for profile in ["dev", "release"] {
            assert_eq!(profile_setting(profile, "panic"), Some("abort"), "{profile}");
        }
    }
}
