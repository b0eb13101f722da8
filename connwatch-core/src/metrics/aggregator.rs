use crate::event::LabelSet;
use prometheus::core::Collector;
use prometheus::proto::Metric;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

pub const LOGIN_METRIC: &str = "mikrotik_conn_logins";
pub const SESSION_DURATION_METRIC: &str = "mikrotik_conn_session_duration_seconds";

/// Upper bounds, in seconds, from one second up to two days.
pub const SESSION_DURATION_BUCKETS: &[f64] = &[
    1.0, 10.0, 60.0, 120.0, 300.0, 600.0, 900.0, 1800.0, 3600.0, 7200.0, 14400.0, 28800.0,
    57600.0, 86400.0, 129600.0, 172800.0,
];

const LABEL_NAMES: &[&str] = &["device", "protocol", "asn"];

/// Process-wide connection metrics.
///
/// Shared by the pipeline (writer) and the exporter (reader). Each instance
/// owns its registry, so independent aggregators never see each other's
/// series. Every label combination gets its own series on first use and
/// keeps it for the life of the process.
pub struct Aggregator {
    registry: Registry,

    /// Login counters (hot path)
    logins: IntCounterVec,

    /// Session durations reported at logout
    logout_durations: HistogramVec,
}

impl Aggregator {
    pub fn new() -> prometheus::Result<Self> {
        Self::with_buckets(SESSION_DURATION_BUCKETS)
    }

    pub fn with_buckets(duration_buckets: &[f64]) -> prometheus::Result<Self> {
        let registry = Registry::new();

        let logins = IntCounterVec::new(
            Opts::new(LOGIN_METRIC, "Number of VPN logins."),
            LABEL_NAMES,
        )?;
        let logout_durations = HistogramVec::new(
            HistogramOpts::new(
                SESSION_DURATION_METRIC,
                "Duration of VPN sessions reported at logout.",
            )
            .buckets(duration_buckets.to_vec()),
            LABEL_NAMES,
        )?;

        registry.register(Box::new(logins.clone()))?;
        registry.register(Box::new(logout_durations.clone()))?;

        Ok(Self {
            registry,
            logins,
            logout_durations,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_login(&self, labels: &LabelSet) {
        self.logins.with_label_values(&label_values(labels)).inc();
    }

    pub fn record_logout(&self, labels: &LabelSet, duration_seconds: f64) {
        self.logout_durations
            .with_label_values(&label_values(labels))
            .observe(duration_seconds);
    }

    // Reads go through `collect` so that asking about an unseen label set
    // never creates an empty series.

    pub fn login_count(&self, labels: &LabelSet) -> u64 {
        self.logins()
            .into_iter()
            .find(|(l, _)| l == labels)
            .map_or(0, |(_, count)| count)
    }

    pub fn logout_duration(&self, labels: &LabelSet) -> Option<HistogramSnapshot> {
        self.logout_durations()
            .into_iter()
            .find(|(l, _)| l == labels)
            .map(|(_, snapshot)| snapshot)
    }

    /// All login series, sorted by labels.
    pub fn logins(&self) -> Vec<(LabelSet, u64)> {
        let mut out: Vec<_> = self
            .logins
            .collect()
            .iter()
            .flat_map(|family| family.get_metric())
            .map(|m| (label_set(m), m.get_counter().get_value() as u64))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// All session duration series, sorted by labels.
    pub fn logout_durations(&self) -> Vec<(LabelSet, HistogramSnapshot)> {
        let mut out: Vec<_> = self
            .logout_durations
            .collect()
            .iter()
            .flat_map(|family| family.get_metric())
            .map(|m| (label_set(m), HistogramSnapshot::from_metric(m)))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

/// Point-in-time copy of one duration series with cumulative bucket counts.
///
/// The implicit `+Inf` bucket equals `count`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    pub buckets: Vec<(f64, u64)>,
    pub sum: f64,
    pub count: u64,
}

impl HistogramSnapshot {
    fn from_metric(metric: &Metric) -> Self {
        let h = metric.get_histogram();
        Self {
            buckets: h
                .get_bucket()
                .iter()
                .map(|b| (b.get_upper_bound(), b.get_cumulative_count()))
                .collect(),
            sum: h.get_sample_sum(),
            count: h.get_sample_count(),
        }
    }
}

fn label_values(labels: &LabelSet) -> [&str; 3] {
    [
        labels.device.as_str(),
        labels.protocol.as_str(),
        labels.network_id.as_str(),
    ]
}

fn label_set(metric: &Metric) -> LabelSet {
    let mut labels = LabelSet::default();
    for pair in metric.get_label() {
        let value = pair.get_value().to_string();
        match pair.get_name() {
            "device" => labels.device = value,
            "protocol" => labels.protocol = value,
            "asn" => labels.network_id = value,
            _ => {}
        }
    }
    labels
}
