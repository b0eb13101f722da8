//! Prometheus text exposition (format 0.0.4) of the aggregate state.

use crate::metrics::Aggregator;
use prometheus::TextEncoder;

pub use prometheus::TEXT_FORMAT;

pub fn render_text(aggregator: &Aggregator) -> prometheus::Result<String> {
    TextEncoder::new().encode_to_string(&aggregator.registry().gather())
}
