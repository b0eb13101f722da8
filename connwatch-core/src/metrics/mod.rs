mod aggregator;
mod exposition;


pub use aggregator::{
    Aggregator, HistogramSnapshot, LOGIN_METRIC, SESSION_DURATION_BUCKETS, SESSION_DURATION_METRIC,
};
pub use exposition::{TEXT_FORMAT, render_text};
