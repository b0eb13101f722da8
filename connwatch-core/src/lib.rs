pub mod alias;
pub mod cli;
pub mod conf;
pub mod enrichment;
pub mod event;
pub mod exporter;
pub mod extract;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod server;
pub mod syslog;
