mod error;
mod ingest;
mod setup;

pub use error::ServerError;
pub use ingest::{Ingest, start_ingest};
pub use setup::{RuntimeState, build_runtime_state, run};
