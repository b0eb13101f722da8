use crate::syslog::ListenerError;
use thiserror::Error;

/// Reasons the ingest side stopped. All of them are fatal.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("syslog listener stopped: {0}")]
    Listener(#[from] ListenerError),

    #[error("syslog listener exited unexpectedly")]
    ListenerExited,

    #[error("pipeline task exited unexpectedly")]
    PipelineExited,

    #[error("background task panicked: {0}")]
    Panicked(String),
}
