use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame exceeds {max} bytes")]
    TooLong { max: usize },

    #[error("invalid octet count {0:?}")]
    InvalidLength(String),

    #[error("frame is not valid UTF-8")]
    NotUtf8,

    #[error("connection closed inside an octet-counted frame")]
    Truncated,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing or malformed <PRI> header")]
    MissingPriority,

    #[error("missing hostname")]
    MissingHostname,

    #[error("missing application name")]
    MissingAppName,

    #[error("missing message text")]
    MissingMessage,
}

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to bind syslog listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("syslog accept loop failed: {0}")]
    Accept(#[source] std::io::Error),

    #[error("record channel closed")]
    PipelineClosed,
}
