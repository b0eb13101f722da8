use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("could not parse session duration {value:?} from {remote_addr}")]
    MalformedDuration { value: String, remote_addr: String },
}
