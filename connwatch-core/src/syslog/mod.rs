//! Syslog intake over TCP (RFC 6587 framing, RFC 3164 / RFC 5424 headers).

mod error;
mod framing;
mod listener;
mod parse;

pub use error::{DecodeError, FrameError, ListenerError};
pub use framing::{FrameReader, MAX_FRAME_LEN};
pub use listener::SyslogListener;
pub use parse::decode;
