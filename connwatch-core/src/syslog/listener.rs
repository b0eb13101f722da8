use crate::event::RawMessageRecord;
use crate::syslog::{FrameReader, ListenerError, decode};
use std::io::ErrorKind;
use std::net::SocketAddr;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::UnboundedSender;

/// Accepts syslog-over-TCP connections and forwards decoded records.
pub struct SyslogListener {
    listener: TcpListener,
    records: UnboundedSender<RawMessageRecord>,
}

impl SyslogListener {
    pub async fn bind(
        addr: &str,
        records: UnboundedSender<RawMessageRecord>,
    ) -> Result<Self, ListenerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ListenerError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self { listener, records })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. Only returns when the listener can no longer make progress.
    pub async fn run(self) -> Result<(), ListenerError> {
        tracing::info!(addr = ?self.listener.local_addr().ok(), "syslog listener started");

        loop {
            if self.records.is_closed() {
                return Err(ListenerError::PipelineClosed);
            }

            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    tracing::debug!(%peer, "syslog connection accepted");
                    let records = self.records.clone();
                    tokio::spawn(handle_connection(stream, peer, records));
                }
                Err(e) if is_transient(&e) => {
                    tracing::warn!(error = %e, "failed to accept syslog connection");
                }
                Err(e) => return Err(ListenerError::Accept(e)),
            }
        }
    }
}

// Errors tied to one incoming connection rather than the listening socket.
fn is_transient(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::ConnectionAborted | ErrorKind::ConnectionReset | ErrorKind::Interrupted
    )
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    records: UnboundedSender<RawMessageRecord>,
) {
    let mut frames = FrameReader::new(BufReader::new(stream));

    loop {
        let frame = match frames.next_frame().await {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(%peer, error = %e, "closing syslog connection");
                break;
            }
        };

        let record = match decode(&frame) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(%peer, error = %e, frame = %frame, "dropping undecodable syslog message");
                continue;
            }
        };

        if records.send(record).is_err() {
            tracing::warn!(%peer, "record channel closed, dropping connection");
            break;
        }
    }

    tracing::debug!(%peer, "syslog connection closed");
}
