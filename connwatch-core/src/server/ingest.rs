use crate::event::RawMessageRecord;
use crate::pipeline::Pipeline;
use crate::server::ServerError;
use crate::syslog::{ListenerError, SyslogListener};
use std::net::SocketAddr;
use tokio::sync::mpsc::unbounded_channel;
use tokio::task::{JoinError, JoinHandle};

/// Running syslog listener and the pipeline task draining it.
pub struct Ingest {
    local_addr: SocketAddr,
    listener: JoinHandle<Result<(), ListenerError>>,
    pipeline: JoinHandle<()>,
}

/// Bind the syslog listener and spawn it together with the pipeline consumer.
///
/// Must be called from within a Tokio runtime.
pub async fn start_ingest(listen: &str, pipeline: Pipeline) -> Result<Ingest, ListenerError> {
    let (tx, rx) = unbounded_channel::<RawMessageRecord>();

    let listener = SyslogListener::bind(listen, tx).await?;
    let local_addr = listener.local_addr().map_err(|source| ListenerError::Bind {
        addr: listen.to_string(),
        source,
    })?;

    Ok(Ingest {
        local_addr,
        listener: tokio::spawn(listener.run()),
        pipeline: tokio::spawn(pipeline.run(rx)),
    })
}

impl Ingest {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait until either task stops. Neither is supposed to, so the result is
    /// always the reason the process has to go down.
    pub async fn supervise(self) -> ServerError {
        let Ingest {
            listener, pipeline, ..
        } = self;

        tokio::select! {
            res = listener => match res {
                Ok(Ok(())) => ServerError::ListenerExited,
                Ok(Err(e)) => ServerError::Listener(e),
                Err(e) => panicked(e),
            },
            res = pipeline => match res {
                Ok(()) => ServerError::PipelineExited,
                Err(e) => panicked(e),
            },
        }
    }
}

fn panicked(e: JoinError) -> ServerError {
    ServerError::Panicked(e.to_string())
}
