use crate::harness::{StaticLookup, events, init_test_tracing};
use connwatch_core::alias::DeviceAliasTable;
use connwatch_core::extract::Extractor;
use connwatch_core::metrics::Aggregator;
use connwatch_core::pipeline::Pipeline;
use connwatch_core::server::{Ingest, start_ingest};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::{Instant, sleep};

/// Syslog intake + pipeline running on an ephemeral port with a stub ASN lookup.
pub struct TestIngest {
    addr: SocketAddr,
    aggregator: Arc<Aggregator>,
    _ingest: Ingest,
}

impl TestIngest {
    /// Must be called from a multi-threaded Tokio test.
    pub async fn start(aliases: &[(&str, &str)], lookup: StaticLookup) -> Self {
        // Initialize tracing (this must happen first).
        init_test_tracing(events());

        let aggregator = Arc::new(Aggregator::new().expect("failed to build metrics registry"));
        let pipeline = Pipeline::new(
            Extractor::default(),
            Arc::new(DeviceAliasTable::new(aliases.iter().copied())),
            Arc::new(lookup),
            aggregator.clone(),
        );

        let ingest = start_ingest("127.0.0.1:0", pipeline)
            .await
            .expect("failed to start ingest");

        Self {
            addr: ingest.local_addr(),
            aggregator,
            _ingest: ingest,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Open a connection, write `bytes`, and close it.
    pub async fn send(&self, bytes: &[u8]) {
        send_to(self.addr, bytes).await;
    }

    /// Send each line LF-terminated on one connection.
    pub async fn send_lines(&self, lines: &[&str]) {
        let mut buf = String::new();
        for line in lines {
            buf.push_str(line);
            buf.push('\n');
        }
        self.send(buf.as_bytes()).await;
    }

    /// Poll until `cond` holds (or panic).
    pub async fn wait_until(&self, what: &str, cond: impl Fn(&Aggregator) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);

        while !cond(&self.aggregator) {
            if Instant::now() > deadline {
                panic!("timed out waiting for {what}");
            }
            sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Open a connection to `addr`, write `bytes`, and close it.
pub async fn send_to(addr: SocketAddr, bytes: &[u8]) {
    let mut stream = TcpStream::connect(addr)
        .await
        .expect("failed to connect to syslog listener");
    stream.write_all(bytes).await.expect("write failed");
    stream.shutdown().await.expect("shutdown failed");
}
