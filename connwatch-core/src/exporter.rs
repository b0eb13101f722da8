use crate::metrics::{Aggregator, TEXT_FORMAT, render_text};
use async_trait::async_trait;
use http::{Response, StatusCode, header};
use pingora::apps::http_app::ServeHttp;
use pingora::protocols::http::ServerSession;
use pingora::services::listening::Service;
use std::sync::Arc;

pub const METRICS_PATH: &str = "/metrics";

/// Serves the aggregate state to Prometheus scrapers.
pub struct MetricsApp {
    aggregator: Arc<Aggregator>,
}

impl MetricsApp {
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self { aggregator }
    }

    pub fn respond(&self, path: &str) -> Response<Vec<u8>> {
        match path {
            METRICS_PATH => match render_text(&self.aggregator) {
                Ok(text) => build_response(StatusCode::OK, TEXT_FORMAT, text.into_bytes()),
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode metrics");
                    build_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "text/plain",
                        b"failed to encode metrics\n".to_vec(),
                    )
                }
            },
            _ => build_response(
                StatusCode::NOT_FOUND,
                "text/plain",
                b"not found\n".to_vec(),
            ),
        }
    }
}

#[async_trait]
impl ServeHttp for MetricsApp {
    async fn response(&self, http_session: &mut ServerSession) -> Response<Vec<u8>> {
        let path = http_session.req_header().uri.path().to_string();
        self.respond(&path)
    }
}

/// Pingora listening service exposing `/metrics` on `listen`.
pub fn metrics_service(listen: &str, aggregator: Arc<Aggregator>) -> Service<MetricsApp> {
    let mut svc = Service::new("connwatch metrics".to_string(), MetricsApp::new(aggregator));
    svc.add_tcp(listen);
    svc
}

fn build_response(status: StatusCode, content_type: &str, body: Vec<u8>) -> Response<Vec<u8>> {
    let len = body.len();
    let mut resp = Response::new(body);
    *resp.status_mut() = status;

    let headers = resp.headers_mut();
    if let Ok(v) = content_type.parse() {
        headers.insert(header::CONTENT_TYPE, v);
    }
    headers.insert(header::CONTENT_LENGTH, len.into());

    resp
}
