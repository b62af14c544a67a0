use crate::core::engine::SourceReferenceEngine;
use crate::domain::ports::BundleSource;
use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::trace::TraceLayer;

pub const SOURCE_REFERENCES_PATH: &str = "/system/sling/tooling/sourceReferences.json";

/// Shared request state. Engine and container are read-only after
/// construction, so concurrent requests never interfere.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<SourceReferenceEngine>,
    container: Arc<dyn BundleSource>,
}

impl AppState {
    pub fn new(engine: SourceReferenceEngine, container: impl BundleSource + 'static) -> Self {
        Self {
            engine: Arc::new(engine),
            container: Arc::new(container),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(SOURCE_REFERENCES_PATH, get(source_references))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// Streams the report. The blocking engine runs on a worker and its output
/// is forwarded chunk by chunk; a failure mid-run terminates the body with
/// whatever was already on the wire.
async fn source_references(State(state): State<AppState>) -> Response {
    let (tx, rx) = mpsc::channel::<io::Result<Vec<u8>>>(16);

    tokio::task::spawn_blocking(move || {
        let writer = BufWriter::new(ChannelWriter { tx: tx.clone() });
        let bundles = state.container.bundles();
        if let Err(error) = state.engine.write_source_references(writer, &bundles) {
            tracing::error!(error = %error, "Source reference discovery failed");
            let _ = tx.blocking_send(Err(io::Error::other(error.to_string())));
        }
    });

    (
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(ReceiverStream::new(rx)),
    )
        .into_response()
}

struct ChannelWriter {
    tx: mpsc::Sender<io::Result<Vec<u8>>>,
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.tx
            .blocking_send(Ok(buf.to_vec()))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response consumer went away"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
