use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

/// Request counters shared with the stub server.
#[derive(Clone, Default)]
pub struct Hits {
    pub catalog: Arc<AtomicUsize>,
    pub images: Arc<AtomicUsize>,
}

impl Hits {
    pub fn images(&self) -> usize {
        self.images.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct StubState {
    catalog_status: StatusCode,
    catalog_body: String,
    hits: Hits,
}

/// Bytes served for every image that exists on the stub.
pub const IMAGE_BYTES: &[u8] = b"\xFF\xD8\xFFfake-jpeg-payload";

async fn catalog(State(state): State<StubState>) -> impl IntoResponse {
    state.hits.catalog.fetch_add(1, Ordering::SeqCst);
    (state.catalog_status, state.catalog_body.clone())
}

async fn image(State(state): State<StubState>, Path(path): Path<String>) -> impl IntoResponse {
    state.hits.images.fetch_add(1, Ordering::SeqCst);
    if path.contains("missing") {
        (StatusCode::NOT_FOUND, Vec::new())
    } else {
        (StatusCode::OK, IMAGE_BYTES.to_vec())
    }
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "[]"
}

/// Serve a stub catalog source on an ephemeral port.
///
/// `GET /catalog.json` returns `catalog_body` with `catalog_status`,
/// `GET /img/*` returns [`IMAGE_BYTES`] unless the path contains `missing`,
/// `GET /slow` answers after five seconds.
pub async fn spawn_stub(catalog_status: StatusCode, catalog_body: &str) -> (SocketAddr, Hits) {
    let hits = Hits::default();
    let state = StubState {
        catalog_status,
        catalog_body: catalog_body.to_string(),
        hits: hits.clone(),
    };
    let app = Router::new()
        .route("/catalog.json", get(catalog))
        .route("/img/{*path}", get(image))
        .route("/slow", get(slow))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, hits)
}
