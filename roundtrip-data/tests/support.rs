//! Local `axum` server answering geocoding queries with canned responses.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::sync::oneshot;

/// Canned reply: HTTP status and JSON body.
pub type Reply = (u16, String);

type Handler = dyn Fn(&str) -> Reply + Send + Sync;

/// A request as seen by the server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path and raw query string, e.g. `/search?q=...&format=json&limit=1`.
    pub target: String,
    /// Value of the `User-Agent` header, if sent.
    pub user_agent: Option<String>,
}

struct Shared {
    handler: Box<Handler>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Server mapping the `q` parameter of each `/search` request to a reply.
///
/// The server runs on its own Tokio runtime thread and stops when dropped.
pub struct CannedServer {
    base_url: String,
    shared: Arc<Shared>,
    _shutdown: oneshot::Sender<()>,
}

impl CannedServer {
    /// Bind to an ephemeral port and start serving.
    ///
    /// `handler` runs on Tokio's blocking pool, so it may sleep to simulate
    /// slow responses without stalling other connections.
    pub fn start(handler: impl Fn(&str) -> Reply + Send + Sync + 'static) -> Self {
        let shared = Arc::new(Shared {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        });
        let (ready_tx, ready_rx) = mpsc::channel::<SocketAddr>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let state = Arc::clone(&shared);
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .expect("server runtime should build");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind stub server");
                let address = listener.local_addr().expect("stub server address");
                ready_tx.send(address).expect("report server address");

                let app = Router::new()
                    .route("/search", get(search))
                    .with_state(state);
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        // A dropped sender also ends the server.
                        shutdown_rx.await.ok();
                    })
                    .await
                    .expect("stub server should run");
            });
        });

        let address = ready_rx.recv().expect("stub server should start");
        Self {
            base_url: format!("http://{address}"),
            shared,
            _shutdown: shutdown_tx,
        }
    }

    /// Base URL to configure the geocoder with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().expect("request log").clone()
    }
}

async fn search(
    State(shared): State<Arc<Shared>>,
    Query(params): Query<HashMap<String, String>>,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_owned(), |pq| pq.as_str().to_owned());
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    shared
        .requests
        .lock()
        .expect("request log")
        .push(RecordedRequest { target, user_agent });

    let query = params.get("q").cloned().unwrap_or_default();
    let responder = Arc::clone(&shared);
    let (status, body) = tokio::task::spawn_blocking(move || (responder.handler)(&query))
        .await
        .expect("handler should not panic");

    (
        StatusCode::from_u16(status).expect("valid status code"),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

/// A one-hit Nominatim search body.
pub fn hit(latitude: f64, longitude: f64) -> String {
    format!(r#"[{{"lat": "{latitude}", "lon": "{longitude}", "display_name": "stub"}}]"#)
}
