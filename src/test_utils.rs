#![cfg(test)]

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }
}

/// Shared log of every request a test server has seen.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<RecordedRequest>>>);

impl Recorder {
    fn record(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: Bytes) {
        let headers = headers
            .iter()
            .map(|(key, value)| {
                (
                    key.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        self.0
            .lock()
            .expect("Recorder lock poisoned")
            .push(RecordedRequest {
                method: method.to_string(),
                path: uri.path().to_string(),
                headers,
                body: body.to_vec(),
            });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.0.lock().expect("Recorder lock poisoned").clone()
    }
}

/// Serve `app` on an ephemeral local port.
pub async fn spawn_app(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read listener addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    addr
}

/// Server that answers every request with the same status and body while
/// recording what it received.
pub async fn spawn_canned(status: StatusCode, body: &'static str) -> (SocketAddr, Recorder) {
    spawn_sequence(vec![(status, body)]).await
}

/// Server that walks through `responses` one request at a time, repeating
/// the last entry once the script is exhausted.
pub async fn spawn_sequence(
    responses: Vec<(StatusCode, &'static str)>,
) -> (SocketAddr, Recorder) {
    assert!(!responses.is_empty(), "Response script may not be empty");

    let recorder = Recorder::default();
    let step = Arc::new(Mutex::new(0usize));

    let rec = recorder.clone();
    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
            let rec = rec.clone();
            let step = Arc::clone(&step);
            let responses = responses.clone();
            async move {
                rec.record(method, &uri, &headers, body);

                let mut step = step.lock().expect("Step lock poisoned");
                let (status, body) = responses[(*step).min(responses.len() - 1)];
                *step += 1;
                (status, body)
            }
        },
    );

    let addr = spawn_app(app).await;
    (addr, recorder)
}
