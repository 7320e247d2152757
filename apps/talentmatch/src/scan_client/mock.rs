//! In-process stand-in for the ranking service, used by tests.
//! Records every multipart call and answers with a canned status and body.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};

#[derive(Debug, Clone)]
pub struct CapturedFile {
    pub field: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct CapturedScan {
    pub content_type: Option<String>,
    pub text_fields: Vec<(String, String)>,
    pub files: Vec<CapturedFile>,
}

impl CapturedScan {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text_fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
struct MockState {
    calls: Arc<Mutex<Vec<CapturedScan>>>,
    status: StatusCode,
    body: String,
}

pub struct MockRankingService {
    /// Base URL to configure the client with; the mock serves `{base_url}/scan/pdf`.
    pub base_url: String,
    calls: Arc<Mutex<Vec<CapturedScan>>>,
}

impl MockRankingService {
    pub async fn start(status: u16, body: String) -> Self {
        let status = StatusCode::from_u16(status).expect("valid mock status");
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            calls: calls.clone(),
            status,
            body,
        };

        let app = Router::new()
            .route("/api/v1/scan/pdf", post(handle_scan))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock ranking service");
        let addr = listener.local_addr().expect("mock address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            calls,
        }
    }

    pub fn calls(&self) -> Vec<CapturedScan> {
        self.calls.lock().expect("mock calls lock").clone()
    }
}

async fn handle_scan(
    State(state): State<MockState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let mut captured = CapturedScan {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ..Default::default()
    };

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
                captured.files.push(CapturedFile {
                    field: name,
                    file_name,
                    content,
                });
            }
            None => {
                let value = field.text().await.unwrap_or_default();
                captured.text_fields.push((name, value));
            }
        }
    }

    state.calls.lock().expect("mock calls lock").push(captured);

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}
