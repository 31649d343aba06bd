#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use gistgrid::{armor, crypto};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const GOOD_TOKEN: &str = "good-token";

/// In-process stand-in for the gists REST API.
#[derive(Clone, Default)]
pub struct FakeGists {
    pub content: Arc<Mutex<Option<String>>>,
    pub last_patch: Arc<Mutex<Option<Value>>>,
    /// Paths of requests that matched no gist route.
    pub strays: Arc<Mutex<Vec<String>>>,
}

impl FakeGists {
    pub fn holding(content: String) -> Self {
        let fake = FakeGists::default();
        *fake.content.lock().unwrap() = Some(content);
        fake
    }

    pub fn content(&self) -> Option<String> {
        self.content.lock().unwrap().clone()
    }

    pub fn last_patch(&self) -> Option<Value> {
        self.last_patch.lock().unwrap().clone()
    }

    pub fn strays(&self) -> Vec<String> {
        self.strays.lock().unwrap().clone()
    }
}

async fn get_gist(State(fake): State<FakeGists>, Path(id): Path<String>) -> Response {
    match (id.as_str(), fake.content()) {
        ("no-file", _) => Json(json!({"id": id, "files": {}})).into_response(),
        ("not-json", _) => "<html>rate limited</html>".into_response(),
        (_, Some(content)) => Json(json!({
            "id": id,
            "files": {"file1.txt": {"filename": "file1.txt", "content": content}}
        }))
        .into_response(),
        (_, None) => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn stray(State(fake): State<FakeGists>, uri: Uri) -> StatusCode {
    fake.strays.lock().unwrap().push(uri.to_string());
    StatusCode::NOT_FOUND
}

async fn patch_gist(
    State(fake): State<FakeGists>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("token {}", GOOD_TOKEN));
    if !authorized {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let content = body["files"]["file1.txt"]["content"]
        .as_str()
        .ok_or(StatusCode::UNPROCESSABLE_ENTITY)?
        .to_owned();
    *fake.content.lock().unwrap() = Some(content);
    *fake.last_patch.lock().unwrap() = Some(body);
    Ok(Json(json!({"id": id})))
}

pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Starts the fake API and returns its gists base URL.
pub async fn spawn_gists(fake: FakeGists) -> String {
    let router = Router::new()
        .route("/gists/{id}", get(get_gist).patch(patch_gist))
        .fallback(stray)
        .with_state(fake);
    let addr = serve(router).await;
    format!("http://{}/gists", addr)
}

pub fn sealed(json: &str, passphrase: &str) -> String {
    armor::encode(&crypto::encrypt(json.as_bytes(), passphrase).unwrap())
}

pub fn unsealed(content: &str, passphrase: &str) -> Value {
    let plain = crypto::decrypt(&armor::decode(content).unwrap(), passphrase).unwrap();
    serde_json::from_slice(&plain).unwrap()
}
