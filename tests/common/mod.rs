#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::Multipart,
    http::StatusCode,
    routing::post,
};
use score_graphs::Student;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const UPLOAD_PATH: &str = "/api/upload";

/// One multipart field as seen by the mock endpoint
#[derive(Clone, Debug)]
pub struct ReceivedField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

pub type Received = Arc<Mutex<Vec<ReceivedField>>>;

// Serves a router on an ephemeral port and returns the upload URL
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}{}", addr, UPLOAD_PATH)
}

// Endpoint that records every multipart field and answers with `body`
pub async fn roster_endpoint(body: serde_json::Value) -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let store = Arc::clone(&received);

    let router = Router::new().route(
        UPLOAD_PATH,
        post(move |mut multipart: Multipart| {
            let store = Arc::clone(&store);
            let body = body.clone();
            async move {
                while let Some(field) = multipart.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_string();
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.unwrap().to_vec();
                    store.lock().unwrap().push(ReceivedField {
                        name,
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                Json(body)
            }
        }),
    );

    (serve(router).await, received)
}

// Endpoint that always answers with a fixed status and raw body
pub async fn fixed_endpoint(status: StatusCode, body: &'static str) -> String {
    let router = Router::new().route(UPLOAD_PATH, post(move || async move { (status, body) }));
    serve(router).await
}

// Endpoint that waits `delay` before answering with an empty roster
pub async fn slow_endpoint(delay: std::time::Duration) -> String {
    let router = Router::new().route(
        UPLOAD_PATH,
        post(move || async move {
            tokio::time::sleep(delay).await;
            Json(serde_json::json!([]))
        }),
    );
    serve(router).await
}

// URL on which nothing is listening
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, UPLOAD_PATH)
}

pub fn alice_and_bob() -> Vec<Student> {
    vec![
        Student::new("1", "Alice", vec![80.0, 90.0]),
        Student::new("2", "Bob", vec![70.0]),
    ]
}

pub fn roster_json(students: &[Student]) -> serde_json::Value {
    serde_json::to_value(students).unwrap()
}

// Writes a stand-in spreadsheet; the mock endpoint never parses it
pub fn write_spreadsheet(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"PK\x03\x04 not really a workbook").unwrap();
    path
}
