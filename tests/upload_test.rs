mod common;

use axum::http::StatusCode;
use common::{alice_and_bob, roster_json, write_spreadsheet};
use score_graphs::{Config, FILE_FIELD, FileUpload, UploadClient, UploadError};
use std::time::Duration;

fn client_for(endpoint: &str) -> UploadClient {
    UploadClient::new(&Config {
        endpoint: endpoint.to_string(),
        ..Config::default()
    })
    .unwrap()
}

#[test]
fn default_endpoint_is_local_upload_api() {
    assert_eq!(Config::default().endpoint, "http://localhost:5000/api/upload");
    assert!(Config::default().timeout.is_none());
}

#[test]
fn selection_is_kept_even_without_spreadsheet_extension() {
    let mut upload = FileUpload::new();
    assert!(upload.selected().is_none());

    upload.select("notes.txt");
    assert_eq!(upload.selected().unwrap().to_str(), Some("notes.txt"));

    upload.select("scores.XLSX");
    assert_eq!(upload.selected().unwrap().to_str(), Some("scores.XLSX"));
}

#[tokio::test]
async fn prepare_without_selection_fails() {
    let upload = FileUpload::new();
    assert!(matches!(upload.prepare().await, Err(UploadError::NoFileSelected)));
}

#[tokio::test]
async fn prepare_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut upload = FileUpload::new();
    upload.select(dir.path().join("gone.xlsx"));
    assert!(matches!(upload.prepare().await, Err(UploadError::Read { .. })));
}

#[tokio::test]
async fn posts_file_field_and_decodes_students() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_spreadsheet(dir.path(), "scores.xlsx");
    let (endpoint, received) = common::roster_endpoint(roster_json(&alice_and_bob())).await;

    let mut upload = FileUpload::new();
    upload.select(&path);
    let file = upload.prepare().await.unwrap();
    assert_eq!(file.file_name, "scores.xlsx");

    let students = client_for(&endpoint).upload(&file).await.unwrap();
    assert_eq!(students, alice_and_bob());

    let fields = received.lock().unwrap().clone();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, FILE_FIELD);
    assert_eq!(fields[0].file_name.as_deref(), Some("scores.xlsx"));
    assert_eq!(
        fields[0].content_type.as_deref(),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    );
    assert_eq!(fields[0].bytes, std::fs::read(&path).unwrap());
}

#[tokio::test]
async fn extra_response_fields_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let body = serde_json::json!([
        {"id": "1", "name": "Alice", "tests": [80, 90], "grade": "A"},
    ]);
    let (endpoint, _) = common::roster_endpoint(body).await;

    let mut upload = FileUpload::new();
    upload.select(write_spreadsheet(dir.path(), "scores.xls"));
    let students = client_for(&endpoint)
        .upload(&upload.prepare().await.unwrap())
        .await
        .unwrap();

    assert_eq!(students.len(), 1);
    assert_eq!(students[0].tests, vec![80.0, 90.0]);
}

#[tokio::test]
async fn server_error_status_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = common::fixed_endpoint(StatusCode::INTERNAL_SERVER_ERROR, "parse failed").await;

    let mut upload = FileUpload::new();
    upload.select(write_spreadsheet(dir.path(), "scores.xlsx"));
    let result = client_for(&endpoint)
        .upload(&upload.prepare().await.unwrap())
        .await;

    match result {
        Err(UploadError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "parse failed");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = common::fixed_endpoint(StatusCode::OK, "{\"students\": []}").await;

    let mut upload = FileUpload::new();
    upload.select(write_spreadsheet(dir.path(), "scores.xlsx"));
    let result = client_for(&endpoint)
        .upload(&upload.prepare().await.unwrap())
        .await;

    assert!(matches!(result, Err(UploadError::Decode(_))), "got {:?}", result);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = common::closed_endpoint().await;

    let mut upload = FileUpload::new();
    upload.select(write_spreadsheet(dir.path(), "scores.xlsx"));
    let result = client_for(&endpoint)
        .upload(&upload.prepare().await.unwrap())
        .await;

    assert!(matches!(result, Err(UploadError::Transport(_))), "got {:?}", result);
}

#[tokio::test]
async fn configured_timeout_aborts_slow_upload() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = common::slow_endpoint(Duration::from_secs(5)).await;
    let client = UploadClient::new(&Config {
        endpoint,
        timeout: Some(Duration::from_millis(200)),
        ..Config::default()
    })
    .unwrap();

    let mut upload = FileUpload::new();
    upload.select(write_spreadsheet(dir.path(), "scores.xlsx"));
    let result = client.upload(&upload.prepare().await.unwrap()).await;

    match result {
        Err(UploadError::Transport(e)) => assert!(e.is_timeout(), "not a timeout: {}", e),
        other => panic!("expected timeout, got {:?}", other),
    }
}
