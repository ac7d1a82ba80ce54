use axum::{
    extract::{Path, RawQuery},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use slotbook_common::services::AvailabilityStore;
use slotbook_config::SheetsConfig;
use slotbook_sheets::{SheetsAvailabilityStore, SheetsError};

async fn values_handler(
    Path((sheet_id, _range)): Path<(String, String)>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, String)> {
    if query.is_some() {
        return Err((StatusCode::BAD_REQUEST, "unexpected query string".to_string()));
    }
    let key = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok());
    if key != Some("test-key") {
        return Err((StatusCode::FORBIDDEN, "API key not valid".to_string()));
    }
    if sheet_id != "sheet-1" {
        return Err((StatusCode::NOT_FOUND, "Requested entity was not found.".to_string()));
    }
    Ok(Json(json!({
        "range": "Availability!A1:C3",
        "majorDimension": "ROWS",
        "values": [
            ["Tech", "Finance"],
            ["10AM-12PM", ""],
            ["1PM-3PM", "9AM-11AM"]
        ]
    })))
}

async fn spawn_fake_sheets() -> String {
    let app = Router::new().route(
        "/v4/spreadsheets/{sheet_id}/values/{range}",
        get(values_handler),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v4", addr)
}

fn config(base_url: String, spreadsheet_id: &str, api_key: &str) -> SheetsConfig {
    SheetsConfig {
        spreadsheet_id: spreadsheet_id.to_string(),
        range: "Availability".to_string(),
        api_key: api_key.to_string(),
        base_url: Some(base_url),
    }
}

#[tokio::test]
async fn test_reads_department_column() {
    let base_url = spawn_fake_sheets().await;
    let store = SheetsAvailabilityStore::new(config(base_url, "sheet-1", "test-key")).unwrap();

    let tech = store.get_intervals("tech").await.unwrap();
    assert_eq!(tech, vec!["10AM-12PM", "1PM-3PM"]);

    let finance = store.get_intervals("Finance").await.unwrap();
    assert_eq!(finance, vec!["9AM-11AM"]);

    assert!(store.get_intervals("Legal").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_api_error_is_reported() {
    let base_url = spawn_fake_sheets().await;
    let store = SheetsAvailabilityStore::new(config(base_url, "sheet-1", "wrong")).unwrap();

    match store.get_intervals("Tech").await {
        Err(SheetsError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 403);
            assert!(message.contains("API key not valid"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_request_error() {
    let store = SheetsAvailabilityStore::new(config(
        "http://127.0.0.1:9/v4".to_string(),
        "sheet-1",
        "test-key",
    ))
    .unwrap();

    assert!(matches!(
        store.get_intervals("Tech").await,
        Err(SheetsError::RequestError(_))
    ));
}

#[tokio::test]
async fn test_request_error_does_not_expose_key_or_url() {
    let store = SheetsAvailabilityStore::new(config(
        "http://127.0.0.1:9/v4".to_string(),
        "sheet-1",
        "SUPERSECRETKEY",
    ))
    .unwrap();

    let err = store.get_intervals("Tech").await.unwrap_err();
    let shown = err.to_string();
    assert!(!shown.contains("SUPERSECRETKEY"), "key leaked: {}", shown);
    assert!(!shown.contains("127.0.0.1"), "url leaked: {}", shown);
    assert!(!format!("{:?}", err).contains("SUPERSECRETKEY"));
}
