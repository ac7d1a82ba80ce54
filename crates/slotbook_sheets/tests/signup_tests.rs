use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use slotbook_common::services::SignupSheet;
use slotbook_config::IntakeConfig;
use slotbook_sheets::{SheetsError, SheetsSignupSheet, StaticToken};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeSheet {
    writes: Mutex<Vec<(String, Value)>>,
}

type Shared = Arc<FakeSheet>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer test-token")
}

async fn read_values(
    Path((_sheet_id, range)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Request had invalid authentication credentials.".into(),
        ));
    }
    let header = json!([
        "Timestamp",
        "What is your name?",
        "What is your email?",
        "Automated Email Sent"
    ]);
    if range == "'Form Responses 1'!1:1" {
        return Ok(Json(json!({ "range": range, "values": [header] })));
    }
    if range != "'Form Responses 1'" {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Unable to parse range: {}", range),
        ));
    }
    Ok(Json(json!({
        "range": "'Form Responses 1'!A1:D3",
        "majorDimension": "ROWS",
        "values": [
            header,
            ["1/2/2025 10:00:00", "jane doe", "jane@example.com", "Yes"],
            ["1/3/2025 11:00:00", "sam lee", "sam@example.com"]
        ]
    })))
}

async fn write_values(
    State(sheet): State<Shared>,
    Path((_sheet_id, range)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, "unauthorized".into()));
    }
    if params.get("valueInputOption").map(String::as_str) != Some("RAW") {
        return Err((StatusCode::BAD_REQUEST, "valueInputOption required".into()));
    }
    sheet.writes.lock().unwrap().push((range.clone(), body));
    Ok(Json(json!({ "updatedRange": range, "updatedCells": 1 })))
}

async fn spawn_fake_sheet() -> (String, Shared) {
    let sheet = Shared::default();
    let app = Router::new()
        .route(
            "/v4/spreadsheets/{sheet_id}/values/{range}",
            get(read_values).put(write_values),
        )
        .with_state(sheet.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/v4", addr), sheet)
}

fn intake_config(base_url: String) -> IntakeConfig {
    IntakeConfig {
        spreadsheet_id: "sheet-1".to_string(),
        base_url: Some(base_url),
        ..IntakeConfig::default()
    }
}

#[tokio::test]
async fn test_reads_rows_keyed_by_header() {
    let (base_url, _) = spawn_fake_sheet().await;
    let sheet =
        SheetsSignupSheet::new(&intake_config(base_url), StaticToken("test-token".into())).unwrap();

    let rows = sheet.read_rows().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].row, 2);
    assert_eq!(rows[0].get("Automated Email Sent"), "Yes");
    assert_eq!(rows[1].row, 3);
    assert_eq!(rows[1].get("What is your name?"), "sam lee");
    assert_eq!(rows[1].get("Automated Email Sent"), "");
}

#[tokio::test]
async fn test_marks_cell_in_header_column() {
    let (base_url, fake) = spawn_fake_sheet().await;
    let sheet =
        SheetsSignupSheet::new(&intake_config(base_url), StaticToken("test-token".into())).unwrap();

    sheet
        .update_cell(3, "Automated Email Sent", "Yes")
        .await
        .unwrap();

    let writes = fake.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "'Form Responses 1'!D3");
    assert_eq!(writes[0].1, json!({ "values": [["Yes"]] }));
}

#[tokio::test]
async fn test_unknown_column_is_not_written() {
    let (base_url, fake) = spawn_fake_sheet().await;
    let sheet =
        SheetsSignupSheet::new(&intake_config(base_url), StaticToken("test-token".into())).unwrap();

    let result = sheet.update_cell(3, "Interview Booked", "Yes").await;
    assert!(
        matches!(result, Err(SheetsError::ColumnNotFound(col)) if col == "Interview Booked")
    );
    assert!(fake.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_token_is_api_error() {
    let (base_url, _) = spawn_fake_sheet().await;
    let sheet =
        SheetsSignupSheet::new(&intake_config(base_url), StaticToken("expired".into())).unwrap();

    match sheet.read_rows().await {
        Err(SheetsError::ApiError { status_code, .. }) => assert_eq!(status_code, 401),
        other => panic!("expected ApiError, got {:?}", other),
    }
}
