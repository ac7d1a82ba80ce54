//! Availability ranges kept in a Google Sheet.
//!
//! The sheet has one column per department: the first row holds department names and the
//! cells below list that department's ranges, e.g. `10AM-6PM`. Blank cells are ignored.

use reqwest::{Client, Response, Url};
use serde::Deserialize;
use slotbook_common::http::client::{create_client, DEFAULT_TIMEOUT_SECS};
use slotbook_common::services::{AvailabilityStore, BoxFuture};
use slotbook_config::SheetsConfig;
use thiserror::Error;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";
const API_KEY_HEADER: &str = "X-goog-api-key";

#[derive(Error, Debug)]
pub enum SheetsError {
    /// Transport failure, stripped of the request URL.
    #[error("Sheets API request failed: {0}")]
    RequestError(reqwest::Error),

    #[error("Sheets API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Invalid Sheets API URL: {0}")]
    InvalidUrl(String),

    #[error("Sheets authentication failed: {0}")]
    Auth(String),

    #[error("Column {0:?} not found in the sheet header")]
    ColumnNotFound(String),
}

/// Wraps a transport error without its URL.
pub(crate) fn request_failed(err: reqwest::Error) -> SheetsError {
    SheetsError::RequestError(err.without_url())
}

/// `{base}/spreadsheets/{id}/values/{range}` with each segment percent-encoded.
pub(crate) fn values_url(
    base_url: Option<&str>,
    spreadsheet_id: &str,
    range: &str,
) -> Result<Url, SheetsError> {
    let base = base_url.unwrap_or(DEFAULT_BASE_URL);
    let mut url = Url::parse(base).map_err(|e| SheetsError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| SheetsError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(["spreadsheets", spreadsheet_id, "values", range]);
    Ok(url)
}

/// Turns a non-2xx response into [`SheetsError::ApiError`].
pub(crate) async fn check_status(response: Response) -> Result<Response, SheetsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(SheetsError::ApiError {
        status_code: status.as_u16(),
        message,
    })
}

/// Body of a `spreadsheets.values.get` response.
#[derive(Debug, Default, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// Non-blank cells under the header matching `department`, compared case-insensitively.
pub fn department_column(values: &[Vec<String>], department: &str) -> Vec<String> {
    let Some((header, rows)) = values.split_first() else {
        return Vec::new();
    };
    let Some(column) = header
        .iter()
        .position(|name| name.trim().eq_ignore_ascii_case(department.trim()))
    else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| row.get(column))
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct SheetsAvailabilityStore {
    client: Client,
    config: SheetsConfig,
}

impl SheetsAvailabilityStore {
    pub fn new(config: SheetsConfig) -> Result<Self, SheetsError> {
        Ok(Self {
            client: create_client(DEFAULT_TIMEOUT_SECS, true).map_err(request_failed)?,
            config,
        })
    }

    /// Fetches the whole configured range. The API key travels in a header, not the URL.
    pub async fn fetch_values(&self) -> Result<ValueRange, SheetsError> {
        let url = values_url(
            self.config.base_url.as_deref(),
            &self.config.spreadsheet_id,
            &self.config.range,
        )?;
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .send()
            .await
            .map_err(request_failed)?;

        check_status(response)
            .await?
            .json::<ValueRange>()
            .await
            .map_err(request_failed)
    }
}

impl AvailabilityStore for SheetsAvailabilityStore {
    type Error = SheetsError;

    fn get_intervals(&self, department: &str) -> BoxFuture<'_, Vec<String>, Self::Error> {
        let department = department.to_string();
        Box::pin(async move {
            let value_range = self.fetch_values().await?;
            debug!(
                "Read {} rows from {:?}",
                value_range.values.len(),
                value_range.range
            );
            let ranges = department_column(&value_range.values, &department);
            info!("{} availability ranges found for {}", ranges.len(), department);
            Ok(ranges)
        })
    }
}
