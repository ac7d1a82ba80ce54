//! Sign-up form responses kept in a Google Sheet.
//!
//! Row 1 is the form's header (one question per column); every row below is one response.
//! Reads and writes both go through OAuth, since response sheets are never public.

use crate::auth::AccessTokenSource;
use crate::store::{check_status, request_failed, values_url, SheetsError, ValueRange};
use reqwest::Client;
use serde_json::json;
use slotbook_common::http::client::{create_client, DEFAULT_TIMEOUT_SECS};
use slotbook_common::services::{BoxFuture, SheetRow, SignupSheet};
use slotbook_config::IntakeConfig;
use tracing::{debug, info};

/// Pairs each data row with the header. Short rows are padded with empty cells.
pub fn rows_from_values(values: &[Vec<String>]) -> Vec<SheetRow> {
    let Some((header, rows)) = values.split_first() else {
        return Vec::new();
    };

    rows.iter()
        .enumerate()
        .map(|(offset, cells)| SheetRow {
            row: offset + 2,
            cells: header
                .iter()
                .enumerate()
                .map(|(col, name)| {
                    (
                        name.trim().to_string(),
                        cells.get(col).cloned().unwrap_or_default(),
                    )
                })
                .collect(),
        })
        .collect()
}

/// A1 column letters for a 0-based index: 0 → A, 25 → Z, 26 → AA.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn quoted_sheet(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

pub struct SheetsSignupSheet {
    client: Client,
    base_url: Option<String>,
    spreadsheet_id: String,
    sheet_name: String,
    tokens: Box<dyn AccessTokenSource>,
}

impl SheetsSignupSheet {
    pub fn new(
        config: &IntakeConfig,
        tokens: impl AccessTokenSource + 'static,
    ) -> Result<Self, SheetsError> {
        Ok(Self {
            client: create_client(DEFAULT_TIMEOUT_SECS, true).map_err(request_failed)?,
            base_url: config.base_url.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            sheet_name: config.sheet_name.clone(),
            tokens: Box::new(tokens),
        })
    }

    async fn get_values(&self, range: &str) -> Result<ValueRange, SheetsError> {
        let url = values_url(self.base_url.as_deref(), &self.spreadsheet_id, range)?;
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(request_failed)?;

        check_status(response)
            .await?
            .json::<ValueRange>()
            .await
            .map_err(request_failed)
    }

    /// Fetches every response row.
    pub async fn fetch_rows(&self) -> Result<Vec<SheetRow>, SheetsError> {
        let value_range = self.get_values(&quoted_sheet(&self.sheet_name)).await?;
        let rows = rows_from_values(&value_range.values);
        info!("Read {} sign-up rows from {}", rows.len(), self.sheet_name);
        Ok(rows)
    }

    /// Writes a single cell. The header is read first so the column follows the sheet
    /// even when form questions are reordered.
    pub async fn write_cell(
        &self,
        row: usize,
        column: &str,
        value: &str,
    ) -> Result<(), SheetsError> {
        let sheet = quoted_sheet(&self.sheet_name);
        let header = self.get_values(&format!("{}!1:1", sheet)).await?;
        let index = header
            .values
            .first()
            .and_then(|cells| cells.iter().position(|cell| cell.trim() == column))
            .ok_or_else(|| SheetsError::ColumnNotFound(column.to_string()))?;

        let range = format!("{}!{}{}", sheet, column_letter(index), row);
        debug!("Writing {:?} to {}", value, range);

        let url = values_url(self.base_url.as_deref(), &self.spreadsheet_id, &range)?;
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": [[value]] }))
            .send()
            .await
            .map_err(request_failed)?;

        check_status(response).await?;
        Ok(())
    }
}

impl SignupSheet for SheetsSignupSheet {
    type Error = SheetsError;

    fn read_rows(&self) -> BoxFuture<'_, Vec<SheetRow>, Self::Error> {
        Box::pin(self.fetch_rows())
    }

    fn update_cell(
        &self,
        row: usize,
        column: &str,
        value: &str,
    ) -> BoxFuture<'_, (), Self::Error> {
        let column = column.to_string();
        let value = value.to_string();
        Box::pin(async move { self.write_cell(row, &column, &value).await })
    }
}
