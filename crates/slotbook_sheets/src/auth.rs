// --- File: crates/slotbook_sheets/src/auth.rs ---
use crate::store::SheetsError;
use slotbook_common::services::BoxFuture;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator};

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Supplies bearer tokens for Sheets API writes.
pub trait AccessTokenSource: Send + Sync {
    fn access_token(&self) -> BoxFuture<'_, String, SheetsError>;
}

/// A token handed in from outside.
pub struct StaticToken(pub String);

impl AccessTokenSource for StaticToken {
    fn access_token(&self) -> BoxFuture<'_, String, SheetsError> {
        let token = self.0.clone();
        Box::pin(async move { Ok(token) })
    }
}

type TokenFetch = dyn Fn() -> BoxFuture<'static, String, SheetsError> + Send + Sync;

/// Tokens minted from a service account key. The authenticator caches and refreshes them.
pub struct ServiceAccountTokens {
    fetch: Box<TokenFetch>,
}

impl ServiceAccountTokens {
    /// The service account must have edit access to the sheet.
    pub async fn from_key_file(key_path: &str) -> Result<Self, SheetsError> {
        let sa_key = read_service_account_key(Path::new(key_path))
            .await
            .map_err(|e| SheetsError::Auth(format!("reading {}: {}", key_path, e)))?;
        info!("Loaded Sheets service account key for {}", sa_key.client_email);

        let auth = Arc::new(
            ServiceAccountAuthenticator::builder(sa_key)
                .build()
                .await
                .map_err(|e| SheetsError::Auth(e.to_string()))?,
        );

        let fetch = move || -> BoxFuture<'static, String, SheetsError> {
            let auth = auth.clone();
            Box::pin(async move {
                let token = auth
                    .token(&[SHEETS_SCOPE])
                    .await
                    .map_err(|e| SheetsError::Auth(e.to_string()))?;
                token
                    .token()
                    .map(str::to_string)
                    .ok_or_else(|| SheetsError::Auth("no access token returned".to_string()))
            })
        };

        Ok(Self {
            fetch: Box::new(fetch),
        })
    }
}

impl AccessTokenSource for ServiceAccountTokens {
    fn access_token(&self) -> BoxFuture<'_, String, SheetsError> {
        (self.fetch)()
    }
}
