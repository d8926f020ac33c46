//! Remote spreadsheet prompt source.
//!
//! Reads one column of a named sheet/tab through the spreadsheet service's
//! values API (`GET /v4/spreadsheets/{id}/values/{sheet}`), authenticated
//! with an opaque bearer credential resolved by the caller. The first row
//! is treated as a header and skipped.
//!
//! Upstream failures go through a structured classifier: HTTP status and
//! the error body's `error.status` field are inspected first, message
//! substrings are a last-resort heuristic, and anything unmatched lands on
//! [`SourceError::Unknown`] with the raw body preserved.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{PromptSource, DEFAULT_PROMPT_COLUMN};
use crate::error::SourceError;
use crate::types::{Prompt, PromptBatch};

/// Default base URL of the spreadsheet values API.
const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// Prompt source backed by a remote spreadsheet.
///
/// # Example
///
/// ```no_run
/// use image_pipeline::source::{PromptSource, SheetSource};
///
/// # async fn run() -> Result<(), image_pipeline::SourceError> {
/// let token = SheetSource::bearer_token_from_env()?;
/// let source = SheetSource::new("1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms", "Prompts", token)?;
/// let batch = source.load().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SheetSource {
    http: Client,
    spreadsheet_id: String,
    sheet: String,
    column: usize,
    token: String,
    base_url: String,
}

impl std::fmt::Debug for SheetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetSource")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet", &self.sheet)
            .field("column", &self.column)
            .field("token", &"***")
            .finish()
    }
}

/// Response shape of the values API.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Error body shape of the spreadsheet service.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
    status: Option<String>,
}

impl SheetSource {
    /// Create a source for one sheet/tab of one spreadsheet.
    ///
    /// The credential is opaque to this component — resolve it externally
    /// (see [`bearer_token_from_env`](Self::bearer_token_from_env)). Fails
    /// with [`SourceError::MissingConfig`] when the spreadsheet identifier
    /// is absent.
    pub fn new(
        spreadsheet_id: impl Into<String>,
        sheet: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let spreadsheet_id = spreadsheet_id.into();
        if spreadsheet_id.trim().is_empty() {
            return Err(SourceError::MissingConfig);
        }
        Ok(Self {
            http: Client::new(),
            spreadsheet_id,
            sheet: sheet.into(),
            column: DEFAULT_PROMPT_COLUMN,
            token: token.into(),
            base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
        })
    }

    /// Set the target column index (0-based). Default: column A.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    /// Set the HTTP client. Default: a fresh `reqwest::Client`.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Override the service base URL (used by tests against a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve the bearer credential from the `SHEETS_ACCESS_TOKEN`
    /// environment variable.
    pub fn bearer_token_from_env() -> Result<String, SourceError> {
        match std::env::var("SHEETS_ACCESS_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(SourceError::CredentialFailure(
                "SHEETS_ACCESS_TOKEN is not set".to_string(),
            )),
        }
    }

    /// Resolve the spreadsheet identifier from the `SPREADSHEET_ID`
    /// environment variable.
    pub fn spreadsheet_id_from_env() -> Result<String, SourceError> {
        match std::env::var("SPREADSHEET_ID") {
            Ok(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(SourceError::MissingConfig),
        }
    }

    fn values_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url.trim_end_matches('/'),
            self.spreadsheet_id,
            urlencoding::encode(&self.sheet),
        )
    }

    /// Turn the fetched grid into a batch: skip the header row, read the
    /// target column, trim, discard empties.
    fn prompts_from_rows(
        rows: &[Vec<String>],
        column: usize,
    ) -> Result<PromptBatch, SourceError> {
        let prompts: Vec<Prompt> = rows
            .iter()
            .skip(1)
            .filter_map(|row| row.get(column))
            .filter_map(|cell| Prompt::parse(cell))
            .collect();

        if prompts.is_empty() {
            return Err(SourceError::Empty { column });
        }

        Ok(PromptBatch::new(prompts))
    }
}

#[async_trait]
impl PromptSource for SheetSource {
    async fn load(&self) -> Result<PromptBatch, SourceError> {
        let url = self.values_url();
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SourceError::Unknown {
                message: "failed to reach the spreadsheet service".to_string(),
                detail: Some(e.to_string()),
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();

        if !(200..300).contains(&status) {
            return Err(classify_remote_error(status, &body, &self.sheet));
        }

        let range: ValueRange =
            serde_json::from_str(&body).map_err(|_| SourceError::Unknown {
                message: "unexpected response shape from the spreadsheet service".to_string(),
                detail: Some(body.clone()),
            })?;

        Self::prompts_from_rows(&range.values, self.column)
    }

    fn name(&self) -> &'static str {
        "sheet"
    }
}

/// Classify a non-success response from the spreadsheet service.
///
/// Order of inspection: HTTP status code, then the body's `error.status`
/// field, then message substrings as a heuristic of last resort. The raw
/// body is always carried in the returned variant.
fn classify_remote_error(status: u16, body: &str, sheet: &str) -> SourceError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error);
    let api_status = parsed
        .as_ref()
        .and_then(|e| e.status.as_deref())
        .unwrap_or("");
    let message = parsed
        .as_ref()
        .and_then(|e| e.message.as_deref())
        .unwrap_or("");

    // A 400 for an unresolvable range means the named tab does not exist.
    if status == 400 && message.contains("Unable to parse range") {
        return SourceError::SheetNotFound {
            sheet: sheet.to_string(),
            detail: Some(body.to_string()),
        };
    }

    match (status, api_status) {
        (403, _) | (_, "PERMISSION_DENIED") | (_, "ACCESS_TOKEN_SCOPE_INSUFFICIENT") => {
            SourceError::RemoteAccessDenied {
                reason: if api_status.is_empty() {
                    "PERMISSION_DENIED".to_string()
                } else {
                    api_status.to_string()
                },
                detail: body.to_string(),
            }
        }
        (404, _) | (_, "NOT_FOUND") => SourceError::RemoteNotFound {
            detail: body.to_string(),
        },
        (401, _) | (_, "UNAUTHENTICATED") => SourceError::CredentialFailure(format!(
            "the spreadsheet service rejected the credential: {}",
            if message.is_empty() { body } else { message }
        )),
        _ if message.to_lowercase().contains("permission denied")
            || body.to_lowercase().contains("permission denied") =>
        {
            SourceError::RemoteAccessDenied {
                reason: "permission denied".to_string(),
                detail: body.to_string(),
            }
        }
        _ => SourceError::Unknown {
            message: format!("spreadsheet request failed with HTTP {}", status),
            detail: Some(body.to_string()),
        },
    }
}
