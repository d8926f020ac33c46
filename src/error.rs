use thiserror::Error;

/// Errors produced while building a prompt batch from a source.
///
/// A source error always aborts batch construction entirely — no partial
/// batch is ever handed downstream. Raw upstream detail (response bodies,
/// parser messages) is carried in the variant fields so a friendlier
/// user-facing message never costs the diagnostic.
///
/// Column and row indices are 0-based in the fields; `Display` messages
/// use 1-based positions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The underlying file does not exist or could not be opened.
    #[error("prompt file not found at '{path}'")]
    NotFound {
        /// Path that failed to open.
        path: String,
    },

    /// The target column index is past the end of the first row.
    #[error("prompt column {col} is out of bounds for the file ({columns} columns)", col = .column + 1)]
    ColumnOutOfBounds {
        /// Requested column index (0-based).
        column: usize,
        /// Number of columns seen in the first row.
        columns: usize,
    },

    /// Parsing completed but zero non-empty values were collected.
    #[error("no prompts found in column {col}", col = .column + 1)]
    Empty {
        /// Column index that was read (0-based).
        column: usize,
    },

    /// The spreadsheet identifier is absent from configuration.
    #[error("spreadsheet id is not configured")]
    MissingConfig,

    /// The named sheet/tab does not exist within the spreadsheet.
    #[error("sheet '{sheet}' was not found in the spreadsheet")]
    SheetNotFound {
        /// The sheet/tab name that was requested.
        sheet: String,
        /// Raw upstream response body, if one was received.
        detail: Option<String>,
    },

    /// The remote service refused access (permissions, scopes).
    #[error("access to the spreadsheet was denied: {reason}")]
    RemoteAccessDenied {
        /// Classified sub-reason (e.g. `PERMISSION_DENIED`).
        reason: String,
        /// Raw upstream response body, verbatim.
        detail: String,
    },

    /// The remote document does not exist.
    #[error("the spreadsheet was not found")]
    RemoteNotFound {
        /// Raw upstream response body, verbatim.
        detail: String,
    },

    /// Credentials could not be loaded or were rejected outright.
    #[error("failed to load spreadsheet credentials: {0}")]
    CredentialFailure(String),

    /// Anything the classifier could not place. The raw message is never
    /// discarded.
    #[error("failed to read prompt source: {message}")]
    Unknown {
        /// Short description of the failure.
        message: String,
        /// Raw upstream body or parser output, if any.
        detail: Option<String>,
    },
}

impl From<anyhow::Error> for SourceError {
    fn from(err: anyhow::Error) -> Self {
        SourceError::Unknown {
            message: err.to_string(),
            detail: None,
        }
    }
}

/// Errors produced by a single image-generation call.
///
/// A generation error is always local to one prompt: the batch runner
/// records it as a failure outcome and moves on. Upstream error bodies are
/// preserved verbatim as diagnostic detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The request exceeded the configured timeout.
    #[error("image request timed out")]
    Timeout,

    /// The endpoint responded with a non-success status code.
    #[error("image endpoint returned HTTP {status}")]
    UpstreamStatus {
        /// HTTP status code (e.g. 400, 429, 500).
        status: u16,
        /// Upstream error body, verbatim.
        body: String,
    },

    /// The request was sent but no response arrived.
    #[error("no response received from the image endpoint")]
    NoResponse {
        /// Transport-level description of what went wrong.
        detail: String,
    },

    /// A success status arrived but the expected image payload is missing
    /// or the result array is empty. Distinct from a transport failure.
    #[error("could not extract image data from the response")]
    MalformedResponse {
        /// The raw response body, verbatim.
        raw_body: String,
    },

    /// Request construction or serialization failed before anything was
    /// sent.
    #[error("failed to build image request: {message}")]
    RequestSetupFailed {
        /// Description of the setup failure.
        message: String,
    },
}
