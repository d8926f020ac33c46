use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// A single trimmed, non-empty text instruction destined for image
/// generation.
///
/// Construction goes through [`Prompt::parse`], which rejects empty and
/// whitespace-only input, so a `Prompt` in hand is always usable as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prompt(String);

impl Prompt {
    /// Trim `raw` and build a prompt from it. Returns `None` when nothing
    /// remains after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The prompt text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The full ordered set of prompts processed in one run.
///
/// Order is significant — it determines output order and is preserved
/// end-to-end. Duplicates are permitted and not deduplicated. A batch is
/// built fresh per request and read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptBatch {
    prompts: Vec<Prompt>,
}

impl PromptBatch {
    /// Build a batch from prompts that are already validated.
    pub fn new(prompts: Vec<Prompt>) -> Self {
        Self { prompts }
    }

    /// Build a batch from raw values, trimming each and discarding the
    /// empties. Input order is preserved.
    pub fn from_raw_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prompts: values
                .into_iter()
                .filter_map(|v| Prompt::parse(v.as_ref()))
                .collect(),
        }
    }

    /// Number of prompts in the batch.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Whether the batch holds no prompts.
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Iterate over the prompts in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Prompt> {
        self.prompts.iter()
    }
}

impl IntoIterator for PromptBatch {
    type Item = Prompt;
    type IntoIter = std::vec::IntoIter<Prompt>;

    fn into_iter(self) -> Self::IntoIter {
        self.prompts.into_iter()
    }
}

impl<'a> IntoIterator for &'a PromptBatch {
    type Item = &'a Prompt;
    type IntoIter = std::slice::Iter<'a, Prompt>;

    fn into_iter(self) -> Self::IntoIter {
        self.prompts.iter()
    }
}

/// A generated image as returned by the endpoint: a base64 payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    b64: String,
}

impl GeneratedImage {
    /// Wrap a base64 payload taken from an endpoint response.
    pub fn from_base64(b64: impl Into<String>) -> Self {
        Self { b64: b64.into() }
    }

    /// The raw base64 payload.
    pub fn as_base64(&self) -> &str {
        &self.b64
    }

    /// Decode the payload into image bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.b64)
    }

    /// Render the payload as a `data:` URI suitable for an `<img>` tag.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.b64)
    }
}

/// The per-prompt result of one generation attempt.
///
/// Exactly one outcome exists per prompt in the batch, appended in input
/// order — never reordered, never skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// The prompt this outcome belongs to.
    pub prompt: Prompt,
    /// Generated image, or the classified failure for this prompt.
    pub result: Result<GeneratedImage, GenerationError>,
}

impl GenerationOutcome {
    /// Whether generation succeeded for this prompt.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The failure for this prompt, if any.
    pub fn error(&self) -> Option<&GenerationError> {
        self.result.as_ref().err()
    }
}

/// A condition that prevents a batch from starting at all, as opposed to a
/// per-item failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FatalError {
    /// No API credential is configured; generation never starts.
    #[error("no API credential is configured")]
    MissingCredential,

    /// The batch holds no prompts; there is nothing to run.
    #[error("the prompt batch is empty")]
    EmptyBatch,
}

/// The aggregated report for one batch run.
///
/// Holds one [`GenerationOutcome`] per input prompt, in input order. When
/// the batch could not start at all, `fatal` is set and `outcomes` is
/// empty — the run is never partially processed in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Per-prompt outcomes, in input order.
    pub outcomes: Vec<GenerationOutcome>,
    /// Set only when the entire batch could not start.
    pub fatal: Option<FatalError>,
}

impl BatchResult {
    /// A result for a batch that never started.
    pub fn fatal(error: FatalError) -> Self {
        Self {
            outcomes: Vec::new(),
            fatal: Some(error),
        }
    }

    /// Whether the batch failed before any generation was attempted.
    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }

    /// Number of prompts that produced an image.
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of prompts that failed.
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }
}
