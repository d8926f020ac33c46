//! Backend trait and the normalized image request type.
//!
//! The [`ImageBackend`] trait abstracts over image-generation providers,
//! translating a normalized [`ImageRequest`] into a provider-specific HTTP
//! call. Built-in implementations: [`OpenAiImageBackend`] for OpenAI-style
//! `/v1/images/generations` endpoints, and [`MockImageBackend`] for tests.
//!
//! ## Architecture
//!
//! ```text
//! GenerationClient ──► ImageRequest ──► ImageBackend::generate() ──► GeneratedImage
//!                                              │
//!                                  ┌───────────┴───────────┐
//!                            OpenAiImageBackend      MockImageBackend
//!                            /v1/images/generations  scripted outcomes
//! ```
//!
//! No backend performs retries. Retry policy, if any, belongs to the
//! caller, and the batch runner deliberately does not retry either.

pub mod mock;
pub mod openai;

pub use mock::MockImageBackend;
pub use openai::OpenAiImageBackend;

use crate::error::GenerationError;
use crate::types::GeneratedImage;
use async_trait::async_trait;
use reqwest::Client;

/// A normalized image-generation request — provider-agnostic.
///
/// [`GenerationClient`](crate::client::GenerationClient) builds this from
/// its configuration constants plus the prompt. The [`ImageBackend`]
/// translates it into the provider-specific HTTP request. Everything except
/// the prompt text is fixed configuration, never derived from input.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    /// Model identifier (e.g. `"gpt-image-1"`).
    pub model: String,

    /// The prompt text.
    pub prompt: String,

    /// Number of images to generate per prompt.
    pub count: u32,

    /// Output size (e.g. `"1024x1024"`).
    pub size: String,
}

/// Abstraction over image-generation providers.
///
/// Implementors translate the normalized [`ImageRequest`] into the
/// provider's HTTP API and classify every failure mode into a
/// [`GenerationError`]. Exactly one request is performed per call.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as
/// `Arc<dyn ImageBackend>`.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Execute one image-generation call.
    async fn generate(
        &self,
        client: &Client,
        base_url: &str,
        request: &ImageRequest,
    ) -> Result<GeneratedImage, GenerationError>;

    /// Whether a usable credential is configured.
    ///
    /// The batch runner refuses to start a run when this returns `false`.
    fn has_credential(&self) -> bool;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}
