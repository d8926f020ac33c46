//! Mock backend for testing without a live image endpoint.
//!
//! [`MockImageBackend`] returns pre-scripted outcomes in order, allowing
//! downstream consumers to write deterministic tests against this crate.
//!
//! # Example
//!
//! ```
//! use image_pipeline::backend::MockImageBackend;
//!
//! let mock = MockImageBackend::always_image("aGVsbG8=");
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::Client;

use super::{ImageBackend, ImageRequest};
use crate::error::GenerationError;
use crate::types::GeneratedImage;

/// A test backend that replays scripted outcomes in order.
///
/// Cycles back to the beginning when all outcomes have been consumed.
#[derive(Debug)]
pub struct MockImageBackend {
    outcomes: Vec<Result<GeneratedImage, GenerationError>>,
    index: AtomicUsize,
    credentialed: bool,
}

impl MockImageBackend {
    /// Create a mock backend with the given scripted outcomes.
    ///
    /// Outcomes are replayed in order. When exhausted, cycles from the
    /// beginning.
    pub fn new(outcomes: Vec<Result<GeneratedImage, GenerationError>>) -> Self {
        assert!(
            !outcomes.is_empty(),
            "MockImageBackend requires at least one outcome"
        );
        Self {
            outcomes,
            index: AtomicUsize::new(0),
            credentialed: true,
        }
    }

    /// Create a mock that always returns the same image.
    pub fn always_image(b64: impl Into<String>) -> Self {
        Self::new(vec![Ok(GeneratedImage::from_base64(b64))])
    }

    /// Create a mock that always returns the same error.
    pub fn always_error(error: GenerationError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Report no credential from [`ImageBackend::has_credential`].
    pub fn without_credential(mut self) -> Self {
        self.credentialed = false;
        self
    }

    fn next_outcome(&self) -> Result<GeneratedImage, GenerationError> {
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.outcomes.len();
        self.outcomes[idx].clone()
    }
}

#[async_trait]
impl ImageBackend for MockImageBackend {
    async fn generate(
        &self,
        _client: &Client,
        _base_url: &str,
        _request: &ImageRequest,
    ) -> Result<GeneratedImage, GenerationError> {
        self.next_outcome()
    }

    fn has_credential(&self) -> bool {
        self.credentialed
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_request() -> ImageRequest {
        ImageRequest {
            model: "test".into(),
            prompt: "test".into(),
            count: 1,
            size: "1024x1024".into(),
        }
    }

    #[tokio::test]
    async fn test_mock_fixed_image() {
        let mock = MockImageBackend::always_image("aGVsbG8=");
        let client = Client::new();
        let image = mock
            .generate(&client, "http://unused", &test_request())
            .await
            .unwrap();
        assert_eq!(image.as_base64(), "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_mock_cycles_outcomes() {
        let mock = MockImageBackend::new(vec![
            Ok(GeneratedImage::from_base64("first")),
            Err(GenerationError::Timeout),
        ]);
        let client = Client::new();
        let r1 = mock.generate(&client, "http://unused", &test_request()).await;
        let r2 = mock.generate(&client, "http://unused", &test_request()).await;
        let r3 = mock.generate(&client, "http://unused", &test_request()).await;
        assert!(r1.is_ok());
        assert_eq!(r2, Err(GenerationError::Timeout));
        assert!(r3.is_ok()); // cycles
    }

    #[test]
    fn test_mock_credential_toggle() {
        assert!(MockImageBackend::always_image("x").has_credential());
        assert!(!MockImageBackend::always_image("x")
            .without_credential()
            .has_credential());
    }
}
