//! Generation client: configuration constants plus the one-call-per-prompt
//! HTTP wrapper.
//!
//! [`GenerationConfig`] holds the startup-time constants (model, size,
//! output count, base URL, timeout). [`GenerationClient`] bundles the
//! config with an HTTP client and an [`ImageBackend`] and performs exactly
//! one request per prompt — retry policy, if any, belongs to the caller.

use crate::backend::{ImageBackend, ImageRequest, OpenAiImageBackend};
use crate::error::GenerationError;
use crate::types::{GeneratedImage, Prompt};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Default request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Configuration constants for image generation.
///
/// Everything here is fixed at startup and never derived from per-request
/// input.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Model identifier (e.g. `"gpt-image-1"`).
    pub model: String,

    /// Output size (e.g. `"1024x1024"`).
    pub size: String,

    /// Number of images per prompt. Fixed at 1 for batch runs.
    pub count: u32,

    /// Base URL of the generation endpoint.
    pub base_url: String,

    /// Request timeout, applied at the HTTP-client level.
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-image-1".to_string(),
            size: "1024x1024".to_string(),
            count: 1,
            base_url: "https://api.openai.com".to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl GenerationConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a config from environment variables, falling back to defaults
    /// for anything unset or unparseable.
    ///
    /// Recognized variables: `IMAGE_MODEL`, `IMAGE_SIZE`,
    /// `IMAGE_API_BASE_URL`, `IMAGE_REQUEST_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(model) = std::env::var("IMAGE_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(size) = std::env::var("IMAGE_SIZE") {
            if !size.trim().is_empty() {
                config.size = size;
            }
        }
        if let Ok(base_url) = std::env::var("IMAGE_API_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }
        if let Ok(ms) = std::env::var("IMAGE_REQUEST_TIMEOUT_MS") {
            if let Ok(ms) = ms.trim().parse::<u64>() {
                config.timeout = Duration::from_millis(ms);
            }
        }
        config
    }
}

/// Wraps one outbound call to an image-generation endpoint.
///
/// Owns the HTTP client (built with the configured timeout), the backend,
/// and the configuration constants. Cheap to share behind the runner.
///
/// # Example
///
/// ```
/// use image_pipeline::GenerationClient;
///
/// let client = GenerationClient::builder()
///     .api_key("sk-...")
///     .build();
/// ```
pub struct GenerationClient {
    http: Client,
    backend: Arc<dyn ImageBackend>,
    config: GenerationConfig,
}

impl GenerationClient {
    /// Create a new builder.
    pub fn builder() -> GenerationClientBuilder {
        GenerationClientBuilder {
            http: None,
            backend: None,
            api_key: None,
            config: None,
        }
    }

    /// The configuration constants in effect.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Whether the backend has a usable credential.
    pub fn has_credential(&self) -> bool {
        self.backend.has_credential()
    }

    /// Perform exactly one generation request for `prompt`.
    pub async fn generate(&self, prompt: &Prompt) -> Result<GeneratedImage, GenerationError> {
        let request = ImageRequest {
            model: self.config.model.clone(),
            prompt: prompt.as_str().to_string(),
            count: self.config.count,
            size: self.config.size.clone(),
        };
        self.backend
            .generate(&self.http, &self.config.base_url, &request)
            .await
    }
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`GenerationClient`].
pub struct GenerationClientBuilder {
    http: Option<Client>,
    backend: Option<Arc<dyn ImageBackend>>,
    api_key: Option<String>,
    config: Option<GenerationConfig>,
}

impl GenerationClientBuilder {
    /// Set the HTTP client. If not set, one is built with the config
    /// timeout.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Set the backend. Default: [`OpenAiImageBackend`] with the builder's
    /// API key (if any).
    pub fn backend(mut self, backend: Arc<dyn ImageBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the API key for the default backend. Ignored when a custom
    /// backend is supplied.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the configuration constants. Default:
    /// [`GenerationConfig::default`].
    pub fn config(mut self, config: GenerationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the client.
    pub fn build(self) -> GenerationClient {
        let config = self.config.unwrap_or_default();
        let http = self.http.unwrap_or_else(|| {
            Client::builder()
                .timeout(config.timeout)
                .build()
                .expect("Failed to build HTTP client")
        });
        let backend = self.backend.unwrap_or_else(|| {
            let mut backend = OpenAiImageBackend::new();
            if let Some(key) = self.api_key {
                backend = backend.with_api_key(key);
            }
            Arc::new(backend)
        });
        GenerationClient {
            http,
            backend,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockImageBackend;
    use crate::error::GenerationError;

    #[test]
    fn test_config_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.model, "gpt-image-1");
        assert_eq!(config.size, "1024x1024");
        assert_eq!(config.count, 1);
        assert_eq!(config.base_url, "https://api.openai.com");
        assert_eq!(config.timeout, Duration::from_millis(60_000));
    }

    #[test]
    fn test_config_builder() {
        let config = GenerationConfig::default()
            .with_model("dall-e-2")
            .with_size("512x512")
            .with_base_url("http://localhost:8080")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.model, "dall-e-2");
        assert_eq!(config.size, "512x512");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    // Single test so the env var is not mutated from parallel tests.
    #[test]
    fn test_config_from_env_timeout() {
        std::env::set_var("IMAGE_REQUEST_TIMEOUT_MS", "2500");
        let config = GenerationConfig::from_env();
        assert_eq!(config.timeout, Duration::from_millis(2500));

        std::env::set_var("IMAGE_REQUEST_TIMEOUT_MS", "not-a-number");
        let config = GenerationConfig::from_env();
        assert_eq!(config.timeout, Duration::from_millis(60_000));

        std::env::remove_var("IMAGE_REQUEST_TIMEOUT_MS");
    }

    #[test]
    fn test_client_without_key_has_no_credential() {
        let client = GenerationClient::builder().build();
        assert!(!client.has_credential());
    }

    #[test]
    fn test_client_with_key_has_credential() {
        let client = GenerationClient::builder().api_key("sk-test").build();
        assert!(client.has_credential());
    }

    #[tokio::test]
    async fn test_generate_delegates_to_backend() {
        let client = GenerationClient::builder()
            .backend(Arc::new(MockImageBackend::always_image("aGVsbG8=")))
            .build();
        let prompt = Prompt::parse("a fox").unwrap();
        let image = client.generate(&prompt).await.unwrap();
        assert_eq!(image.as_base64(), "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_generate_surfaces_backend_error() {
        let client = GenerationClient::builder()
            .backend(Arc::new(MockImageBackend::always_error(
                GenerationError::Timeout,
            )))
            .build();
        let prompt = Prompt::parse("a fox").unwrap();
        let result = client.generate(&prompt).await;
        assert_eq!(result, Err(GenerationError::Timeout));
    }
}
