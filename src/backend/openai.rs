//! Backend for OpenAI-style image-generation APIs.
//!
//! Endpoint: `POST /v1/images/generations` with `{model, prompt, n, size}`.
//! Success responses carry the image as `{"data": [{"b64_json": "..."}]}`.
//!
//! Every failure mode maps to exactly one [`GenerationError`] variant, and
//! upstream bodies are preserved verbatim as diagnostic detail.

use super::{ImageBackend, ImageRequest};
use crate::error::GenerationError;
use crate::types::GeneratedImage;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Backend for any OpenAI-compatible image endpoint.
///
/// # Example
///
/// ```
/// use image_pipeline::backend::OpenAiImageBackend;
///
/// let backend = OpenAiImageBackend::new().with_api_key("sk-...");
/// ```
#[derive(Clone)]
pub struct OpenAiImageBackend {
    /// Optional API key. If set, sent as `Authorization: Bearer {key}`.
    pub(crate) api_key: Option<String>,
}

impl std::fmt::Debug for OpenAiImageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiImageBackend")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|k| {
                    if k.len() > 6 {
                        format!("{}***", &k[..6])
                    } else {
                        "***".to_string()
                    }
                }),
            )
            .finish()
    }
}

impl OpenAiImageBackend {
    /// Create a new backend without authentication.
    pub fn new() -> Self {
        Self { api_key: None }
    }

    /// Set the API key for authentication.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Returns `true` if an API key has been configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the request body for `/v1/images/generations`.
    fn build_body(request: &ImageRequest) -> Value {
        json!({
            "model": request.model,
            "prompt": request.prompt,
            "n": request.count,
            "size": request.size,
        })
    }

    /// Build the reqwest request with appropriate headers.
    fn build_http_request(
        &self,
        client: &Client,
        url: &str,
        body: &Value,
    ) -> reqwest::RequestBuilder {
        let mut req = client.post(url).json(body);

        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        req
    }

    /// Pull `data[0].b64_json` out of a success response.
    fn extract_image(json_resp: &Value) -> Option<&str> {
        json_resp
            .get("data")
            .and_then(|d| d.get(0))
            .and_then(|entry| entry.get("b64_json"))
            .and_then(|v| v.as_str())
    }
}

impl Default for OpenAiImageBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a send-phase `reqwest::Error`.
///
/// A timed-out request is its own variant; a request that never left the
/// builder is a setup failure; everything else means the request went out
/// and nothing usable came back.
fn classify_send_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else if err.is_builder() {
        GenerationError::RequestSetupFailed {
            message: err.to_string(),
        }
    } else {
        GenerationError::NoResponse {
            detail: err.to_string(),
        }
    }
}

#[async_trait]
impl ImageBackend for OpenAiImageBackend {
    async fn generate(
        &self,
        client: &Client,
        base_url: &str,
        request: &ImageRequest,
    ) -> Result<GeneratedImage, GenerationError> {
        let base = base_url.trim_end_matches('/');
        let url = format!("{}/v1/images/generations", base);
        let body = Self::build_body(request);

        let resp = self
            .build_http_request(client, &url, &body)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GenerationError::UpstreamStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let text = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else {
                GenerationError::NoResponse {
                    detail: e.to_string(),
                }
            }
        })?;

        let json_resp: Value = serde_json::from_str(&text).map_err(|_| {
            GenerationError::MalformedResponse {
                raw_body: text.clone(),
            }
        })?;

        match Self::extract_image(&json_resp) {
            Some(b64) => Ok(GeneratedImage::from_base64(b64)),
            None => Err(GenerationError::MalformedResponse { raw_body: text }),
        }
    }

    fn has_credential(&self) -> bool {
        self.has_api_key()
    }

    fn name(&self) -> &'static str {
        "openai-images"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_request() -> ImageRequest {
        ImageRequest {
            model: "gpt-image-1".into(),
            prompt: "a watercolor fox".into(),
            count: 1,
            size: "1024x1024".into(),
        }
    }

    #[test]
    fn test_body_carries_fixed_fields() {
        let body = OpenAiImageBackend::build_body(&test_request());
        assert_eq!(body["model"], "gpt-image-1");
        assert_eq!(body["prompt"], "a watercolor fox");
        assert_eq!(body["n"], 1);
        assert_eq!(body["size"], "1024x1024");
    }

    #[test]
    fn test_auth_header() {
        let backend = OpenAiImageBackend::new().with_api_key("sk-test123");
        let client = Client::new();
        let body = json!({"test": true});
        let req = backend
            .build_http_request(&client, "https://api.openai.com/v1/images/generations", &body)
            .build()
            .expect("build request");

        let auth = req.headers().get("Authorization").expect("auth header");
        assert_eq!(auth, "Bearer sk-test123");
    }

    #[test]
    fn test_no_auth_header_without_key() {
        let backend = OpenAiImageBackend::new();
        let client = Client::new();
        let body = json!({"test": true});
        let req = backend
            .build_http_request(&client, "https://api.openai.com/v1/images/generations", &body)
            .build()
            .expect("build request");

        assert!(req.headers().get("Authorization").is_none());
    }

    #[test]
    fn test_extract_image_happy_path() {
        let resp = json!({"created": 1, "data": [{"b64_json": "aGVsbG8="}]});
        assert_eq!(OpenAiImageBackend::extract_image(&resp), Some("aGVsbG8="));
    }

    #[test]
    fn test_extract_image_empty_data_array() {
        let resp = json!({"created": 1, "data": []});
        assert_eq!(OpenAiImageBackend::extract_image(&resp), None);
    }

    #[test]
    fn test_extract_image_missing_field() {
        let resp = json!({"created": 1, "data": [{"url": "https://example.com/img.png"}]});
        assert_eq!(OpenAiImageBackend::extract_image(&resp), None);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let backend = OpenAiImageBackend::new().with_api_key("sk-1234567890abcdef");
        let debug_output = format!("{:?}", backend);
        assert!(
            !debug_output.contains("1234567890abcdef"),
            "API key must not appear in Debug output"
        );
        assert!(debug_output.contains("sk-123"));
        assert!(debug_output.contains("***"));
    }

    #[test]
    fn test_has_credential() {
        assert!(!OpenAiImageBackend::new().has_credential());
        assert!(OpenAiImageBackend::new()
            .with_api_key("sk-test")
            .has_credential());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_no_response() {
        let backend = OpenAiImageBackend::new().with_api_key("sk-test");
        let client = Client::new();
        // Nothing listens on this port.
        let result = backend
            .generate(&client, "http://127.0.0.1:9", &test_request())
            .await;
        assert!(matches!(
            result,
            Err(GenerationError::NoResponse { .. })
        ));
    }
}
