//! Backend contract and HTTP client.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AssistError, Result};

/// Generation can be slow for long prompts.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Inline image sent with a transcription prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePayload {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64 of the raw image bytes.
    pub data: String,
}

impl ImagePayload {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }
}

/// Body of a generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiRequest {
    pub prompt: String,
    #[serde(rename = "responseSchema")]
    pub response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload>,
}

impl AiRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
            image: None,
        }
    }

    pub fn structured(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }
}

/// Something that turns a prompt into generated text.
pub trait AiBackend: Send + Sync {
    /// Returns the generated text. For structured requests this is a JSON
    /// document matching the schema.
    fn generate(&self, request: &AiRequest) -> Result<String>;
}

#[derive(Deserialize)]
struct SuccessBody {
    text: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// [`AiBackend`] calling the generation proxy over HTTP.
pub struct HttpBackend {
    client: Client,
    url: String,
}

impl HttpBackend {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(AssistError::from)?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AiBackend for HttpBackend {
    fn generate(&self, request: &AiRequest) -> Result<String> {
        tracing::debug!(
            url = %self.url,
            structured = request.response_schema.is_some(),
            image = request.image.is_some(),
            "calling AI backend"
        );

        let response = self
            .client
            .post(&self.url)
            .header(USER_AGENT, format!("pqr/{}", env!("CARGO_PKG_VERSION")))
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let code = status.as_u16();
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("server error: {code}"));
            tracing::warn!(status = code, %message, "AI backend returned an error");
            return Err(AssistError::Backend {
                status: code,
                message,
            });
        }

        let body: SuccessBody = response.json()?;
        Ok(body.text)
    }
}
