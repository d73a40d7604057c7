//! HTTP client for the PlayAI speech synthesis endpoint.
//!
//! One network request per chunk. The client owns the request timeout and
//! translates transport and service failures into the readaloud error
//! taxonomy; retry policy belongs to callers.

use crate::defaults;
use crate::error::{ReadaloudError, Result};
use crate::playback::AudioSegment;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// One synthesis request. Voice, temperature and speed are session-wide
/// settings applied uniformly to all chunks of a generation run.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// Chunk text to synthesize.
    pub text: String,
    /// Voice identifier from the catalog.
    pub voice: String,
    /// Sampling temperature, 0.0 to 1.0.
    pub temperature: f32,
    /// Playback speed multiplier, 0.5 to 2.0.
    pub speed: f32,
}

/// Trait for speech synthesis.
///
/// This trait allows swapping implementations (real HTTP client vs stub).
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesizes one chunk into an audio segment.
    ///
    /// # Arguments
    /// * `index` - Chunk index; carried onto the returned segment
    /// * `request` - Text and session-wide voice settings
    ///
    /// # Returns
    /// An audio segment owning the synthesized byte payload, or an error.
    async fn synthesize(&self, index: usize, request: &SpeechRequest) -> Result<AudioSegment>;
}

/// Connection settings for the PlayAI endpoint.
#[derive(Debug, Clone)]
pub struct SpeechClientConfig {
    /// Endpoint URL.
    pub endpoint: String,
    /// Bearer credential.
    pub api_key: String,
    /// Account identifier sent as `X-User-Id`.
    pub user_id: String,
    /// Hard per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SpeechClientConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::TTS_ENDPOINT.to_string(),
            api_key: String::new(),
            user_id: String::new(),
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Wire format of the synthesis request body.
#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    text: &'a str,
    voice: &'a str,
    temperature: f32,
    speed: f32,
    model: &'static str,
}

/// HTTP speech client backed by reqwest.
pub struct SpeechClient {
    client: reqwest::Client,
    config: SpeechClientConfig,
}

impl SpeechClient {
    /// Creates a client, verifying credentials are present.
    ///
    /// Fails with `MissingCredentials` before any request is attempted when
    /// the API key or user id is empty.
    pub fn new(config: SpeechClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() || config.user_id.trim().is_empty() {
            return Err(ReadaloudError::MissingCredentials);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ReadaloudError::Network {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }

    fn translate_transport_error(&self, error: reqwest::Error) -> ReadaloudError {
        if error.is_timeout() {
            ReadaloudError::Timeout {
                seconds: self.config.timeout_secs,
            }
        } else {
            ReadaloudError::Network {
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl Synthesizer for SpeechClient {
    async fn synthesize(&self, index: usize, request: &SpeechRequest) -> Result<AudioSegment> {
        let text = request.text.trim();
        if text.is_empty() {
            // Rejected locally, no network call
            return Err(ReadaloudError::EmptyText);
        }

        let body = RequestBody {
            text,
            voice: &request.voice,
            temperature: request.temperature,
            speed: request.speed,
            model: defaults::TTS_MODEL,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("X-User-Id", &self.config.user_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.translate_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReadaloudError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.translate_transport_error(e))?;

        if bytes.is_empty() {
            return Err(ReadaloudError::EmptyAudio);
        }

        Ok(AudioSegment::new(index, bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SpeechClientConfig {
        SpeechClientConfig {
            endpoint: "http://127.0.0.1:9/tts".to_string(),
            api_key: "test-key".to_string(),
            user_id: "test-user".to_string(),
            timeout_secs: 30,
        }
    }

    fn test_request(text: &str) -> SpeechRequest {
        SpeechRequest {
            text: text.to_string(),
            voice: "s3://voice/manifest.json".to_string(),
            temperature: 0.5,
            speed: 1.0,
        }
    }

    #[test]
    fn test_missing_credentials_rejected_at_construction() {
        let config = SpeechClientConfig {
            api_key: String::new(),
            ..test_config()
        };
        assert!(matches!(
            SpeechClient::new(config),
            Err(ReadaloudError::MissingCredentials)
        ));

        let config = SpeechClientConfig {
            user_id: "  ".to_string(),
            ..test_config()
        };
        assert!(matches!(
            SpeechClient::new(config),
            Err(ReadaloudError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn test_empty_text_rejected_without_network_call() {
        // Endpoint is a discard port — if the client tried the network, the
        // error would be a transport error, not EmptyText.
        let client = SpeechClient::new(test_config()).unwrap();
        let result = client.synthesize(0, &test_request("   ")).await;
        assert!(matches!(result, Err(ReadaloudError::EmptyText)));
    }

    #[test]
    fn test_request_body_wire_format() {
        let body = RequestBody {
            text: "Hello there.",
            voice: "s3://voice/manifest.json",
            temperature: 0.5,
            speed: 1.0,
            model: defaults::TTS_MODEL,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["text"], "Hello there.");
        assert_eq!(json["voice"], "s3://voice/manifest.json");
        assert_eq!(json["model"], "PlayDialog");
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["speed"], 1.0);
    }
}
