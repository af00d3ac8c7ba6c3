/**
 * Image Generation
 *
 * Cover art and stamp stickers come from a text-to-image model; stamp
 * prompts are derived from the visitor's photo by a vision model.
 *
 * # Hyperbolic API
 *
 * - `POST {base}/v1/image/generation` - returns `images[0].image`, a
 *   base64-encoded PNG
 * - `POST {base}/v1/chat/completions` - OpenAI-style chat; the reference
 *   photo is sent as a `data:` URL image part
 *
 * Both calls authenticate with `Authorization: Bearer {api_key}`.
 */

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::AppConfig;

/// Instruction sent with the reference photo
pub const DESCRIBE_PROMPT: &str =
    "Describe this image to someone who would draw it without the reference image. Make sure to be detailed.";

/// Output dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const COVER: ImageSize = ImageSize { width: 1024, height: 1024 };
    pub const STAMP: ImageSize = ImageSize { width: 512, height: 512 };
}

/// Generation failures
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid base64 image: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Text-to-image and image-to-text models
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Render `prompt` and return the encoded image bytes
    async fn generate_image(&self, prompt: &str, size: ImageSize) -> Result<Vec<u8>, GenerationError>;

    /// Describe an image in enough detail to redraw it
    async fn describe_image(&self, image: &[u8], content_type: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model_name: &'a str,
    prompt: &'a str,
    steps: u32,
    cfg_scale: f32,
    enable_refiner: bool,
    height: u32,
    width: u32,
    backend: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    images: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    image: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<VisionMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct VisionMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Hyperbolic image and vision client
#[derive(Debug, Clone)]
pub struct HyperbolicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    image_model: String,
    vision_model: String,
}

impl HyperbolicClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        image_model: impl Into<String>,
        vision_model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            image_model: image_model.into(),
            vision_model: vision_model.into(),
        })
    }

    /// Build a client when an API key is configured
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, GenerationError> {
        let Some(api_key) = config.hyperbolic_api_key.as_deref() else {
            tracing::warn!("HYPERBOLIC_API_KEY not set. Image generation will be disabled.");
            return Ok(None);
        };
        Self::new(
            &config.hyperbolic_base_url,
            api_key,
            config.image_model.clone(),
            config.vision_model.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
        .map(Some)
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, GenerationError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ImageGenerator for HyperbolicClient {
    async fn generate_image(&self, prompt: &str, size: ImageSize) -> Result<Vec<u8>, GenerationError> {
        let request = ImageGenerationRequest {
            model_name: &self.image_model,
            prompt,
            steps: 30,
            cfg_scale: 5.0,
            enable_refiner: false,
            height: size.height,
            width: size.width,
            backend: "auto",
        };
        tracing::debug!(model = %self.image_model, width = size.width, height = size.height, "generating image");

        let response: ImageGenerationResponse = self.post("/v1/image/generation", &request).await?;
        let encoded = response
            .images
            .into_iter()
            .next()
            .and_then(|image| image.image)
            .ok_or_else(|| GenerationError::MalformedResponse("no image in response".to_string()))?;

        Ok(STANDARD.decode(encoded.trim())?)
    }

    async fn describe_image(&self, image: &[u8], content_type: &str) -> Result<String, GenerationError> {
        let data_url = format!("data:{};base64,{}", content_type, STANDARD.encode(image));
        let request = ChatCompletionRequest {
            model: &self.vision_model,
            messages: vec![VisionMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: DESCRIBE_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            max_tokens: 2048,
            temperature: 0.7,
            top_p: 0.9,
        };

        let response: ChatCompletionResponse = self.post("/v1/chat/completions", &request).await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| GenerationError::MalformedResponse("no description in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HyperbolicClient {
        HyperbolicClient::new(
            &server.uri(),
            "test-key",
            "FLUX.1-dev",
            "vision-model",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_image_decodes_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/image/generation"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model_name": "FLUX.1-dev",
                "prompt": "make an illustration of Austin, TX, include landmarks",
                "height": 1024,
                "width": 1024,
                "backend": "auto"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "images": [{ "image": STANDARD.encode(b"fake-png") }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let bytes = client(&server)
            .generate_image("make an illustration of Austin, TX, include landmarks", ImageSize::COVER)
            .await
            .unwrap();
        assert_eq!(bytes, b"fake-png");
    }

    #[tokio::test]
    async fn test_generate_image_without_images_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/image/generation"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "images": [] })))
            .mount(&server)
            .await;

        let err = client(&server).generate_image("x", ImageSize::STAMP).await.unwrap_err();
        assert_matches!(err, GenerationError::MalformedResponse(_));
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = client(&server).generate_image("x", ImageSize::STAMP).await.unwrap_err();
        assert_matches!(err, GenerationError::Status { status: 429, .. });
    }

    #[tokio::test]
    async fn test_describe_image_sends_data_url() {
        let server = MockServer::start().await;
        let data_url = format!("data:image/jpeg;base64,{}", STANDARD.encode(b"photo"));
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({
                "model": "vision-model",
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": DESCRIBE_PROMPT },
                        { "type": "image_url", "image_url": { "url": data_url } }
                    ]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "  A stone mission facade.  " } }]
            })))
            .mount(&server)
            .await;

        let description = client(&server).describe_image(b"photo", "image/jpeg").await.unwrap();
        assert_eq!(description, "A stone mission facade.");
    }
}
