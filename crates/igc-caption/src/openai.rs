//! OpenAI chat-completions adapter.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use igc_models::{CaptionData, ContentBrief};

use crate::prompt::{
    build_caption_prompt, build_refine_prompt, parse_caption_response, parse_refined_points,
    CAPTION_SYSTEM, REFINE_SYSTEM,
};
use crate::{CaptionSupplier, SupplierError, SupplierResult};

/// Default public API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// One retry on failure; a second failure surfaces to the caller.
const MAX_ATTEMPTS: u32 = 2;

/// Request timeout. The supplier is the slowest external call in the
/// pipeline and must stay bounded.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// Chat-completions request.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat-completions response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// OpenAI-backed caption supplier.
#[derive(Debug)]
pub struct OpenAiSupplier {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    language: String,
}

impl OpenAiSupplier {
    /// Create a supplier. `api_key` comes from the environment, read once
    /// at startup by the settings loader.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        language: impl Into<String>,
    ) -> SupplierResult<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(SupplierError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(SupplierError::Request)?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: model.into(),
            language: language.into(),
        })
    }

    /// Override the endpoint (tests point this at a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// One chat call with a single retry.
    async fn chat(&self, system: &str, user: String, max_tokens: u32) -> SupplierResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.7,
            max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let mut last_error = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            debug!("AI chat call (attempt {}/{})", attempt, MAX_ATTEMPTS);

            let result = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    let parsed: ChatResponse = response.json().await?;
                    let content = parsed
                        .choices
                        .first()
                        .map(|c| c.message.content.trim().to_string())
                        .ok_or_else(|| {
                            SupplierError::MalformedResponse("empty choices".to_string())
                        })?;
                    return Ok(content);
                }
                Ok(response) => {
                    last_error = format!("HTTP {}", response.status());
                    warn!("AI call attempt {} failed: {}", attempt, last_error);
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!("AI call attempt {} failed: {}", attempt, last_error);
                }
            }
        }

        Err(SupplierError::RetriesExhausted(last_error))
    }
}

#[async_trait::async_trait]
impl CaptionSupplier for OpenAiSupplier {
    async fn generate(&self, brief: &ContentBrief) -> SupplierResult<CaptionData> {
        let prompt = build_caption_prompt(brief, &self.language);
        let response = self.chat(CAPTION_SYSTEM, prompt, 500).await?;
        Ok(parse_caption_response(&response, &brief.hashtags))
    }

    async fn refine_key_points(
        &self,
        points: &[String],
        theme: &str,
    ) -> SupplierResult<Vec<String>> {
        if points.is_empty() {
            return Ok(Vec::new());
        }
        let max_points = points.len().min(10);
        let prompt = build_refine_prompt(points, theme, max_points);
        let response = self.chat(REFINE_SYSTEM, prompt, 1000).await?;
        Ok(parse_refined_points(&response, points, max_points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use igc_models::ContentType;
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn brief() -> ContentBrief {
        ContentBrief {
            theme: "gut_health".into(),
            content_type: ContentType::Feed,
            key_points: vec!["Kombucha supports gut health.".into()],
            quote: None,
            assets: vec![],
            hashtags: vec!["#kombucha".into()],
            target_audience: vec![],
        }
    }

    fn chat_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn test_generate_parses_caption() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(
                "CAPTION: Happy gut, happy life.\nHASHTAGS:\n#gut\nCTA: Drink up!",
            )))
            .mount(&server)
            .await;

        let supplier = OpenAiSupplier::new("test-key", "gpt-4", "en")
            .unwrap()
            .with_base_url(server.uri());

        let data = supplier.generate(&brief()).await.unwrap();
        assert_eq!(data.caption, "Happy gut, happy life.");
        assert_eq!(data.hashtags, vec!["#kombucha", "#gut"]);
        assert_eq!(data.cta, "Drink up!");
    }

    #[tokio::test]
    async fn test_generate_retries_once_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_body("CAPTION: ok\nHASHTAGS:\nCTA: c")),
            )
            .mount(&server)
            .await;

        let supplier = OpenAiSupplier::new("k", "gpt-4", "en")
            .unwrap()
            .with_base_url(server.uri());

        let data = supplier.generate(&brief()).await.unwrap();
        assert_eq!(data.caption, "ok");
    }

    #[tokio::test]
    async fn test_generate_fails_after_second_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let supplier = OpenAiSupplier::new("k", "gpt-4", "en")
            .unwrap()
            .with_base_url(server.uri());

        let err = supplier.generate(&brief()).await.unwrap_err();
        assert!(matches!(err, SupplierError::RetriesExhausted(_)));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(matches!(
            OpenAiSupplier::new("", "gpt-4", "en").unwrap_err(),
            SupplierError::MissingApiKey
        ));
    }

    #[tokio::test]
    async fn test_refine_empty_points_short_circuits() {
        // No HTTP server at all: an empty input must not hit the network
        let supplier = OpenAiSupplier::new("k", "gpt-4", "en")
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        assert!(supplier
            .refine_key_points(&[], "theme")
            .await
            .unwrap()
            .is_empty());
    }
}
