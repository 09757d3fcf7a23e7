//! Vision-model moderation client using the Anthropic Messages API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use story_core::{ModerationConfig, StoryError, Verdict};
use story_media::EncodedStill;

const API_VERSION: &str = "2023-06-01";

/// Fixed system instruction: the six violation categories and the platform's
/// allowed content domains.
const SYSTEM_PROMPT: &str = "\
You are a content moderator for a beauty services marketplace. Users post \
short stories showing their work: haircuts, coloring, manicures, pedicures, \
facials, massages, makeup, styling, skincare, waxing, and brow/lash services. \
Review the attached image and judge it against these six violation categories:\n\
1. nudity: nudity or sexually explicit content\n\
2. profanity: visible profane or offensive language\n\
3. violence: violence, gore, or threatening imagery\n\
4. illegalItems: weapons, drugs, or other illegal items\n\
5. contactInfo: phone numbers, emails, social handles, or other contact details\n\
6. offTopic: content unrelated to the allowed beauty service domains\n\
Respond with a single JSON object and nothing else:\n\
{\"moderationStatus\": \"safe\" | \"unsafe\", \
\"moderationReasons\": [string], \
\"contentType\": string, \
\"tags\": [string], \
\"confidence\": number, \
\"flaggedCategories\": {\"nudity\": bool, \"profanity\": bool, \"violence\": bool, \
\"illegalItems\": bool, \"contactInfo\": bool, \"offTopic\": bool}}";

const IMAGE_INSTRUCTION: &str =
    "Classify this image that a user selected for their story post.";
const VIDEO_FRAME_INSTRUCTION: &str =
    "Classify this still frame sampled from a short video the user selected for their story post.";

// Messages API request/response structures
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: String,
    media_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlockResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResponse {
    Text { text: String },
}

/// Classifies one encoded still into a moderation verdict
#[async_trait]
pub trait ModerationProvider: Send + Sync {
    async fn classify(&self, still: &EncodedStill) -> Result<Verdict, StoryError>;
}

pub struct ModerationClient {
    config: ModerationConfig,
    http_client: reqwest::Client,
}

impl ModerationClient {
    pub fn new(config: ModerationConfig) -> Result<Self, StoryError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| StoryError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.config.api_base)
    }

    fn build_request(&self, still: &EncodedStill) -> MessagesRequest {
        let instruction = if still.from_video {
            VIDEO_FRAME_INSTRUCTION
        } else {
            IMAGE_INSTRUCTION
        };

        MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![MessageParam {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64".to_string(),
                            media_type: still.media_type.clone(),
                            data: still.base64_data.clone(),
                        },
                    },
                    ContentBlock::Text {
                        text: instruction.to_string(),
                    },
                ],
            }],
        }
    }

    /// Strip markdown code fences the endpoint sometimes wraps around the
    /// verdict JSON
    fn strip_code_fences(text: &str) -> &str {
        if text.contains("```json") {
            text.split("```json")
                .nth(1)
                .and_then(|s| s.split("```").next())
                .unwrap_or(text)
                .trim()
        } else if text.contains("```") {
            text.split("```")
                .nth(1)
                .and_then(|s| s.split("```").next())
                .unwrap_or(text)
                .trim()
        } else {
            text.trim()
        }
    }

    fn parse_verdict(text: &str) -> Result<Verdict, StoryError> {
        let json_text = Self::strip_code_fences(text);
        serde_json::from_str(json_text)
            .map_err(|e| StoryError::Format(format!("verdict JSON did not parse: {}", e)))
    }
}

#[async_trait]
impl ModerationProvider for ModerationClient {
    async fn classify(&self, still: &EncodedStill) -> Result<Verdict, StoryError> {
        // Credential check happens before any network traffic.
        self.config
            .validate()
            .map_err(|e| StoryError::Configuration(e.to_string()))?;

        tracing::info!(
            model = %self.config.model,
            media_type = %still.media_type,
            from_video = still.from_video,
            "Sending still for moderation"
        );

        let body = self.build_request(still);
        let response = self
            .http_client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                StoryError::Internal(format!("Failed to reach moderation endpoint: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let body = if status.as_u16() == 404 {
                format!(
                    "{}; model '{}' may be invalid or unavailable",
                    error_text, self.config.model
                )
            } else {
                error_text
            };
            tracing::warn!(status = %status, "Moderation endpoint returned an error");
            return Err(StoryError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            StoryError::Format(format!("moderation response did not parse: {}", e))
        })?;

        let text: String = parsed
            .content
            .into_iter()
            .map(|b| match b {
                ContentBlockResponse::Text { text } => text,
            })
            .collect();

        let verdict = Self::parse_verdict(&text)?;
        tracing::info!(
            status = %verdict.moderation_status,
            confidence = verdict.confidence,
            "Moderation verdict received"
        );
        Ok(verdict)
    }
}
