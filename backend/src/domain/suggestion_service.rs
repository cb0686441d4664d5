//! Adapter for the external generative-AI suggestion service.
//!
//! Takes a recorded voice note, asks the Gemini REST API to transcribe it and
//! produce a short resolution suggestion. Single best-effort call: any
//! failure, including a missing API key, yields an empty suggestion.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

const GEMINI_MODEL: &str = "gemini-1.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const INSTRUCTION: &str = "Transcribe the audio and produce a short resolution suggestion \
    (max 2 sentences) for the problem described. Return only the suggestion text.";

/// Service that turns a voice note into a short textual suggestion
#[derive(Clone)]
pub struct SuggestionService {
    client: Client,
    api_key: Option<String>,
}

impl SuggestionService {
    /// Create a new SuggestionService. `None` disables the feature; callers
    /// then always get an empty suggestion.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Whether the external service is configured at all
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Get a suggestion for the recorded audio. Returns an empty string when
    /// the service is unconfigured or the call fails for any reason.
    pub async fn get_suggestion(&self, audio: &[u8], mime_type: &str) -> String {
        let Some(api_key) = &self.api_key else {
            warn!("Suggestion service not configured, skipping call");
            return String::new();
        };

        if audio.is_empty() {
            return String::new();
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Text {
                        text: INSTRUCTION.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineDataPayload {
                            mime_type: mime_type.to_string(),
                            data: BASE64_STANDARD.encode(audio),
                        },
                    },
                ],
            }],
        };

        match self.send_request(api_key, &request).await {
            Ok(text) => text,
            Err(e) => {
                error!("Suggestion request failed: {}", e);
                String::new()
            }
        }
    }

    async fn send_request(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> anyhow::Result<String> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = GEMINI_MODEL,
            api_key = api_key
        );

        let response = self.client.post(url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API returned {}: {}", status, body);
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(extract_text(parsed).unwrap_or_default())
    }
}

fn extract_text(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}
