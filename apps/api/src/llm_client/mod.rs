//! LLM client — the single point of entry for all model calls in TruthHire.
//!
//! No other module may talk to the provider directly; the analysis engines
//! build prompts and go through `LlmClient`. The provider speaks the
//! OpenAI-compatible chat-completions protocol and is treated as a black
//! box: prompt in, JSON-ish text out, fallible.

use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// The model used for every analysis call. Hardcoded so prompt tuning and
/// model choice cannot drift apart silently.
pub const MODEL: &str = "llama-3.3-70b-versatile";

const MAX_RETRIES: u32 = 3;

/// Hard ceiling on a single round trip. A hung provider must surface as a
/// normal failure, never an indefinitely blocked request handler.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No JSON object found in LLM response")]
    NoJsonObject,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the assistant text from the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Shared client wrapping the chat-completions API with a bounded timeout,
/// retry on 429/5xx, and a JSON-decoding helper with brace-window repair.
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a raw chat call, requesting a JSON-object response.
    /// Retries on 429 and 5xx with exponential backoff.
    pub async fn chat(&self, prompt: &str, temperature: f32) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(CHAT_COMPLETIONS_URL)
                .bearer_auth(&self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ProviderError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Calls the model and decodes the response text as `T`.
    ///
    /// The response is untrusted: code fences are stripped and, if the text
    /// is not valid JSON on its own, the outermost brace-delimited window is
    /// tried once. Anything past that is a typed error, not a guess.
    pub async fn chat_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<T, LlmError> {
        let response = self.chat(prompt, temperature).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        let repaired = recover_json(text).ok_or(LlmError::NoJsonObject)?;
        serde_json::from_str(repaired).map_err(LlmError::Parse)
    }
}

/// Locates a parseable JSON document inside model output.
///
/// Tries the fence-stripped text as-is, then the substring from the first
/// `{` to the last `}`. Returns `None` when neither parses.
pub fn recover_json(text: &str) -> Option<&str> {
    let text = strip_json_fences(text);
    if serde_json::from_str::<serde_json::Value>(text).is_ok() {
        return Some(text);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    let window = &text[start..=end];
    serde_json::from_str::<serde_json::Value>(window)
        .ok()
        .map(|_| window)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    for prefix in ["```json", "```"] {
        if let Some(stripped) = text.strip_prefix(prefix) {
            return stripped
                .trim_start()
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or(stripped.trim_start());
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_recover_json_direct_parse() {
        let input = r#"{"score": 80}"#;
        assert_eq!(recover_json(input), Some(input));
    }

    #[test]
    fn test_recover_json_prose_wrapped() {
        let input = r#"Here is the analysis you asked for: {"score": 80} Hope that helps!"#;
        assert_eq!(recover_json(input), Some(r#"{"score": 80}"#));
    }

    #[test]
    fn test_recover_json_fenced_and_wrapped() {
        let input = "```json\nSure!{\"ok\": true}\n```";
        assert_eq!(recover_json(input), Some("{\"ok\": true}"));
    }

    #[test]
    fn test_recover_json_no_braces_is_none() {
        assert_eq!(recover_json("the model refused to answer"), None);
    }

    #[test]
    fn test_recover_json_unbalanced_garbage_is_none() {
        assert_eq!(recover_json("{ this is } not { json"), None);
    }

    #[test]
    fn test_chat_response_text_extraction() {
        let json = r#"{
            "choices": [{"message": {"content": "hello"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("hello"));
    }

    #[test]
    fn test_chat_response_empty_choices() {
        let json = r#"{"choices": [], "usage": null}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), None);
    }
}
