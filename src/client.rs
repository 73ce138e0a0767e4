use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Model;
use crate::prompt::{self, SYSTEM_PROMPT};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const WEB_SEARCH_BETA: &str = "web-search-2025-03-05";
const WEB_SEARCH_TOOL_TYPE: &str = "web_search_20250305";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 2000;
const REQUEST_TIMEOUT_SECS: u64 = 180;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("ANTHROPIC_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("invalid API key")]
    Auth,

    #[error("rate limited after {retries} attempts")]
    RateLimited { retries: u32 },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model returned no text content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    tools: Vec<ToolSpec<'a>>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct ToolSpec<'a> {
    #[serde(rename = "type")]
    tool_type: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Usage,
}

/// Web-search turns interleave tool-use and search-result blocks with the
/// text blocks; only the latter carry the markdown we parse.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// What the rest of the tool needs from one web-search-augmented call.
#[derive(Debug)]
pub struct ApiResponse {
    pub text: String,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

/// Wraps the Anthropic Messages API with the web_search tool attached.
/// Retries 429 and 5xx with exponential backoff; auth failures surface as
/// their own category so the shell can tell the user to fix the key.
pub struct ResearchClient {
    client: Client,
    api_key: String,
}

impl ResearchClient {
    pub fn from_env() -> Result<Self, ClientError> {
        let api_key =
            std::env::var("ANTHROPIC_API_KEY").map_err(|_| ClientError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// One research call: build the prompt, hit the API, join text blocks.
    pub async fn research(
        &self,
        narrative: &str,
        model: Model,
    ) -> Result<ApiResponse, ClientError> {
        let user_prompt = prompt::build_prompt(narrative);
        let body = MessagesRequest {
            model: model.id(),
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT,
            tools: vec![ToolSpec {
                tool_type: WEB_SEARCH_TOOL_TYPE,
                name: "web_search",
            }],
            messages: vec![Message {
                role: "user",
                content: &user_prompt,
            }],
        };

        let started = Instant::now();
        let response = self.send_with_retry(&body).await?;
        debug!(
            "Model call finished in {:.1}s (model {})",
            started.elapsed().as_secs_f64(),
            model.id()
        );

        let text = join_text_blocks(&response.content);
        if text.is_empty() {
            return Err(ClientError::EmptyContent);
        }
        Ok(ApiResponse {
            text,
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
        })
    }

    async fn send_with_retry(
        &self,
        body: &MessagesRequest<'_>,
    ) -> Result<MessagesResponse, ClientError> {
        let mut last_error: Option<ClientError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt - 1));
                warn!(
                    "Model call attempt {}/{} failed, backing off {:.1}s",
                    attempt,
                    MAX_RETRIES,
                    backoff.as_secs_f64()
                );
                tokio::time::sleep(backoff).await;
            }

            let response = self
                .client
                .post(API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("anthropic-beta", WEB_SEARCH_BETA)
                .json(body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ClientError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(ClientError::Auth);
            }

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!("Model API returned {}: {}", status, message);
                last_error = Some(if status == StatusCode::TOO_MANY_REQUESTS {
                    ClientError::RateLimited {
                        retries: MAX_RETRIES,
                    }
                } else {
                    ClientError::Api {
                        status: status.as_u16(),
                        message,
                    }
                });
                continue;
            }

            if !status.is_success() {
                let raw = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&raw)
                    .map(|e| e.error.message)
                    .unwrap_or(raw);
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            return Ok(response.json().await?);
        }

        Err(last_error.unwrap_or(ClientError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

fn join_text_blocks(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter(|b| b.block_type == "text")
        .filter_map(|b| b.text.as_deref())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
