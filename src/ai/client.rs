//! OpenRouter API client

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::constants::{AI_APP_TITLE, OPENROUTER_URL};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("OpenRouter API error ({status}): {body}")]
    Status { status: StatusCode, body: String },
    #[error("no response content from AI")]
    Empty,
}

impl ClientError {
    /// Network failures, rate limits and server errors are worth retrying
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::Empty => false,
        }
    }
}

/// OpenRouter client for chat completions
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    pub async fn complete(
        &self,
        system_prompt: &str,
        user_content: &str,
        max_tokens: u32,
    ) -> Result<String, ClientError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: system_prompt,
                },
                Message {
                    role: "user",
                    content: user_content,
                },
            ],
            max_tokens,
        };

        let response = self
            .client
            .post(OPENROUTER_URL)
            .bearer_auth(&self.api_key)
            .header("X-Title", AI_APP_TITLE)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ClientError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let limited = ClientError::Status {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        let unavailable = ClientError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        let unauthorized = ClientError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: "bad key".to_string(),
        };

        assert!(limited.is_transient());
        assert!(unavailable.is_transient());
        assert!(!unauthorized.is_transient());
        assert!(!ClientError::Empty.is_transient());
        assert_eq!(
            unauthorized.to_string(),
            "OpenRouter API error (401 Unauthorized): bad key"
        );
    }
}
