//! [`TextGenerator`] backed by an OpenAI-compatible `chat/completions`
//! endpoint.
//!
//! Uses the blocking `reqwest` client because the precompile runs on the VM
//! thread. Do not call it from inside an async runtime worker.

use reqwest::{StatusCode, blocking::Client};
use serde::{Deserialize, Serialize};

use crate::{
    errors::GenerationError,
    generation::{GenerationContext, GenerationRequest, GenerationResponse, TextGenerator},
};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: Client,
}

impl OpenAiGenerator {
    pub fn new() -> Result<Self, GenerationError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GenerationError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize, Debug)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

impl TextGenerator for OpenAiGenerator {
    fn generate(
        &self,
        context: &GenerationContext<'_>,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let timeout = context.remaining().ok_or(GenerationError::Timeout)?;
        let url = context
            .api_url
            .join(CHAT_COMPLETIONS_PATH)
            .map_err(|e| GenerationError::Network(format!("invalid endpoint: {e}")))?;

        let body = ChatCompletionRequest {
            model: context.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(context.credential.expose())
            .timeout(timeout)
            .json(&body)
            .send()
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().unwrap_or_default();
            return Err(classify_status(status, &raw));
        }

        let raw = response.text().map_err(classify_transport_error)?;
        parse_completion(&raw)
    }
}

fn classify_transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Network(err.to_string())
    }
}

fn classify_status(status: StatusCode, raw_body: &str) -> GenerationError {
    let message = provider_error_message(raw_body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GenerationError::Authentication(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GenerationError::Timeout,
        _ => GenerationError::Provider {
            status: status.as_u16(),
            message,
        },
    }
}

/// Extracts `error.message` from a provider error body, falling back to the
/// raw body.
fn provider_error_message(raw_body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(raw_body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| raw_body.to_string())
}

fn parse_completion(raw_body: &str) -> Result<GenerationResponse, GenerationError> {
    let completion: ChatCompletionResponse = serde_json::from_str(raw_body)
        .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| GenerationResponse { text })
        .ok_or_else(|| GenerationError::InvalidResponse("no message content".to_string()))
}
