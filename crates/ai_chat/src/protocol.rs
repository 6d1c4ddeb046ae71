//! OpenAI-compatible chat-completions wire types, shared by both localities

use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::ports::WireMessage;

/// Request body for a chat completion
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
}

/// Response body of a chat completion
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    pub content: String,
}

impl ChatCompletionResponse {
    /// Extract the first choice's reply text
    pub(crate) fn into_reply(self) -> Result<String, ChatError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ChatError::InvalidResponse("response contained no choices".to_string()))
    }
}

/// Map a non-success HTTP response to a typed error, consuming the body
pub(crate) async fn error_for_status(response: reqwest::Response) -> ChatError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ChatError::ServerError {
        status,
        body: body.chars().take(500).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_reply_returns_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"Hello!"}},{"message":{"content":"other"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_reply().unwrap(), "Hello!");
    }

    #[test]
    fn into_reply_fails_on_empty_choices() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            response.into_reply(),
            Err(ChatError::InvalidResponse(_))
        ));
    }

    #[test]
    fn request_serializes_model_and_messages() {
        let request = ChatCompletionRequest {
            model: "llama3:8b".to_string(),
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: "Hi".to_string(),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3:8b");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn response_ignores_extra_fields() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"id":"x","object":"chat.completion","choices":[{"index":0,"message":{"role":"assistant","content":"ok"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_reply().unwrap(), "ok");
    }
}
