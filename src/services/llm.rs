use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};

use crate::config::Config;
use crate::error::GenerationError;
use crate::models::gemini::{
    Blob, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part, Role,
};
use crate::models::{AiResponse, SubmitRequest};
use crate::services::prompt;
use crate::utils::strip_json_fence;

/// Anything that can turn one submission into one study result.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_content(
        &self,
        request: &SubmitRequest,
    ) -> Result<AiResponse, GenerationError>;
}

pub struct LLMClient {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
}

impl LLMClient {
    pub fn new(config: &Config) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(LLMClient {
            client,
            api_url: config.generate_url(),
            api_key: config.api_key.clone(),
        })
    }

    /// Builds the `generateContent` body: inline file first, then the text.
    pub fn build_request(request: &SubmitRequest) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(2);

        if let Some(file) = request.attachment.as_ref().filter(|f| !f.bytes.is_empty()) {
            parts.push(Part::InlineData {
                inline_data: Blob {
                    mime_type: file.media_type.clone(),
                    data: STANDARD.encode(&file.bytes),
                },
            });
        }

        let text = if request.prompt.is_empty() {
            prompt::FALLBACK_PROMPT.to_string()
        } else {
            request.prompt.clone()
        };
        parts.push(Part::Text { text });

        GenerateContentRequest {
            contents: vec![Content {
                role: Some(Role::User),
                parts,
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::Text {
                    text: prompt::system_instruction(request.mode),
                }],
            }),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(prompt::response_schema()),
            }),
        }
    }

    /// Parses the model's reply text into a study result.
    pub fn parse_reply(reply: &GenerateContentResponse) -> Result<AiResponse, GenerationError> {
        let text = reply.text().ok_or(GenerationError::EmptyReply)?;
        let response = serde_json::from_str(strip_json_fence(&text))?;
        Ok(response)
    }
}

#[async_trait]
impl ContentGenerator for LLMClient {
    async fn generate_content(
        &self,
        request: &SubmitRequest,
    ) -> Result<AiResponse, GenerationError> {
        let body = Self::build_request(request);

        let response = self
            .client
            .post(&self.api_url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let reply: GenerateContentResponse =
            serde_json::from_str(&response_text).map_err(|e| GenerationError::Parse {
                message: format!("unexpected envelope: {e}"),
            })?;

        tracing::debug!(
            model_version = reply.model_version.as_deref().unwrap_or("unknown"),
            candidates = reply.candidates.len(),
            "Received generateContent reply"
        );

        Self::parse_reply(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppMode, Attachment};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> Config {
        let uri = server.uri();
        Config::from_lookup(move |name| match name {
            "GEMINI_API_KEY" => Some("test-key".to_string()),
            "GEMINI_BASE_URL" => Some(uri.clone()),
            _ => None,
        })
        .unwrap()
    }

    fn reply_with_text(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-2.5-flash"
        })
    }

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    #[test]
    fn test_inline_file_precedes_text_and_placeholder_fills_empty_prompt() {
        let request = SubmitRequest {
            prompt: String::new(),
            mode: AppMode::PaperChecker,
            attachment: Some(Attachment {
                bytes: vec![1, 2, 3],
                media_type: "application/pdf".into(),
                file_name: Some("paper.pdf".into()),
            }),
        };

        let body = serde_json::to_value(LLMClient::build_request(&request)).unwrap();
        assert_eq!(
            body["contents"][0]["parts"],
            json!([
                {"inlineData": {"mimeType": "application/pdf", "data": "AQID"}},
                {"text": "Analyze this content."}
            ])
        );
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"],
            prompt::response_schema()
        );
        let instruction = body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap();
        assert!(instruction.contains(prompt::mode_addendum(AppMode::PaperChecker)));
    }

    #[test]
    fn test_text_only_request_has_single_part() {
        let request = SubmitRequest {
            prompt: "Newton's laws".into(),
            ..Default::default()
        };
        let built = LLMClient::build_request(&request);
        assert_eq!(
            built.contents[0].parts,
            vec![Part::Text {
                text: "Newton's laws".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_generate_content_parses_reply() {
        let server = MockServer::start().await;
        let study = json!({
            "subject": "Math",
            "mcqs": [{"question": "2+2=?", "options": ["3", "4", "5"], "correctAnswer": "4"}]
        });
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(reply_with_text(&study.to_string())),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = LLMClient::new(&test_config(&server)).unwrap();
        let request = SubmitRequest {
            prompt: "2+2".into(),
            mode: AppMode::McqGenerator,
            attachment: None,
        };
        let response = client.generate_content(&request).await.unwrap();

        assert_eq!(response.subject, "Math");
        assert_eq!(response.mcq_list()[0].correct_answer, "4");
    }

    #[tokio::test]
    async fn test_fenced_reply_is_unwrapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reply_with_text("```json\n{\"subject\": \"Biology\"}\n```")),
            )
            .mount(&server)
            .await;

        let client = LLMClient::new(&test_config(&server)).unwrap();
        let request = SubmitRequest {
            prompt: "cells".into(),
            ..Default::default()
        };
        let response = client.generate_content(&request).await.unwrap();
        assert_eq!(response.subject, "Biology");
    }

    #[tokio::test]
    async fn test_invalid_json_reply_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_with_text("{not json")))
            .mount(&server)
            .await;

        let client = LLMClient::new(&test_config(&server)).unwrap();
        let request = SubmitRequest {
            prompt: "anything".into(),
            ..Default::default()
        };
        let err = client.generate_content(&request).await.unwrap_err();
        assert!(err.is_parse(), "expected parse error, got {err:?}");
    }

    #[tokio::test]
    async fn test_empty_reply_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let client = LLMClient::new(&test_config(&server)).unwrap();
        let request = SubmitRequest {
            prompt: "anything".into(),
            ..Default::default()
        };
        let err = client.generate_content(&request).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyReply));
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let client = LLMClient::new(&test_config(&server)).unwrap();
        let request = SubmitRequest {
            prompt: "anything".into(),
            ..Default::default()
        };
        let err = client.generate_content(&request).await.unwrap_err();
        assert!(err.is_transport());
        match err {
            GenerationError::Status { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "API key not valid");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let config = Config::from_lookup(|name| match name {
            "GEMINI_API_KEY" => Some("test-key".to_string()),
            "GEMINI_BASE_URL" => Some("http://127.0.0.1:1".to_string()),
            _ => None,
        })
        .unwrap();

        let client = LLMClient::new(&config).unwrap();
        let request = SubmitRequest {
            prompt: "anything".into(),
            ..Default::default()
        };
        let err = client.generate_content(&request).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport { .. }));
    }
}
