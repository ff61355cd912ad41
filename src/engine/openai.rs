use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::OpenAiConfig;
use crate::error::{LingoError, Result};
use crate::language::LanguageNames;
use super::TranslationEngine;
use super::prompt::{OPENAI_SYSTEM_PROMPT, batch_prompt};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_format: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Cloud LLM engine backed by the chat completions API
pub struct OpenAiEngine {
    client: Client,
    config: OpenAiConfig,
    api_key: String,
    names: LanguageNames,
}

impl OpenAiEngine {
    pub fn new(config: OpenAiConfig, api_key: String, names: LanguageNames) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
            names,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    async fn complete(&self, prompt: String) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: OPENAI_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: json!({"type": "json_object"}),
        };

        let url = self.url("chat/completions");
        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LingoError::Engine(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LingoError::Engine(format!("OpenAI API error {}: {}", status, error_text)));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LingoError::Engine(format!("Failed to parse OpenAI response: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| LingoError::Engine("OpenAI response contained no choices".to_string()))
    }
}

/// Map model output back onto the input positions.
///
/// Blank inputs map to `""`. Positions the model skipped, or filled with
/// anything but a string, keep the source text. JSON replies are read from
/// their `translations` array (a bare array is accepted too); only output
/// that is not JSON at all is split into lines.
fn distribute_translations(texts: &[String], content: &str) -> Vec<String> {
    let translated: Vec<Option<String>> = match serde_json::from_str::<Value>(content) {
        Ok(reply) => {
            let items = match &reply {
                Value::Array(items) => Some(items),
                other => other.get("translations").and_then(Value::as_array),
            };
            match items {
                Some(items) => items.iter().map(|item| item.as_str().map(str::to_string)).collect(),
                None => {
                    warn!("OpenAI reply has no translations array, keeping source texts");
                    Vec::new()
                }
            }
        }
        Err(_) => {
            warn!("OpenAI returned non-JSON response, using line fallback");
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| Some(line.to_string()))
                .collect()
        }
    };

    let mut translated = translated.into_iter();
    texts
        .iter()
        .map(|original| {
            if original.trim().is_empty() {
                String::new()
            } else {
                translated.next().flatten().unwrap_or_else(|| original.clone())
            }
        })
        .collect()
}

#[async_trait]
impl TranslationEngine for OpenAiEngine {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn accepts_empty_input(&self) -> bool {
        true
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>> {
        let non_empty: Vec<String> = texts.iter().filter(|t| !t.trim().is_empty()).cloned().collect();
        if non_empty.is_empty() {
            return Ok(vec![String::new(); texts.len()]);
        }

        let prompt = batch_prompt(&self.names, &non_empty, source_lang, target_lang);
        let content = self.complete(prompt).await?;
        debug!("Raw OpenAI response: {}", content);

        Ok(distribute_translations(texts, &content))
    }

    async fn verify(&self) -> Result<()> {
        let response = self
            .client
            .get(self.url("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| LingoError::Engine(format!("Failed to connect to OpenAI: {}", e)))?;

        if response.status().is_success() {
            info!("OpenAI key verified");
            Ok(())
        } else {
            Err(LingoError::Credentials(format!(
                "OpenAI key verification failed: {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn engine(endpoint: String) -> OpenAiEngine {
        let config = OpenAiConfig {
            endpoint,
            ..OpenAiConfig::default()
        };
        OpenAiEngine::new(config, "sk-test".to_string(), LanguageNames::default()).unwrap()
    }

    fn chat_reply(content: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    #[test]
    fn blank_inputs_map_to_empty_strings() {
        let texts = vec!["Hi".to_string(), " ".to_string(), "Bye".to_string()];
        let out = distribute_translations(&texts, r#"{"translations": ["Salut", "Au revoir"]}"#);
        assert_eq!(out, vec!["Salut", "", "Au revoir"]);
    }

    #[test]
    fn short_reply_keeps_source_text() {
        let texts = vec!["Hi".to_string(), "Bye".to_string()];
        let out = distribute_translations(&texts, r#"{"translations": ["Salut"]}"#);
        assert_eq!(out, vec!["Salut", "Bye"]);
    }

    #[test]
    fn non_json_reply_splits_lines() {
        let texts = vec!["Hi".to_string(), "Bye".to_string()];
        let out = distribute_translations(&texts, "Salut\nAu revoir\n");
        assert_eq!(out, vec!["Salut", "Au revoir"]);
    }

    #[test]
    fn bare_json_array_is_read_as_translations() {
        let texts = vec!["Hello".to_string(), "World".to_string()];
        let out = distribute_translations(&texts, "[\n  \"Bonjour\",\n  \"Monde\"\n]");
        assert_eq!(out, vec!["Bonjour", "Monde"]);
    }

    #[test]
    fn non_string_entries_keep_source_text() {
        let texts = vec!["Hello".to_string(), "World".to_string(), "Again".to_string()];
        let out = distribute_translations(&texts, r#"{"translations": ["Bonjour", null, 3]}"#);
        assert_eq!(out, vec!["Bonjour", "World", "Again"]);
    }

    #[test]
    fn json_without_translations_keeps_source_text() {
        let texts = vec!["Hello".to_string(), "World".to_string()];
        let out = distribute_translations(&texts, r#"{"result": "Bonjour"}"#);
        assert_eq!(out, vec!["Hello", "World"]);
    }

    #[tokio::test]
    async fn sends_one_request_per_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(chat_reply(r#"{"translations": ["Bonjour", "Monde"]}"#)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let texts = vec!["Hello".to_string(), "World".to_string()];
        let out = engine(server.uri()).translate_batch(&texts, "en", "fr").await.unwrap();
        assert_eq!(out, vec!["Bonjour", "Monde"]);
    }

    #[tokio::test]
    async fn api_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let texts = vec!["Hello".to_string()];
        let err = engine(server.uri()).translate_batch(&texts, "en", "fr").await.unwrap_err();
        assert!(matches!(err, LingoError::Engine(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn all_blank_batch_skips_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let texts = vec!["".to_string(), "  ".to_string()];
        let out = engine(server.uri()).translate_batch(&texts, "en", "fr").await.unwrap();
        assert_eq!(out, vec!["", ""]);
    }

    #[tokio::test]
    async fn verify_checks_model_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = engine(server.uri()).verify().await.unwrap_err();
        assert!(matches!(err, LingoError::Credentials(_)));
    }
}
