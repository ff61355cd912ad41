use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::config::LocalModelConfig;
use crate::error::{LingoError, Result};
use crate::language::LanguageNames;
use super::TranslationEngine;
use super::prompt::{clean_model_output, single_prompt};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

/// Locally hosted model served through the Ollama generate API
pub struct LocalEngine {
    client: Client,
    config: LocalModelConfig,
    names: LanguageNames,
}

impl LocalEngine {
    pub fn new(config: LocalModelConfig, names: LanguageNames) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // local generation can be slow
            .build()?;

        Ok(Self { client, config, names })
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'));
        debug!("Sending generate request to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LingoError::Engine(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LingoError::Engine(format!("Ollama API error {}: {}", status, error_text)));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LingoError::Engine(format!("Failed to parse response: {}", e)))?;

        debug!("Raw model response: {}", generated.response);
        Ok(clean_model_output(&generated.response))
    }
}

#[async_trait]
impl TranslationEngine for LocalEngine {
    fn name(&self) -> &'static str {
        "local"
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
        let mut translations = Vec::with_capacity(texts.len());
        for text in texts {
            if text.trim().is_empty() {
                translations.push(String::new());
                continue;
            }
            let prompt = single_prompt(&self.names, text, source_lang, target_lang);
            translations.push(self.generate(prompt).await?);
        }
        Ok(translations)
    }

    /// Check the endpoint is up and the model has been pulled
    async fn verify(&self) -> Result<()> {
        let url = format!("{}/api/show", self.config.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&json!({ "name": self.config.model }))
            .send()
            .await
            .map_err(|e| LingoError::Engine(format!("Failed to connect to Ollama: {}", e)))?;

        if response.status().is_success() {
            info!("Local model '{}' is available", self.config.model);
            Ok(())
        } else {
            Err(LingoError::Engine(format!(
                "Local model '{}' not found. Please pull the model first: ollama pull {}",
                self.config.model, self.config.model
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn engine(endpoint: String) -> LocalEngine {
        let config = LocalModelConfig {
            endpoint,
            ..LocalModelConfig::default()
        };
        LocalEngine::new(config, LanguageNames::default()).unwrap()
    }

    #[tokio::test]
    async fn one_generate_call_per_non_blank_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": "Translation: \"Hola\"", "done": true})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let texts = vec!["Hello".to_string(), "".to_string(), "Hi".to_string()];
        let out = engine(server.uri()).translate_batch(&texts, "en", "es").await.unwrap();
        assert_eq!(out, vec!["Hola", "", "Hola"]);
    }

    #[tokio::test]
    async fn missing_model_fails_verification() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/show"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = engine(server.uri()).verify().await.unwrap_err();
        assert!(matches!(err, LingoError::Engine(msg) if msg.contains("ollama pull")));
    }
}
