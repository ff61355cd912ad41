// Amazon Translate over its JSON 1.1 API, signed with AWS Signature V4

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::AmazonConfig;
use crate::error::{LingoError, Result};
use super::TranslationEngine;

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "translate";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const TARGET_PREFIX: &str = "AWSShineFrontendService_20170701";

#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TranslateTextRequest<'a> {
    text: &'a str,
    source_language_code: &'a str,
    target_language_code: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TranslateTextResponse {
    translated_text: String,
}

/// Cloud machine-translation engine; one API call per string
pub struct AmazonEngine {
    client: Client,
    config: AmazonConfig,
    credentials: AwsCredentials,
    endpoint: Url,
}

impl AmazonEngine {
    pub fn new(config: AmazonConfig, credentials: AwsCredentials) -> Result<Self> {
        let endpoint = match &config.endpoint {
            Some(url) => url.clone(),
            None => format!("https://translate.{}.amazonaws.com/", config.region),
        };
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| LingoError::Config(format!("Invalid Amazon Translate endpoint '{}': {}", endpoint, e)))?;

        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            client,
            config,
            credentials,
            endpoint,
        })
    }

    fn host(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    async fn call(&self, action: &str, body: String) -> Result<String> {
        let now = Utc::now();
        let target = format!("{}.{}", TARGET_PREFIX, action);
        let authorization = authorization_header(
            &self.credentials,
            &self.config.region,
            &self.host(),
            &target,
            &body,
            now,
        )?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-date", amz_date(now))
            .header("x-amz-target", &target)
            .header("authorization", authorization)
            .body(body)
            .send()
            .await
            .map_err(|e| LingoError::Engine(format!("Amazon Translate request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LingoError::Engine(format!("Amazon Translate error {}: {}", status, text)));
        }
        Ok(text)
    }
}

fn amz_date(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| LingoError::Engine(format!("Failed to initialise request signer: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derive the SigV4 signing key for one day, region and service.
fn signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn authorization_header(
    credentials: &AwsCredentials,
    region: &str,
    host: &str,
    target: &str,
    body: &str,
    now: DateTime<Utc>,
) -> Result<String> {
    let amz_date = amz_date(now);
    let date = now.format("%Y%m%d").to_string();
    let signed_headers = "content-type;host;x-amz-date;x-amz-target";

    let canonical_request = format!(
        "POST\n/\n\ncontent-type:{}\nhost:{}\nx-amz-date:{}\nx-amz-target:{}\n\n{}\n{}",
        CONTENT_TYPE,
        host,
        amz_date,
        target,
        signed_headers,
        hex::encode(Sha256::digest(body.as_bytes()))
    );

    let scope = format!("{}/{}/{}/aws4_request", date, region, SERVICE);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{}\n{}\n{}",
        amz_date,
        scope,
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );

    let key = signing_key(&credentials.secret_key, &date, region, SERVICE)?;
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

    Ok(format!(
        "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
        credentials.access_key, scope, signed_headers, signature
    ))
}

#[async_trait]
impl TranslationEngine for AmazonEngine {
    fn name(&self) -> &'static str {
        "amazon"
    }

    fn accepts_empty_input(&self) -> bool {
        false
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>> {
        let mut translations = Vec::with_capacity(texts.len());
        for text in texts {
            let body = serde_json::to_string(&TranslateTextRequest {
                text,
                source_language_code: source_lang,
                target_language_code: target_lang,
            })?;
            let reply = self.call("TranslateText", body).await?;
            let parsed: TranslateTextResponse = serde_json::from_str(&reply)
                .map_err(|e| LingoError::Engine(format!("Failed to parse Amazon Translate response: {}", e)))?;
            debug!("Amazon Translate: {} chars -> {} chars", text.len(), parsed.translated_text.len());
            translations.push(parsed.translated_text);
        }
        Ok(translations)
    }

    async fn verify(&self) -> Result<()> {
        self.call("ListLanguages", "{\"MaxResults\": 1}".to_string())
            .await
            .map_err(|e| LingoError::Credentials(format!("AWS credential verification failed: {}", e)))?;
        info!("AWS credentials verified for region {}", self.config.region);
        Ok(())
    }
}
