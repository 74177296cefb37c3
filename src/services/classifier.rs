// Classifier Adapter
// Contract for the external span classifier, plus the HTTP-backed adapter

use crate::models::RawToken;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

const CLASSIFIER_DEFAULT_URL: &str = "http://127.0.0.1:8701/classify";
const CLASSIFIER_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("malformed classifier response: {0}")]
    Decode(String),
}

/// Contract consumed by the detection pipeline. Implementations may be slow
/// and may fail; a failed call contributes no tokens for its chunk and never
/// aborts the overall detection. Model lifecycle (loading, caching, retries,
/// health checks) stays on the implementation side of this boundary.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        chunk_text: &str,
        max_length: usize,
    ) -> Result<Vec<RawToken>, ClassifierError>;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyRequest<'a> {
    text: &'a str,
    max_length: usize,
}

/// One token prediction in the inference endpoint's wire format.
#[derive(Debug, Clone, Deserialize)]
struct TokenPrediction {
    #[serde(alias = "word")]
    token: String,
    #[serde(alias = "entity_group")]
    entity: String,
    score: f64,
    #[serde(default)]
    start: Option<usize>,
    #[serde(default)]
    end: Option<usize>,
}

impl From<TokenPrediction> for RawToken {
    fn from(p: TokenPrediction) -> Self {
        RawToken {
            fragment: p.token,
            label: p.entity,
            score: p.score,
            start: p.start,
            end: p.end,
        }
    }
}

/// Thin `reqwest` client for a token-classification inference endpoint.
pub struct HttpClassifier {
    client: Client,
    url: String,
}

impl HttpClassifier {
    pub fn new() -> Self {
        let url = env::var("PIISHIELD_CLASSIFIER_URL")
            .unwrap_or_else(|_| CLASSIFIER_DEFAULT_URL.to_string());
        Self::with_url(url)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(CLASSIFIER_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        chunk_text: &str,
        max_length: usize,
    ) -> Result<Vec<RawToken>, ClassifierError> {
        let request = ClassifyRequest {
            text: chunk_text,
            max_length,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let predictions: Vec<TokenPrediction> = response
            .json()
            .await
            .map_err(|e| ClassifierError::Decode(e.to_string()))?;

        Ok(predictions.into_iter().map(RawToken::from).collect())
    }
}
