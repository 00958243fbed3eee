//! Zero-shot classification via the Hugging Face inference API

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::annotation::ZeroShotClassifier;
use crate::config::Settings;
use crate::{PipelineError, Result};

pub struct HfZeroShotClassifier {
    http: Client,
    api_key: String,
    url: String,
}

impl HfZeroShotClassifier {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let endpoint = settings
            .classifier
            .endpoint
            .trim()
            .trim_end_matches('/')
            .to_string();
        let model = settings.classifier.model.trim().to_string();

        Ok(Self {
            http: Client::builder()
                .timeout(Duration::from_secs(settings.classifier.timeout_secs))
                .build()
                .context("Failed to build classifier HTTP client")?,
            api_key: settings.classifier.api_key.trim().to_string(),
            url: format!("{}/{}", endpoint, model),
        })
    }
}

#[async_trait]
impl ZeroShotClassifier for HfZeroShotClassifier {
    async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<Vec<String>> {
        let body = json!({
            "inputs": text,
            "parameters": {
                "candidate_labels": candidate_labels,
                "multi_label": false,
            },
        });

        let mut request = self.http.post(&self.url).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PipelineError::MetadataExtraction(format!("classifier request: {}", e)))?
            .error_for_status()
            .map_err(|e| PipelineError::MetadataExtraction(format!("classifier rejected: {}", e)))?;

        let payload: ClassificationResponse = response.json().await.map_err(|e| {
            PipelineError::MetadataExtraction(format!("classifier response: {}", e))
        })?;

        if payload.labels.is_empty() {
            return Err(PipelineError::MetadataExtraction(
                "classifier returned no labels".to_string(),
            ));
        }

        Ok(payload.labels)
    }
}

#[derive(Debug, Deserialize)]
struct ClassificationResponse {
    #[serde(default)]
    labels: Vec<String>,
}
