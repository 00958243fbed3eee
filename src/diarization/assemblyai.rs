//! AssemblyAI-backed speaker diarization

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::diarization::{Diarization, DiarizationProvider, UnavailableReason};
use crate::transcript::SpeakerInterval;

const POLL_INTERVAL: Duration = Duration::from_secs(3);

pub struct AssemblyAiDiarizer {
    http: Client,
    api_key: String,
    endpoint: String,
    poll_deadline: Duration,
}

impl AssemblyAiDiarizer {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            http: Client::builder()
                .timeout(Duration::from_secs(settings.diarization.timeout_secs))
                .build()
                .context("Failed to build AssemblyAI HTTP client")?,
            api_key: settings.diarization.api_key.trim().to_string(),
            endpoint: settings
                .diarization
                .endpoint
                .trim()
                .trim_end_matches('/')
                .to_string(),
            poll_deadline: Duration::from_secs(settings.diarization.poll_deadline_secs),
        })
    }

    async fn upload(&self, audio_path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .with_context(|| format!("Failed to read audio file: {}", audio_path.display()))?;

        let response: UploadResponse = self
            .http
            .post(format!("{}/upload", self.endpoint))
            .header("authorization", &self.api_key)
            .body(bytes)
            .send()
            .await
            .context("Audio upload request failed")?
            .error_for_status()
            .context("Audio upload was rejected")?
            .json()
            .await
            .context("Failed to parse upload response")?;

        Ok(response.upload_url)
    }

    async fn request_transcript(&self, audio_url: &str) -> Result<String> {
        let response: TranscriptResponse = self
            .http
            .post(format!("{}/transcript", self.endpoint))
            .header("authorization", &self.api_key)
            .json(&json!({
                "audio_url": audio_url,
                "speaker_labels": true,
            }))
            .send()
            .await
            .context("Transcript request failed")?
            .error_for_status()
            .context("Transcript request was rejected")?
            .json()
            .await
            .context("Failed to parse transcript response")?;

        Ok(response.id)
    }

    async fn poll_transcript(&self, id: &str) -> Result<TranscriptResponse> {
        let started = Instant::now();

        loop {
            let response: TranscriptResponse = self
                .http
                .get(format!("{}/transcript/{}", self.endpoint, id))
                .header("authorization", &self.api_key)
                .send()
                .await
                .context("Transcript poll failed")?
                .error_for_status()
                .context("Transcript poll was rejected")?
                .json()
                .await
                .context("Failed to parse transcript poll response")?;

            match response.status.as_str() {
                "completed" => return Ok(response),
                "error" => anyhow::bail!(
                    "remote transcription failed: {}",
                    response.error.as_deref().unwrap_or("unknown error")
                ),
                _ => {
                    if started.elapsed() > self.poll_deadline {
                        anyhow::bail!(
                            "diarization did not finish within {}s",
                            self.poll_deadline.as_secs()
                        );
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }
    }

    async fn run(&self, audio_path: &Path) -> Result<Vec<SpeakerInterval>> {
        let audio_url = self.upload(audio_path).await?;
        let id = self.request_transcript(&audio_url).await?;
        let transcript = self.poll_transcript(&id).await?;

        // AssemblyAI reports utterance times in milliseconds
        let intervals: Vec<SpeakerInterval> = transcript
            .utterances
            .unwrap_or_default()
            .into_iter()
            .map(|u| SpeakerInterval::new(u.start as f64 / 1000.0, u.end as f64 / 1000.0, u.speaker))
            .collect();

        Ok(intervals)
    }
}

#[async_trait]
impl DiarizationProvider for AssemblyAiDiarizer {
    async fn diarize(&self, audio_path: &Path) -> Diarization {
        if self.api_key.is_empty() {
            return Diarization::Unavailable(UnavailableReason::MissingApiKey);
        }

        tracing::info!("Running speaker diarization: {}", audio_path.display());

        match self.run(audio_path).await {
            Ok(intervals) if intervals.is_empty() => {
                Diarization::Unavailable(UnavailableReason::NoUtterances)
            }
            Ok(intervals) => {
                let speakers: std::collections::HashSet<&str> =
                    intervals.iter().map(|i| i.speaker_id.as_str()).collect();
                tracing::info!(
                    "Diarization found {} speaker(s) across {} intervals",
                    speakers.len(),
                    intervals.len()
                );
                Diarization::Available(intervals)
            }
            Err(e) => Diarization::Unavailable(UnavailableReason::RemoteError(format!("{:#}", e))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    utterances: Option<Vec<Utterance>>,
}

#[derive(Debug, Deserialize)]
struct Utterance {
    start: u64,
    end: u64,
    speaker: String,
}
