//! Audio extraction from video files via ffmpeg

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempPath;
use tokio::process::Command;

use crate::config::Settings;
use crate::{PipelineError, Result};

/// A local audio file ready for transcription. When it wraps a temporary
/// extraction artifact, the file is deleted on drop, so cleanup holds on
/// both the success and failure paths of a run.
pub struct ExtractedAudio {
    path: PathBuf,
    _temp: Option<TempPath>,
}

impl ExtractedAudio {
    /// Wrap a temporary file that must be removed when the run ends
    pub fn temporary(temp: TempPath) -> Self {
        Self {
            path: temp.to_path_buf(),
            _temp: Some(temp),
        }
    }

    /// Wrap a caller-owned audio file that must not be removed
    pub fn existing(path: PathBuf) -> Self {
        Self { path, _temp: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Collaborator contract for pulling the audio track out of a video file
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract(&self, video_path: &Path) -> Result<ExtractedAudio>;
}

/// Extracts audio by shelling out to ffmpeg: mono 16 kHz PCM WAV, the
/// format the whisper transcriber expects.
pub struct FfmpegExtractor {
    ffmpeg: String,
}

impl FfmpegExtractor {
    pub fn new(settings: &Settings) -> Self {
        let ffmpeg = if settings.general.ffmpeg_path.trim().is_empty() {
            "ffmpeg".to_string()
        } else {
            settings.general.ffmpeg_path.trim().to_string()
        };
        Self { ffmpeg }
    }
}

#[async_trait]
impl AudioExtractor for FfmpegExtractor {
    async fn extract(&self, video_path: &Path) -> Result<ExtractedAudio> {
        tracing::info!("Extracting audio from video: {}", video_path.display());

        let temp = tempfile::Builder::new()
            .prefix("callscribe-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| {
                PipelineError::AudioExtraction(format!("could not create temp file: {}", e))
            })?
            .into_temp_path();

        let output = Command::new(&self.ffmpeg)
            .arg("-y")
            .arg("-i")
            .arg(video_path)
            .args(["-vn", "-ac", "1", "-ar", "16000", "-acodec", "pcm_s16le"])
            .arg(&*temp)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                PipelineError::AudioExtraction(format!(
                    "failed to run '{}': {}",
                    self.ffmpeg, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // The useful ffmpeg diagnostic is the last line of stderr
            let detail = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("unknown ffmpeg error");
            return Err(PipelineError::AudioExtraction(format!(
                "ffmpeg exited with {}: {}",
                output.status, detail
            )));
        }

        tracing::debug!("Audio extracted to: {}", temp.display());
        Ok(ExtractedAudio::temporary(temp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_audio_is_removed_on_drop() {
        let temp = tempfile::Builder::new()
            .suffix(".wav")
            .tempfile()
            .unwrap()
            .into_temp_path();
        let path = temp.to_path_buf();
        assert!(path.exists());

        let audio = ExtractedAudio::temporary(temp);
        assert_eq!(audio.path(), path.as_path());
        drop(audio);

        assert!(!path.exists());
    }

    #[test]
    fn existing_audio_is_left_alone_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("call.wav");
        std::fs::write(&path, b"riff").unwrap();

        let audio = ExtractedAudio::existing(path.clone());
        drop(audio);

        assert!(path.exists());
    }
}
