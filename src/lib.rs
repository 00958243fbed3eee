//! callscribe - Speaker-attributed, emotion-annotated transcripts for video calls
//!
//! Pipeline: extract audio -> transcribe -> diarize -> align -> annotate -> assemble.

pub mod annotation;
pub mod cli;
pub mod config;
pub mod diarization;
pub mod media;
pub mod pipeline;
pub mod transcript;
pub mod transcription;

use thiserror::Error;

/// Main error type for callscribe
///
/// Diarization failure is deliberately absent: an unavailable diarizer is a
/// value (`diarization::Diarization::Unavailable`), not an error, and never
/// aborts a run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Audio extraction failed: {0}")]
    AudioExtraction(String),

    #[error("Transcription failed: {0}")]
    TranscriptionModel(String),

    #[error("Metadata extraction failed: {0}")]
    MetadataExtraction(String),

    #[error("Invalid input: {0}")]
    FileValidation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "callscribe";
