//! Speaker diarization for callscribe
//!
//! Diarization is a best-effort collaborator: when it cannot produce usable
//! speaker intervals the pipeline falls back to alternating speaker labels
//! instead of failing the run.

mod align;
mod assemblyai;

use async_trait::async_trait;
use std::fmt;
use std::path::Path;

use crate::transcript::SpeakerInterval;

pub use align::{align_speakers, AlignmentMap};
pub use assemblyai::AssemblyAiDiarizer;

/// Why diarization produced no usable intervals. The orchestrator handles
/// every reason the same way (fallback labeling) but logs them distinctly.
#[derive(Debug, Clone, PartialEq)]
pub enum UnavailableReason {
    /// No API key configured; the service was never contacted
    MissingApiKey,
    /// The service answered but found no speaker utterances
    NoUtterances,
    /// Transport or service failure
    RemoteError(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "no diarization API key configured"),
            Self::NoUtterances => write!(f, "no speaker utterances found"),
            Self::RemoteError(e) => write!(f, "diarization service error: {}", e),
        }
    }
}

/// Tagged diarization outcome. "Unavailable" is a first-class result, not
/// an error; a diarization provider never aborts a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum Diarization {
    Available(Vec<SpeakerInterval>),
    Unavailable(UnavailableReason),
}

/// Collaborator contract for speaker diarization, invoked once per run on
/// the full audio.
#[async_trait]
pub trait DiarizationProvider: Send + Sync {
    async fn diarize(&self, audio_path: &Path) -> Diarization;
}
