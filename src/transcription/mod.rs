//! Transcription module for callscribe
//!
//! Speech-to-text behind a narrow collaborator trait; whisper-rs is the
//! concrete implementation.

mod whisper;

use std::path::Path;

use crate::transcript::TranscribedSegment;
use crate::Result;

pub use whisper::WhisperTranscriber;

/// Collaborator contract for speech-to-text. Invoked once per run on the
/// full audio; output is consumed eagerly, in start-time order.
pub trait SpeechTranscriber: Send + Sync {
    fn transcribe(&self, audio_path: &Path) -> Result<Vec<TranscribedSegment>>;
}
