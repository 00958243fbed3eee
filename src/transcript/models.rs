//! Core data types shared across the pipeline stages

use serde::{Deserialize, Serialize};

/// A time-bounded unit of transcribed speech, as produced by the
/// speech-to-text collaborator. Ordered by `start` ascending in well-formed
/// output; downstream code tolerates overlaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscribedSegment {
    /// Start offset into the source audio, in seconds
    pub start: f64,

    /// End offset in seconds
    pub end: f64,

    /// Transcribed text
    pub text: String,
}

impl TranscribedSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// One contiguous span of audio attributed to a single speaker by the
/// diarization collaborator. The full set for a recording may have gaps or
/// overlaps and carries no ordering guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerInterval {
    /// Start offset in seconds
    pub start: f64,

    /// End offset in seconds
    pub end: f64,

    /// Opaque speaker identifier from the diarization service
    pub speaker_id: String,
}

impl SpeakerInterval {
    pub fn new(start: f64, end: f64, speaker_id: impl Into<String>) -> Self {
        Self {
            start,
            end,
            speaker_id: speaker_id.into(),
        }
    }
}

/// Final output unit: one fully-annotated transcript line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedSegment {
    /// Display timestamp, e.g. "[00:01:05]"
    pub timestamp: String,

    /// Human-facing speaker label, e.g. "Speaker 1"
    pub speaker: String,

    /// Trimmed utterance text
    pub text: String,

    /// Top-ranked emotion label, capitalized
    pub emotion: String,

    /// Top-ranked tone label, capitalized
    pub tone: String,
}

/// Terminal artifact of one pipeline run. Created exactly once per
/// invocation: populated on success, empty with an error message on failure.
/// Never a partial transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub success: bool,
    pub message: String,
    pub segments: Vec<AnnotatedSegment>,
    pub total_segments: usize,
    /// Wall-clock time from pipeline start to finish, in seconds
    pub processing_time: f64,
}

impl TranscriptionResult {
    /// Build the success-path result from assembled segments
    pub fn completed(segments: Vec<AnnotatedSegment>, processing_time: f64) -> Self {
        let total_segments = segments.len();
        Self {
            success: true,
            message: "Transcription completed successfully".to_string(),
            segments,
            total_segments,
            processing_time,
        }
    }

    /// Build the failure-path result. No partial transcript is ever carried.
    pub fn failed(message: impl Into<String>, processing_time: f64) -> Self {
        Self {
            success: false,
            message: message.into(),
            segments: Vec::new(),
            total_segments: 0,
            processing_time,
        }
    }
}
