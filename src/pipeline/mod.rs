//! Pipeline orchestration for callscribe
//!
//! Drives the end-to-end flow: acquire audio -> transcribe -> diarize ->
//! align -> annotate -> assemble, and owns the fallback and partial-failure
//! policy.

mod orchestrator;
mod speaker;
mod timestamp;

pub use orchestrator::TranscriptionPipeline;
pub use speaker::SpeakerLabeler;
pub use timestamp::format_timestamp;
