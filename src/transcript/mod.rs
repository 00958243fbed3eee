//! Transcript data model for callscribe
//!
//! Everything here is transient: produced during one pipeline run and handed
//! back to the caller as a `TranscriptionResult`.

mod models;
mod render;

pub use models::{AnnotatedSegment, SpeakerInterval, TranscribedSegment, TranscriptionResult};
pub use render::render_text;
