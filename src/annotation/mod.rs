//! Utterance annotation for callscribe
//!
//! Emotion and tone via zero-shot classification, plus a keyword-based
//! reaction tag.

mod huggingface;
mod metadata;
mod reaction;

use async_trait::async_trait;

use crate::Result;

pub use huggingface::HfZeroShotClassifier;
pub use metadata::{MetadataAnnotator, SegmentMetadata, CANDIDATE_EMOTIONS, CANDIDATE_TONES};
pub use reaction::Reaction;

/// Collaborator contract for zero-shot text classification. Returns the
/// candidate labels ranked best-first; callers use the top label.
/// Implementations must request single-label (not multi-label) scoring.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<Vec<String>>;
}
