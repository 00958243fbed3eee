//! Per-utterance emotion and tone annotation

use crate::annotation::{Reaction, ZeroShotClassifier};
use crate::{PipelineError, Result};

/// Candidate labels for the emotion classification pass
pub const CANDIDATE_EMOTIONS: &[&str] = &[
    "joy",
    "anger",
    "sadness",
    "excitement",
    "calmness",
    "interest",
    "confusion",
];

/// Candidate labels for the tone classification pass
pub const CANDIDATE_TONES: &[&str] = &[
    "enthusiastic",
    "confident",
    "inquisitive",
    "hesitant",
    "professional",
    "sarcastic",
    "neutral",
];

/// Metadata attached to a single utterance
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMetadata {
    pub emotion: String,
    pub tone: String,
    pub reaction: Reaction,
}

/// Annotates one utterance at a time by running the injected zero-shot
/// classifier against the emotion and tone label sets. Classifier failure
/// propagates so the orchestrator can abort the run; retries, if any,
/// belong to the caller.
pub struct MetadataAnnotator {
    classifier: Box<dyn ZeroShotClassifier>,
}

impl MetadataAnnotator {
    pub fn new(classifier: Box<dyn ZeroShotClassifier>) -> Self {
        Self { classifier }
    }

    pub async fn annotate(&self, text: &str) -> Result<SegmentMetadata> {
        let emotion = self.top_label(text, CANDIDATE_EMOTIONS).await?;
        let tone = self.top_label(text, CANDIDATE_TONES).await?;

        Ok(SegmentMetadata {
            emotion,
            tone,
            reaction: Reaction::detect(text),
        })
    }

    async fn top_label(&self, text: &str, candidates: &[&str]) -> Result<String> {
        let labels = self.classifier.classify(text, candidates).await?;
        let top = labels.first().ok_or_else(|| {
            PipelineError::MetadataExtraction("classifier returned no labels".to_string())
        })?;
        Ok(capitalize(top))
    }
}

/// Uppercase the first character for display
fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
