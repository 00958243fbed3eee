//! Keyword-based reaction tagging

const POSITIVE_PHRASES: &[&str] = &["great job", "fantastic", "excellent", "i agree"];
const NEGATIVE_PHRASES: &[&str] = &["i don't think so", "not sure", "problematic"];

/// Coarse reaction tag derived from utterance text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    None,
    PositiveAcknowledgment,
    ConcernDisagreement,
}

impl Reaction {
    /// Case-insensitive substring match against the fixed phrase lists.
    /// Positive phrases are checked before negative ones.
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();

        if POSITIVE_PHRASES.iter().any(|p| lower.contains(p)) {
            Self::PositiveAcknowledgment
        } else if NEGATIVE_PHRASES.iter().any(|p| lower.contains(p)) {
            Self::ConcernDisagreement
        } else {
            Self::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::PositiveAcknowledgment => "Positive Acknowledgment",
            Self::ConcernDisagreement => "Concern/Disagreement",
        }
    }
}
