//! Plain-text rendering of an annotated transcript

use crate::transcript::AnnotatedSegment;

/// Render annotated segments as the final deliverable text, one line per
/// segment: `[HH:MM:SS] Speaker N: "text" [Emotion: X, Tone: Y]`
pub fn render_text(segments: &[AnnotatedSegment]) -> String {
    segments
        .iter()
        .map(|s| {
            format!(
                "{} {}: \"{}\" [Emotion: {}, Tone: {}]",
                s.timestamp, s.speaker, s.text, s.emotion, s.tone
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_line_per_segment() {
        let segments = vec![
            AnnotatedSegment {
                timestamp: "[00:00:00]".to_string(),
                speaker: "Speaker 1".to_string(),
                text: "Hello everyone".to_string(),
                emotion: "Joy".to_string(),
                tone: "Enthusiastic".to_string(),
            },
            AnnotatedSegment {
                timestamp: "[00:00:04]".to_string(),
                speaker: "Speaker 2".to_string(),
                text: "Hi there".to_string(),
                emotion: "Calmness".to_string(),
                tone: "Neutral".to_string(),
            },
        ];

        let text = render_text(&segments);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "[00:00:00] Speaker 1: \"Hello everyone\" [Emotion: Joy, Tone: Enthusiastic]"
        );
        assert_eq!(
            lines[1],
            "[00:00:04] Speaker 2: \"Hi there\" [Emotion: Calmness, Tone: Neutral]"
        );
    }

    #[test]
    fn empty_transcript_renders_empty_string() {
        assert_eq!(render_text(&[]), "");
    }
}
