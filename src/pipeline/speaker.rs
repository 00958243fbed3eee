//! Speaker display labeling

use std::collections::HashMap;

/// Resolves raw diarization speaker ids to human-facing "Speaker N" labels,
/// and hands out alternating fallback labels for segments diarization could
/// not cover.
///
/// Display indices are assigned in order of first appearance across the
/// segment sequence, so the numbering reflects speaking order rather than
/// the diarization service's internal ids. The fallback label is a pure
/// function of how many unassigned segments came before: even count gives
/// Speaker 1, odd gives Speaker 2. Diarized and fallback labels may
/// interleave within one run.
#[derive(Debug, Default)]
pub struct SpeakerLabeler {
    index_map: HashMap<String, usize>,
    unassigned_seen: usize,
}

impl SpeakerLabeler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the display label for the next segment in order.
    pub fn label(&mut self, raw_speaker: Option<&str>) -> String {
        match raw_speaker {
            Some(raw) => {
                let next_index = self.index_map.len() + 1;
                let index = *self
                    .index_map
                    .entry(raw.to_string())
                    .or_insert(next_index);
                format!("Speaker {}", index)
            }
            None => {
                let index = 1 + self.unassigned_seen % 2;
                self.unassigned_seen += 1;
                format!("Speaker {}", index)
            }
        }
    }
}
