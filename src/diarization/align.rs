//! Segment-to-speaker alignment by best temporal overlap

use std::collections::HashMap;

use crate::transcript::{SpeakerInterval, TranscribedSegment};

/// Maps a segment's index in the transcription order to the raw speaker id
/// that owns it. Segments with no overlapping interval are absent.
///
/// Keyed by index rather than start time so that two segments sharing an
/// identical start (zero-duration or malformed model output) cannot collide.
pub type AlignmentMap = HashMap<usize, String>;

/// Assign each transcribed segment to the speaker interval it overlaps
/// most.
///
/// For every segment the overlap with every interval is
/// `max(0, min(seg.end, iv.end) - max(seg.start, iv.start))`; the interval
/// with the strictly largest positive overlap wins. A segment overlapping
/// no interval is left unassigned, never snapped to the nearest interval.
/// On an exact overlap tie the earlier interval in `intervals` wins, since
/// only a strictly greater overlap replaces the current best.
///
/// O(segments x intervals); fine for call-length inputs.
pub fn align_speakers(
    segments: &[TranscribedSegment],
    intervals: &[SpeakerInterval],
) -> AlignmentMap {
    let mut map = AlignmentMap::new();

    for (index, segment) in segments.iter().enumerate() {
        let mut best_overlap = 0.0_f64;
        let mut best_speaker: Option<&str> = None;

        for interval in intervals {
            let overlap_start = segment.start.max(interval.start);
            let overlap_end = segment.end.min(interval.end);
            let overlap = (overlap_end - overlap_start).max(0.0);

            if overlap > best_overlap {
                best_overlap = overlap;
                best_speaker = Some(&interval.speaker_id);
            }
        }

        if let Some(speaker) = best_speaker {
            map.insert(index, speaker.to_string());
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64) -> TranscribedSegment {
        TranscribedSegment::new(start, end, "...")
    }

    #[test]
    fn picks_interval_with_largest_overlap() {
        let segments = vec![seg(2.0, 5.0)];
        let intervals = vec![
            SpeakerInterval::new(0.0, 3.0, "A"),
            SpeakerInterval::new(3.0, 6.0, "B"),
        ];

        // A overlaps 1.0s, B overlaps 2.0s
        let map = align_speakers(&segments, &intervals);
        assert_eq!(map.get(&0).map(String::as_str), Some("B"));
    }

    #[test]
    fn no_overlap_leaves_segment_unassigned() {
        let segments = vec![seg(10.0, 12.0)];
        let intervals = vec![SpeakerInterval::new(0.0, 5.0, "A")];

        let map = align_speakers(&segments, &intervals);
        assert!(map.is_empty());
    }

    #[test]
    fn exact_tie_goes_to_earlier_interval() {
        let segments = vec![seg(1.0, 3.0)];
        let intervals = vec![
            SpeakerInterval::new(0.0, 2.0, "A"),
            SpeakerInterval::new(2.0, 4.0, "B"),
        ];

        // both overlap exactly 1.0s
        let map = align_speakers(&segments, &intervals);
        assert_eq!(map.get(&0).map(String::as_str), Some("A"));
    }

    #[test]
    fn touching_interval_is_not_an_overlap() {
        let segments = vec![seg(5.0, 7.0)];
        let intervals = vec![SpeakerInterval::new(0.0, 5.0, "A")];

        let map = align_speakers(&segments, &intervals);
        assert!(map.is_empty());
    }

    #[test]
    fn identical_start_times_do_not_collide() {
        // Index keying keeps both segments even with equal start times
        let segments = vec![seg(1.0, 2.0), seg(1.0, 5.0)];
        let intervals = vec![
            SpeakerInterval::new(0.0, 2.5, "A"),
            SpeakerInterval::new(2.5, 5.0, "B"),
        ];

        let map = align_speakers(&segments, &intervals);
        assert_eq!(map.get(&0).map(String::as_str), Some("A"));
        assert_eq!(map.get(&1).map(String::as_str), Some("B"));
    }

    #[test]
    fn empty_intervals_yield_empty_map() {
        let segments = vec![seg(0.0, 1.0), seg(1.0, 2.0)];
        let map = align_speakers(&segments, &[]);
        assert!(map.is_empty());
    }
}
