//! End-to-end transcription pipeline

use std::time::Instant;
use tracing::{info, warn};

use crate::annotation::{HfZeroShotClassifier, MetadataAnnotator};
use crate::config::Settings;
use crate::diarization::{
    align_speakers, AlignmentMap, AssemblyAiDiarizer, Diarization, DiarizationProvider,
    UnavailableReason,
};
use crate::media::{AudioExtractor, ExtractedAudio, FfmpegExtractor, MediaSource};
use crate::pipeline::{format_timestamp, SpeakerLabeler};
use crate::transcript::{AnnotatedSegment, TranscriptionResult};
use crate::transcription::{SpeechTranscriber, WhisperTranscriber};
use crate::Result;

/// Orchestrates one transcription run over injected collaborators.
///
/// Collaborators are constructed once and reused across runs; a run itself
/// is sequential and shares no mutable state with other runs.
pub struct TranscriptionPipeline {
    extractor: Box<dyn AudioExtractor>,
    transcriber: Box<dyn SpeechTranscriber>,
    diarizer: Box<dyn DiarizationProvider>,
    annotator: MetadataAnnotator,
}

impl TranscriptionPipeline {
    pub fn new(
        extractor: Box<dyn AudioExtractor>,
        transcriber: Box<dyn SpeechTranscriber>,
        diarizer: Box<dyn DiarizationProvider>,
        annotator: MetadataAnnotator,
    ) -> Self {
        Self {
            extractor,
            transcriber,
            diarizer,
            annotator,
        }
    }

    /// Wire up the concrete collaborators: ffmpeg extraction, whisper
    /// speech-to-text, AssemblyAI diarization, Hugging Face zero-shot
    /// classification.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::new(
            Box::new(FfmpegExtractor::new(settings)),
            Box::new(WhisperTranscriber::new(settings)?),
            Box::new(AssemblyAiDiarizer::from_settings(settings)?),
            MetadataAnnotator::new(Box::new(HfZeroShotClassifier::from_settings(settings)?)),
        ))
    }

    /// Run the full pipeline. Always returns a `TranscriptionResult`:
    /// populated on success, empty with the cause on failure. Never a
    /// partial transcript. Temporary audio artifacts are removed on both
    /// paths.
    pub async fn run(&self, source: &MediaSource) -> TranscriptionResult {
        let started = Instant::now();

        match self.execute(source).await {
            Ok(segments) => {
                let elapsed = started.elapsed().as_secs_f64();
                info!(
                    "Pipeline finished: {} segments in {:.1}s",
                    segments.len(),
                    elapsed
                );
                TranscriptionResult::completed(segments, elapsed)
            }
            Err(e) => {
                let elapsed = started.elapsed().as_secs_f64();
                warn!("Pipeline failed after {:.1}s: {}", elapsed, e);
                TranscriptionResult::failed(format!("Processing failed: {}", e), elapsed)
            }
        }
    }

    async fn execute(&self, source: &MediaSource) -> Result<Vec<AnnotatedSegment>> {
        // Acquire audio. The guard deletes extracted audio when this scope
        // ends, on success and on error alike.
        let audio = match source {
            MediaSource::Video(path) => self.extractor.extract(path).await?,
            MediaSource::Audio(path) => ExtractedAudio::existing(path.clone()),
        };

        let segments = self.transcriber.transcribe(audio.path())?;

        let alignment = match self.diarizer.diarize(audio.path()).await {
            Diarization::Available(intervals) => align_speakers(&segments, &intervals),
            Diarization::Unavailable(reason) => {
                match &reason {
                    UnavailableReason::MissingApiKey => {
                        info!("Diarization skipped ({}), using alternating speakers", reason)
                    }
                    UnavailableReason::NoUtterances | UnavailableReason::RemoteError(_) => {
                        warn!("Diarization unavailable ({}), using alternating speakers", reason)
                    }
                }
                AlignmentMap::new()
            }
        };

        let mut labeler = SpeakerLabeler::new();
        let mut annotated = Vec::with_capacity(segments.len());

        for (index, segment) in segments.iter().enumerate() {
            let speaker = labeler.label(alignment.get(&index).map(String::as_str));
            let text = segment.text.trim();
            let metadata = self.annotator.annotate(text).await?;

            annotated.push(AnnotatedSegment {
                timestamp: format_timestamp(segment.start),
                speaker,
                text: text.to_string(),
                emotion: metadata.emotion,
                tone: metadata.tone,
            });
        }

        Ok(annotated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::annotation::ZeroShotClassifier;
    use crate::transcript::{SpeakerInterval, TranscribedSegment};
    use crate::PipelineError;

    struct UnusedExtractor;

    #[async_trait]
    impl AudioExtractor for UnusedExtractor {
        async fn extract(&self, _video_path: &Path) -> crate::Result<ExtractedAudio> {
            panic!("extractor should not be called for audio sources");
        }
    }

    struct StubTranscriber {
        segments: Vec<TranscribedSegment>,
    }

    impl SpeechTranscriber for StubTranscriber {
        fn transcribe(&self, _audio_path: &Path) -> crate::Result<Vec<TranscribedSegment>> {
            Ok(self.segments.clone())
        }
    }

    struct StubDiarizer {
        outcome: Diarization,
    }

    #[async_trait]
    impl DiarizationProvider for StubDiarizer {
        async fn diarize(&self, _audio_path: &Path) -> Diarization {
            self.outcome.clone()
        }
    }

    /// Deterministic classifier: first candidate label wins, every time
    struct FirstLabelClassifier;

    #[async_trait]
    impl ZeroShotClassifier for FirstLabelClassifier {
        async fn classify(
            &self,
            _text: &str,
            candidates: &[&str],
        ) -> crate::Result<Vec<String>> {
            Ok(candidates.iter().map(|c| c.to_string()).collect())
        }
    }

    /// Classifier that fails on the nth call
    struct FailOnNthClassifier {
        calls: Arc<AtomicUsize>,
        fail_at: usize,
    }

    #[async_trait]
    impl ZeroShotClassifier for FailOnNthClassifier {
        async fn classify(
            &self,
            _text: &str,
            candidates: &[&str],
        ) -> crate::Result<Vec<String>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.fail_at {
                return Err(PipelineError::MetadataExtraction(
                    "classifier went away".to_string(),
                ));
            }
            Ok(candidates.iter().map(|c| c.to_string()).collect())
        }
    }

    fn seg(start: f64, end: f64, text: &str) -> TranscribedSegment {
        TranscribedSegment::new(start, end, text)
    }

    fn pipeline(
        segments: Vec<TranscribedSegment>,
        outcome: Diarization,
    ) -> TranscriptionPipeline {
        TranscriptionPipeline::new(
            Box::new(UnusedExtractor),
            Box::new(StubTranscriber { segments }),
            Box::new(StubDiarizer { outcome }),
            MetadataAnnotator::new(Box::new(FirstLabelClassifier)),
        )
    }

    fn audio_source() -> MediaSource {
        MediaSource::Audio(PathBuf::from("stub.wav"))
    }

    #[tokio::test]
    async fn fallback_alternates_when_diarization_unavailable() {
        let segments = vec![
            seg(0.0, 2.0, "one"),
            seg(2.0, 4.0, "two"),
            seg(4.0, 6.0, "three"),
        ];
        let p = pipeline(
            segments,
            Diarization::Unavailable(UnavailableReason::MissingApiKey),
        );

        let result = p.run(&audio_source()).await;
        assert!(result.success);
        let speakers: Vec<&str> = result.segments.iter().map(|s| s.speaker.as_str()).collect();
        assert_eq!(speakers, vec!["Speaker 1", "Speaker 2", "Speaker 1"]);
    }

    #[tokio::test]
    async fn remote_diarization_error_also_falls_back() {
        let segments = vec![seg(0.0, 2.0, "one"), seg(2.0, 4.0, "two")];
        let p = pipeline(
            segments,
            Diarization::Unavailable(UnavailableReason::RemoteError("503".to_string())),
        );

        let result = p.run(&audio_source()).await;
        assert!(result.success);
        let speakers: Vec<&str> = result.segments.iter().map(|s| s.speaker.as_str()).collect();
        assert_eq!(speakers, vec!["Speaker 1", "Speaker 2"]);
    }

    #[tokio::test]
    async fn display_indices_reflect_speaking_order() {
        let segments = vec![
            seg(0.0, 2.0, "first"),
            seg(2.0, 4.0, "second"),
            seg(4.0, 6.0, "third"),
        ];
        // raw ids chosen so lexical order disagrees with speaking order
        let intervals = vec![
            SpeakerInterval::new(0.0, 2.0, "Z"),
            SpeakerInterval::new(2.0, 4.0, "A"),
            SpeakerInterval::new(4.0, 6.0, "Z"),
        ];
        let p = pipeline(segments, Diarization::Available(intervals));

        let result = p.run(&audio_source()).await;
        assert!(result.success);
        let speakers: Vec<&str> = result.segments.iter().map(|s| s.speaker.as_str()).collect();
        assert_eq!(speakers, vec!["Speaker 1", "Speaker 2", "Speaker 1"]);
    }

    #[tokio::test]
    async fn uncovered_segment_gets_fallback_label_mid_run() {
        let segments = vec![
            seg(0.0, 2.0, "covered"),
            seg(10.0, 12.0, "uncovered"),
            seg(2.0, 4.0, "covered again"),
        ];
        let intervals = vec![SpeakerInterval::new(0.0, 5.0, "Q")];
        let p = pipeline(segments, Diarization::Available(intervals));

        let result = p.run(&audio_source()).await;
        assert!(result.success);
        let speakers: Vec<&str> = result.segments.iter().map(|s| s.speaker.as_str()).collect();
        // diarized Q -> Speaker 1; the uncovered segment is the first
        // fallback, also Speaker 1
        assert_eq!(speakers, vec!["Speaker 1", "Speaker 1", "Speaker 1"]);
    }

    #[tokio::test]
    async fn annotation_failure_is_all_or_nothing() {
        let segments = vec![
            seg(0.0, 1.0, "one"),
            seg(1.0, 2.0, "two"),
            seg(2.0, 3.0, "three"),
            seg(3.0, 4.0, "four"),
            seg(4.0, 5.0, "five"),
        ];
        // Two classifier calls per segment; failing on call 5 breaks the
        // third segment after two were fully annotated.
        let p = TranscriptionPipeline::new(
            Box::new(UnusedExtractor),
            Box::new(StubTranscriber { segments }),
            Box::new(StubDiarizer {
                outcome: Diarization::Unavailable(UnavailableReason::MissingApiKey),
            }),
            MetadataAnnotator::new(Box::new(FailOnNthClassifier {
                calls: Arc::new(AtomicUsize::new(0)),
                fail_at: 5,
            })),
        );

        let result = p.run(&audio_source()).await;
        assert!(!result.success);
        assert!(result.segments.is_empty());
        assert_eq!(result.total_segments, 0);
        assert!(result.message.contains("Processing failed"));
    }

    #[tokio::test]
    async fn identical_inputs_give_identical_results_modulo_timing() {
        let segments = vec![seg(0.0, 2.0, "  hello there  "), seg(2.0, 4.0, "hi")];
        let intervals = vec![
            SpeakerInterval::new(0.0, 2.0, "X"),
            SpeakerInterval::new(2.0, 4.0, "Y"),
        ];

        let first = pipeline(
            segments.clone(),
            Diarization::Available(intervals.clone()),
        )
        .run(&audio_source())
        .await;
        let second = pipeline(segments, Diarization::Available(intervals))
            .run(&audio_source())
            .await;

        assert_eq!(first.success, second.success);
        assert_eq!(first.message, second.message);
        assert_eq!(first.segments, second.segments);
        assert_eq!(first.total_segments, second.total_segments);
    }

    #[tokio::test]
    async fn segment_text_is_trimmed_and_annotated() {
        let segments = vec![seg(65.4, 70.0, "  Great job on this, I agree  ")];
        let p = pipeline(
            segments,
            Diarization::Unavailable(UnavailableReason::MissingApiKey),
        );

        let result = p.run(&audio_source()).await;
        assert!(result.success);
        let s = &result.segments[0];
        assert_eq!(s.timestamp, "[00:01:05]");
        assert_eq!(s.text, "Great job on this, I agree");
        // FirstLabelClassifier ranks the first candidate on top
        assert_eq!(s.emotion, "Joy");
        assert_eq!(s.tone, "Enthusiastic");
    }

    #[tokio::test]
    async fn extraction_failure_cleans_up_nothing_and_reports_cause() {
        struct FailingExtractor;

        #[async_trait]
        impl AudioExtractor for FailingExtractor {
            async fn extract(&self, _video_path: &Path) -> crate::Result<ExtractedAudio> {
                Err(PipelineError::AudioExtraction("bad container".to_string()))
            }
        }

        let p = TranscriptionPipeline::new(
            Box::new(FailingExtractor),
            Box::new(StubTranscriber { segments: vec![] }),
            Box::new(StubDiarizer {
                outcome: Diarization::Unavailable(UnavailableReason::MissingApiKey),
            }),
            MetadataAnnotator::new(Box::new(FirstLabelClassifier)),
        );

        let result = p.run(&MediaSource::Video(PathBuf::from("call.mp4"))).await;
        assert!(!result.success);
        assert!(result.message.contains("bad container"));
        assert_eq!(result.total_segments, 0);
    }

    #[tokio::test]
    async fn extracted_audio_is_removed_when_transcription_fails() {
        struct TempExtractor {
            path: PathBuf,
        }

        #[async_trait]
        impl AudioExtractor for TempExtractor {
            async fn extract(&self, _video_path: &Path) -> crate::Result<ExtractedAudio> {
                let temp = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
                std::fs::copy(&self.path, temp.path()).unwrap();
                Ok(ExtractedAudio::temporary(temp.into_temp_path()))
            }
        }

        struct FailingTranscriber {
            seen_path: Arc<std::sync::Mutex<Option<PathBuf>>>,
        }

        impl SpeechTranscriber for FailingTranscriber {
            fn transcribe(
                &self,
                audio_path: &Path,
            ) -> crate::Result<Vec<TranscribedSegment>> {
                *self.seen_path.lock().unwrap() = Some(audio_path.to_path_buf());
                Err(PipelineError::TranscriptionModel("model crashed".to_string()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.wav");
        std::fs::write(&src, b"riff").unwrap();

        let seen_path = Arc::new(std::sync::Mutex::new(None));
        let p = TranscriptionPipeline::new(
            Box::new(TempExtractor { path: src }),
            Box::new(FailingTranscriber {
                seen_path: seen_path.clone(),
            }),
            Box::new(StubDiarizer {
                outcome: Diarization::Unavailable(UnavailableReason::MissingApiKey),
            }),
            MetadataAnnotator::new(Box::new(FirstLabelClassifier)),
        );

        let result = p.run(&MediaSource::Video(PathBuf::from("call.mp4"))).await;
        assert!(!result.success);

        let temp_path = seen_path.lock().unwrap().clone().unwrap();
        assert!(!temp_path.exists(), "extracted audio should be cleaned up");
    }
}
