//! Input classification and validation

use std::path::{Path, PathBuf};

use crate::{PipelineError, Result};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "mov", "webm", "avi"];
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "flac", "ogg"];

/// A validated pipeline input: either a video that still needs audio
/// extraction, or a ready-to-transcribe audio file.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    Video(PathBuf),
    Audio(PathBuf),
}

impl MediaSource {
    /// Classify and validate an input path. Rejection happens here, before
    /// the pipeline is ever constructed.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PipelineError::FileValidation(format!(
                "file not found: {}",
                path.display()
            )));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Ok(Self::Video(path.to_path_buf()))
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Ok(Self::Audio(path.to_path_buf()))
        } else {
            Err(PipelineError::FileValidation(format!(
                "unsupported media format '.{}' (expected one of: {}, {})",
                ext,
                VIDEO_EXTENSIONS.join(", "),
                AUDIO_EXTENSIONS.join(", ")
            )))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Video(p) | Self::Audio(p) => p,
        }
    }
}
