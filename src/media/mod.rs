//! Media handling for callscribe
//!
//! Audio acquisition: validating input paths and extracting audio tracks
//! from video containers.

mod extractor;
mod source;

pub use extractor::{AudioExtractor, ExtractedAudio, FfmpegExtractor};
pub use source::MediaSource;
