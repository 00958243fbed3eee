//! Display timestamp formatting

/// Format an elapsed-seconds offset as a fixed-width `[HH:MM:SS]` display
/// timestamp. Total for any non-negative finite input; callers always pass
/// a segment's start offset.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("[{:02}:{:02}:{:02}]", hours, minutes, secs)
}
