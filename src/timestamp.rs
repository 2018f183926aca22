/// Format a second offset as an LRC timestamp tag `[MM:SS.CC]` (centiseconds)
///
/// Rounds to the nearest centisecond before decomposing, so carries propagate
/// into the seconds and minutes fields. The minutes field widens past two
/// digits for offsets beyond 99:59.99 rather than truncating.
pub fn format_lrc_timestamp(seconds: f64) -> String {
    let total_centis = (seconds * 100.0).round() as u64;
    let minutes = total_centis / 6_000;
    let secs = (total_centis % 6_000) / 100;
    let centis = total_centis % 100;

    format!("[{:02}:{:02}.{:02}]", minutes, secs, centis)
}
