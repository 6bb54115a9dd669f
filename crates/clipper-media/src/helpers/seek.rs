// crates/clipper-media/src/helpers/seek.rs
//
// Seek helper wrapping ffmpeg's avformat seek with soft-fail behaviour.
//
// The preview re-seeks constantly (open, every loop back to start, every
// progress-bar click), so all of those route through here. A failed seek
// is logged and reported, never fatal: the decoder keeps reading from where
// it is and the caller's PTS filter drops frames before the target.

use ffmpeg_the_third as ffmpeg;

/// Seek `ictx` to `target_secs` seconds from the start of the file.
///
/// Backward seek (`..=seek_ts`) lands on the keyframe at or before the
/// target; the pre-roll is skipped by the caller, so the first frame shown
/// is at the target instead of up to a GOP later.
///
/// A target of zero uses an unbounded range. `avformat_seek_file` with
/// `max_ts = 0` returns EPERM on Windows for some containers, and looping
/// back to the very start is the common case here.
///
/// Returns `false` if the seek failed.
pub fn seek_to_secs(
    ictx:        &mut ffmpeg::format::context::Input,
    target_secs: f64,
    label:       &str,   // caller description for log messages e.g. "preview loop"
) -> bool {
    let result = if target_secs <= 0.0 {
        ictx.seek(0, ..)
    } else {
        let seek_ts = (target_secs * ffmpeg::ffi::AV_TIME_BASE as f64) as i64;
        ictx.seek(seek_ts, ..=seek_ts)
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                "seek soft-fail in {label} at {target_secs:.3}s: {e}, decoding from current position"
            );
            false
        }
    }
}
