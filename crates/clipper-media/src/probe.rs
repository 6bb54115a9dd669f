// crates/clipper-media/src/probe.rs
//
// In-process FFmpeg probing: total duration of a media file.

use std::path::Path;
use anyhow::{bail, Result};

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::input;
use ffmpeg::media::Type;

use clipper_core::error::CutError;

/// Container duration, falling back to the best video then audio stream.
/// Errors when the file cannot be opened or reports no positive duration.
pub fn probe_duration(path: &Path) -> Result<f64> {
    let ctx = input(&path)?;

    let dur = ctx.duration() as f64 / ffmpeg::ffi::AV_TIME_BASE as f64;
    if dur > 0.0 {
        return Ok(dur);
    }

    // Fall back to stream duration (raw streams, some audio containers)
    if let Some(stream) = ctx.streams().best(Type::Video)
        .or_else(|| ctx.streams().best(Type::Audio))
    {
        let tb = stream.time_base();
        let d  = stream.duration() as f64 * tb.numerator() as f64
            / tb.denominator().max(1) as f64;
        if d > 0.0 {
            return Ok(d);
        }
    }
    bail!("duration unknown")
}

/// Worker-boundary wrapper: anyhow → `CutError::SourceUnreadable`.
pub fn probe_media(path: &Path) -> Result<f64, CutError> {
    match probe_duration(path) {
        Ok(d) => {
            tracing::info!(duration = format_args!("{d:.2}s"), path = %path.display(), "probed");
            Ok(d)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "probe failed");
            Err(CutError::SourceUnreadable { path: path.to_path_buf(), reason: e.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_source_unreadable() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("nothing-here.mp4");
        match probe_media(&path) {
            Err(CutError::SourceUnreadable { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected SourceUnreadable, got {other:?}"),
        }
    }
}
