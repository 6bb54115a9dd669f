// crates/clipper-core/src/error.rs
//
// Every failure a user action can hit. The UI turns these into status
// banners; none of them are fatal to the process.
//
// Variants carry owned strings instead of io::Error so the type is
// Clone + PartialEq and can travel over the MediaWorker result channel.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CutError {
    /// Time text did not match `hh:mm:ss` or `hh:mm:ss.frac`.
    #[error("time must be hh:mm:ss or hh:mm:ss.ms, got {input:?}")]
    Format { input: String },

    #[error(transparent)]
    Range(#[from] RangeError),

    /// Destination extension is not in the export policy table.
    #[error("unsupported output format {extension:?}")]
    UnsupportedFormat { extension: String },

    #[error("output file already exists: {}", path.display())]
    OutputExists { path: PathBuf },

    #[error("transcoding engine {program:?} not found, make sure ffmpeg is installed and on PATH")]
    EngineNotFound { program: String },

    /// The engine ran but exited nonzero. `diagnostics` is the tail of its stderr.
    #[error("ffmpeg failed{}: {diagnostics}", code.map(|c| format!(" with code {c}")).unwrap_or_default())]
    TranscodeFailed { code: Option<i32>, diagnostics: String },

    #[error("could not open {}: {reason}", path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    /// A required field (file, output name) was left empty.
    #[error("please fill in the {0} field")]
    MissingInput(&'static str),

    #[error("{context}: {message}")]
    Io { context: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RangeError {
    #[error("end time ({end:.3}s) must be after start time ({start:.3}s)")]
    EndNotAfterStart { start: f64, end: f64 },

    #[error("end time ({end:.3}s) is past the media duration ({duration:.3}s)")]
    EndPastDuration { end: f64, duration: f64 },
}

impl CutError {
    pub fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        CutError::Io { context: context.into(), message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcode_failed_message_includes_exit_code() {
        let e = CutError::TranscodeFailed { code: Some(1), diagnostics: "bad input".into() };
        assert_eq!(e.to_string(), "ffmpeg failed with code 1: bad input");
    }

    #[test]
    fn transcode_failed_without_code() {
        let e = CutError::TranscodeFailed { code: None, diagnostics: "killed".into() };
        assert_eq!(e.to_string(), "ffmpeg failed: killed");
    }

    #[test]
    fn range_error_converts_into_cut_error() {
        let e: CutError = RangeError::EndNotAfterStart { start: 2.0, end: 1.0 }.into();
        assert!(matches!(e, CutError::Range(RangeError::EndNotAfterStart { .. })));
    }
}
