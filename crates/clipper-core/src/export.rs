// crates/clipper-core/src/export.rs
//
// Export Invoker, pure half: the output policy table, request validation,
// engine argument assembly and progress-line parsing. Spawning the engine
// and touching the filesystem happen in clipper-media::transcode.
//
// Policy table (one canonical list; anything else is rejected):
//
//   .mp4 .mov .mkv  stream copy        -c:v copy -c:a copy
//   .mp3            audio, 192 kbps    -vn -c:a libmp3lame -b:a 192k
//   .wav            audio, PCM         -vn -c:a pcm_s16le
//   .aac            audio, 128 kbps    -vn -c:a aac -b:a 128k
//   .flac           audio, lossless    -vn -c:a flac
//   .wmv            video + audio      -c:v wmv2 -b:v 1500k -c:a wmav2 -b:a 192k

use std::fmt;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::CutError;
use crate::interval::{Interval, IntervalModel, MediaFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    Mp4,
    Mov,
    Mkv,
    Mp3,
    Wav,
    Aac,
    Flac,
    Wmv,
}

pub const ALL_FORMATS: &[ExportFormat] = &[
    ExportFormat::Mp4,
    ExportFormat::Mov,
    ExportFormat::Mkv,
    ExportFormat::Mp3,
    ExportFormat::Wav,
    ExportFormat::Aac,
    ExportFormat::Flac,
    ExportFormat::Wmv,
];

impl ExportFormat {
    /// Extension including the leading dot, lowercase.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Mp4  => ".mp4",
            ExportFormat::Mov  => ".mov",
            ExportFormat::Mkv  => ".mkv",
            ExportFormat::Mp3  => ".mp3",
            ExportFormat::Wav  => ".wav",
            ExportFormat::Aac  => ".aac",
            ExportFormat::Flac => ".flac",
            ExportFormat::Wmv  => ".wmv",
        }
    }

    /// Look up a destination extension. Case-insensitive, leading dot optional.
    pub fn from_extension(ext: &str) -> Result<Self, CutError> {
        let normalized = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        ALL_FORMATS
            .iter()
            .copied()
            .find(|f| f.extension()[1..] == normalized)
            .ok_or_else(|| CutError::UnsupportedFormat { extension: ext.to_string() })
    }

    /// True when the selection is copied bit-for-bit instead of re-encoded.
    pub fn is_stream_copy(self) -> bool {
        matches!(self, ExportFormat::Mp4 | ExportFormat::Mov | ExportFormat::Mkv)
    }

    /// True when the video stream is dropped.
    pub fn is_audio_only(self) -> bool {
        matches!(
            self,
            ExportFormat::Mp3 | ExportFormat::Wav | ExportFormat::Aac | ExportFormat::Flac
        )
    }

    /// Codec and bitrate flags passed to the engine for this format.
    pub fn codec_args(self) -> &'static [&'static str] {
        match self {
            ExportFormat::Mp4 | ExportFormat::Mov | ExportFormat::Mkv => {
                &["-c:v", "copy", "-c:a", "copy"]
            }
            ExportFormat::Mp3  => &["-vn", "-c:a", "libmp3lame", "-b:a", "192k"],
            ExportFormat::Wav  => &["-vn", "-c:a", "pcm_s16le"],
            ExportFormat::Aac  => &["-vn", "-c:a", "aac", "-b:a", "128k"],
            ExportFormat::Flac => &["-vn", "-c:a", "flac"],
            ExportFormat::Wmv  => &["-c:v", "wmv2", "-b:v", "1500k", "-c:a", "wmav2", "-b:a", "192k"],
        }
    }

    /// Short human description for the format picker.
    pub fn policy_label(self) -> &'static str {
        match self {
            ExportFormat::Mp4 | ExportFormat::Mov | ExportFormat::Mkv => "stream copy",
            ExportFormat::Mp3  => "audio, 192 kbps",
            ExportFormat::Wav  => "audio, PCM",
            ExportFormat::Aac  => "audio, 128 kbps",
            ExportFormat::Flac => "audio, lossless",
            ExportFormat::Wmv  => "re-encode",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A fully validated cut. The only way to build one is [`ExportRequest::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    media:       MediaFile,
    interval:    Interval,
    output_dir:  PathBuf,
    output_name: String,
    format:      ExportFormat,
}

impl ExportRequest {
    /// Snapshot the model and validate everything at once. Nothing is kept
    /// if any check fails.
    pub fn new(
        model:       &IntervalModel,
        output_dir:  impl Into<PathBuf>,
        output_name: &str,
        format:      ExportFormat,
    ) -> Result<Self, CutError> {
        let output_name = output_name.trim();
        if output_name.is_empty() {
            return Err(CutError::MissingInput("output name"));
        }
        let interval = model.validate_for_export()?;
        Ok(Self {
            media: model.media().clone(),
            interval,
            output_dir: output_dir.into(),
            output_name: output_name.to_string(),
            format,
        })
    }

    pub fn media(&self) -> &MediaFile {
        &self.media
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Length of the clip being written, in seconds.
    pub fn clip_duration(&self) -> f64 {
        self.interval.len()
    }

    /// `<output_dir>/<output_name><ext>`
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", self.output_name, self.format.extension()))
    }

    /// Arguments for the engine, program name excluded.
    ///
    /// `-n` makes the engine refuse to overwrite as well; the caller still
    /// checks first so an existing file never spawns a process at all.
    pub fn engine_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-hide_banner".into(),
            "-nostdin".into(),
            "-n".into(),
            "-ss".into(),
            format!("{:.3}", self.interval.start),
            "-i".into(),
            self.media.path.to_string_lossy().into_owned(),
            "-t".into(),
            format!("{:.3}", self.clip_duration()),
        ];
        args.extend(self.format.codec_args().iter().map(|s| s.to_string()));
        args.push(self.output_path().to_string_lossy().into_owned());
        args
    }
}

// ── Progress stream ───────────────────────────────────────────────────────────

/// Result of looking at one line of engine output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressLine {
    /// No `time=` marker; ordinary log output.
    Unrelated,
    /// A marker that could not be read (`time=N/A`, truncated line, ...).
    Malformed,
    /// Elapsed output time in seconds.
    Elapsed(f64),
}

/// Extract the `time=hh:mm:ss.xx` marker from an engine status line.
pub fn parse_progress_line(line: &str) -> ProgressLine {
    const MARKER: &str = "time=";
    let Some(idx) = line.find(MARKER) else {
        return ProgressLine::Unrelated;
    };
    let value = line[idx + MARKER.len()..]
        .split_whitespace()
        .next()
        .unwrap_or("");

    let mut fields = value.split(':');
    let (Some(h), Some(m), Some(s), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return ProgressLine::Malformed;
    };
    match (h.parse::<f64>(), m.parse::<f64>(), s.parse::<f64>()) {
        (Ok(h), Ok(m), Ok(s)) if h >= 0.0 && m >= 0.0 && s >= 0.0 => {
            ProgressLine::Elapsed(h * 3600.0 + m * 60.0 + s)
        }
        _ => ProgressLine::Malformed,
    }
}

/// Completion estimate in percent, clamped to `[0, 100]`.
/// `None` when the clip has no length to measure against.
pub fn progress_percent(elapsed: f64, clip_duration: f64) -> Option<f32> {
    if clip_duration <= 0.0 {
        return None;
    }
    Some(((elapsed / clip_duration) * 100.0).clamp(0.0, 100.0) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> IntervalModel {
        let mut m = IntervalModel::new(MediaFile::new("/media/in.mkv", 120.0));
        m.set_from_text("00:00:10", "00:00:25.5").unwrap();
        m
    }

    #[test]
    fn extensions_resolve_case_insensitively() {
        assert_eq!(ExportFormat::from_extension(".MP4").unwrap(), ExportFormat::Mp4);
        assert_eq!(ExportFormat::from_extension("flac").unwrap(), ExportFormat::Flac);
        assert_eq!(ExportFormat::from_extension(" .wmv ").unwrap(), ExportFormat::Wmv);
    }

    #[test]
    fn unlisted_extensions_are_rejected() {
        for ext in [".ogg", ".avi", "webm", "", "."] {
            assert!(
                matches!(ExportFormat::from_extension(ext), Err(CutError::UnsupportedFormat { .. })),
                "{ext:?}"
            );
        }
    }

    #[test]
    fn policy_table_is_explicit() {
        assert!(ExportFormat::Mov.is_stream_copy());
        assert!(ExportFormat::Mkv.is_stream_copy());
        assert!(!ExportFormat::Wmv.is_stream_copy());
        assert!(ExportFormat::Wav.is_audio_only());
        assert!(!ExportFormat::Wmv.is_audio_only());
        assert_eq!(ExportFormat::Mp3.codec_args(), &["-vn", "-c:a", "libmp3lame", "-b:a", "192k"]);
        assert_eq!(ExportFormat::Wav.codec_args(), &["-vn", "-c:a", "pcm_s16le"]);
        for f in ALL_FORMATS.iter().filter(|f| f.is_audio_only()) {
            assert_eq!(f.codec_args()[0], "-vn", "{f}");
        }
    }

    #[test]
    fn request_builds_seek_duration_and_output() {
        let req = ExportRequest::new(&model(), "VideoFinal", "intro", ExportFormat::Mp3).unwrap();
        assert_eq!(req.output_path(), PathBuf::from("VideoFinal").join("intro.mp3"));
        let args = req.engine_args();
        let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
        assert_eq!(args[pos("-ss") + 1], "10.000");
        assert_eq!(args[pos("-i") + 1], "/media/in.mkv");
        assert_eq!(args[pos("-t") + 1], "15.500");
        assert!(pos("-ss") < pos("-i"), "seek must come before the input");
        assert!(args.contains(&"libmp3lame".to_string()));
        assert_eq!(args.last().unwrap(), &req.output_path().to_string_lossy().into_owned());
    }

    #[test]
    fn request_rejects_invalid_interval() {
        let mut m = model();
        m.set_from_text("00:00:30", "00:00:20").unwrap();
        assert!(matches!(
            ExportRequest::new(&m, "out", "x", ExportFormat::Mp4),
            Err(CutError::Range(_))
        ));
    }

    #[test]
    fn request_rejects_blank_name() {
        assert_eq!(
            ExportRequest::new(&model(), "out", "   ", ExportFormat::Mp4),
            Err(CutError::MissingInput("output name"))
        );
    }

    #[test]
    fn progress_lines_map_to_percent() {
        let lines = [
            "frame=    1 fps=0.0 q=-1.0 size=       0kB time=00:00:00.00 bitrate=N/A speed=N/A",
            "frame=  125 fps=0.0 q=-1.0 size=     512kB time=00:00:05.00 bitrate= 838.9kbits/s speed=10x",
            "frame=  250 fps=0.0 q=-1.0 Lsize=   1024kB time=00:00:10.00 bitrate= 838.9kbits/s speed=10x",
        ];
        let pct: Vec<f32> = lines
            .iter()
            .filter_map(|l| match parse_progress_line(l) {
                ProgressLine::Elapsed(t) => progress_percent(t, 10.0),
                _ => None,
            })
            .collect();
        assert_eq!(pct, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress_percent(12.0, 10.0), Some(100.0));
        assert_eq!(progress_percent(-1.0, 10.0), Some(0.0));
        assert_eq!(progress_percent(1.0, 0.0), None);
    }

    #[test]
    fn malformed_markers_are_distinguished() {
        assert_eq!(parse_progress_line("Input #0, mov,mp4"), ProgressLine::Unrelated);
        assert_eq!(parse_progress_line("size=0kB time=N/A bitrate=N/A"), ProgressLine::Malformed);
        assert_eq!(parse_progress_line("time=00:00"), ProgressLine::Malformed);
        assert_eq!(parse_progress_line("time="), ProgressLine::Malformed);
        assert_eq!(parse_progress_line("time=00:01:02.50"), ProgressLine::Elapsed(62.5));
    }
}
