// crates/clipper-media/src/transcode.rs
//
// Export Invoker, side-effect half: runs the external ffmpeg CLI for one
// validated ExportRequest and turns its stderr into progress percentages.
//
// Sequence:
//   1. refuse if the destination already exists (no process is spawned)
//   2. create the output directory
//   3. spawn `<engine> <request.engine_args()>` with stderr piped
//   4. read stderr in chunks, splitting on both '\r' and '\n' because
//      ffmpeg rewrites its status line in place with '\r'
//   5. nonzero exit → TranscodeFailed with the last few log lines
//
// Runs on a MediaWorker thread. Blocking reads are fine there.

use std::collections::VecDeque;
use std::ffi::OsStr;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use clipper_core::error::CutError;
use clipper_core::export::{parse_progress_line, progress_percent, ExportRequest, ProgressLine};

#[cfg(windows)]
use std::os::windows::process::CommandExt;

/// Keeps a GUI launch from flashing a console window per export.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Log lines kept for the failure message.
const TAIL_LINES: usize = 10;

fn engine_command(program: impl AsRef<OsStr>) -> Command {
    let mut cmd = Command::new(program);
    #[cfg(windows)]
    cmd.creation_flags(CREATE_NO_WINDOW);
    cmd
}

/// Run one export to completion. `on_progress` receives percentages in
/// `[0, 100]`; a final 100 is always sent on success.
pub fn run_export(
    req:             &ExportRequest,
    engine:          &Path,
    mut on_progress: impl FnMut(f32),
) -> Result<PathBuf, CutError> {
    let output = req.output_path();
    if output.exists() {
        return Err(CutError::OutputExists { path: output });
    }

    let dir = req.output_dir();
    if !dir.as_os_str().is_empty() {
        std::fs::create_dir_all(dir)
            .map_err(|e| CutError::io(format!("create output directory {}", dir.display()), e))?;
    }

    let args = req.engine_args();
    tracing::info!("export start: {} {}", engine.display(), args.join(" "));

    let mut child = engine_command(engine)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => CutError::EngineNotFound {
                program: engine.display().to_string(),
            },
            _ => CutError::io("start ffmpeg", e),
        })?;

    let tail = match child.stderr.take() {
        Some(stderr) => follow_progress(stderr, req.clip_duration(), &mut on_progress),
        None         => String::new(),
    };

    let status = child.wait().map_err(|e| CutError::io("wait for ffmpeg", e))?;
    if !status.success() {
        tracing::error!("export failed ({status}):\n{tail}");
        return Err(CutError::TranscodeFailed { code: status.code(), diagnostics: tail });
    }

    on_progress(100.0);
    tracing::info!("export done → {}", output.display());
    Ok(output)
}

/// Consume an engine's stderr until EOF, reporting progress for every
/// `time=` marker. Returns the last non-progress log lines, newline-joined.
pub fn follow_progress(
    mut stream:  impl Read,
    clip_duration: f64,
    on_progress: &mut impl FnMut(f32),
) -> String {
    let mut tail: VecDeque<String> = VecDeque::with_capacity(TAIL_LINES);
    let mut line: Vec<u8>          = Vec::with_capacity(256);
    let mut buf                    = [0u8; 4096];

    let mut handle = |raw: &[u8], tail: &mut VecDeque<String>| {
        let text = String::from_utf8_lossy(raw);
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match parse_progress_line(text) {
            ProgressLine::Elapsed(secs) => {
                if let Some(pct) = progress_percent(secs, clip_duration) {
                    on_progress(pct);
                }
            }
            ProgressLine::Malformed => {
                tracing::debug!("unparsable progress line: {text}");
            }
            ProgressLine::Unrelated => {
                tracing::debug!("[ffmpeg] {text}");
                if tail.len() == TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(text.to_string());
            }
        }
    };

    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!("reading ffmpeg stderr: {e}");
                break;
            }
        };
        for &b in &buf[..n] {
            if b == b'\r' || b == b'\n' {
                handle(&line, &mut tail);
                line.clear();
            } else {
                line.push(b);
            }
        }
    }
    if !line.is_empty() {
        handle(&line, &mut tail);
    }

    Vec::from(tail).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use clipper_core::export::ExportFormat;
    use clipper_core::interval::{IntervalModel, MediaFile};

    fn request(dir: &Path, format: ExportFormat) -> ExportRequest {
        let mut m = IntervalModel::new(MediaFile::new(dir.join("in.mp4"), 60.0));
        m.set_from_text("00:00:00", "00:00:10").unwrap();
        ExportRequest::new(&m, dir.join("VideoFinal"), "cut", format).unwrap()
    }

    #[test]
    fn existing_output_is_refused_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), ExportFormat::Mp4);
        std::fs::create_dir_all(req.output_dir()).unwrap();
        std::fs::write(req.output_path(), b"keep me").unwrap();

        // The engine path does not exist; reaching spawn would give EngineNotFound.
        let engine = dir.path().join("no-such-ffmpeg");
        let mut calls = 0;
        let err = run_export(&req, &engine, |_| calls += 1).unwrap_err();
        assert_eq!(err, CutError::OutputExists { path: req.output_path() });
        assert_eq!(calls, 0);
        assert_eq!(std::fs::read(req.output_path()).unwrap(), b"keep me");
    }

    #[test]
    fn missing_engine_is_reported_and_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), ExportFormat::Mp3);
        let engine = dir.path().join("no-such-ffmpeg");
        let err = run_export(&req, &engine, |_| {}).unwrap_err();
        assert!(matches!(err, CutError::EngineNotFound { .. }));
        assert!(req.output_dir().is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_transcode_failed() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), ExportFormat::Wav);
        let err = run_export(&req, Path::new("false"), |_| {}).unwrap_err();
        assert!(matches!(err, CutError::TranscodeFailed { code: Some(1), .. }));
    }

    #[test]
    fn progress_from_carriage_return_status_lines() {
        let stderr = b"Input #0, mov,mp4\n\
            frame=1 time=00:00:00.00 bitrate=N/A\r\
            frame=2 time=00:00:05.00 bitrate=N/A\r\
            frame=3 time=00:00:10.00 bitrate=N/A\n";
        let mut seen = Vec::new();
        let tail = follow_progress(Cursor::new(&stderr[..]), 10.0, &mut |p| seen.push(p));
        assert_eq!(seen, vec![0.0, 50.0, 100.0]);
        assert_eq!(tail, "Input #0, mov,mp4");
    }

    #[test]
    fn malformed_markers_are_skipped() {
        let stderr = b"size=0kB time=N/A bitrate=N/A\rtime=00:00:02.50 speed=1x\r";
        let mut seen = Vec::new();
        let tail = follow_progress(Cursor::new(&stderr[..]), 10.0, &mut |p| seen.push(p));
        assert_eq!(seen, vec![25.0]);
        assert!(tail.is_empty());
    }

    #[test]
    fn tail_keeps_only_the_last_log_lines() {
        let mut stderr = String::new();
        for i in 0..25 {
            stderr.push_str(&format!("line {i}\n"));
        }
        stderr.push_str("Conversion failed!");
        let tail = follow_progress(Cursor::new(stderr.into_bytes()), 10.0, &mut |_| {});
        let lines: Vec<&str> = tail.lines().collect();
        assert_eq!(lines.len(), TAIL_LINES);
        assert_eq!(lines.first(), Some(&"line 16"));
        assert_eq!(lines.last(), Some(&"Conversion failed!"));
    }

    #[test]
    fn overshoot_is_clamped() {
        let stderr = b"time=00:00:12.00\n";
        let mut seen = Vec::new();
        follow_progress(Cursor::new(&stderr[..]), 10.0, &mut |p| seen.push(p));
        assert_eq!(seen, vec![100.0]);
    }
}
