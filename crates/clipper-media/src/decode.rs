// crates/clipper-media/src/decode.rs
//
// LiveDecoder: stateful decoder owned by the preview pump. Opened once per
// preview window, then driven by seek() + next_frame() until the window
// closes. Frames come out as tightly packed RGBA at the source resolution;
// the UI does the aspect fit.

use std::path::Path;
use anyhow::{anyhow, Result};

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::{input, Pixel};
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};
use ffmpeg::util::frame::video::Video as VideoFrame;

use crate::helpers::seek::seek_to_secs;

/// One scaled frame.
pub struct DecodedFrame {
    pub data:      Vec<u8>, // RGBA, no stride padding
    pub width:     u32,
    pub height:    u32,
    pub timestamp: f64,
}

pub struct LiveDecoder {
    ictx:           ffmpeg::format::context::Input,
    decoder:        ffmpeg::decoder::video::Video,
    video_idx:      usize,
    tb_num:         i32,
    tb_den:         i32,
    last_pts:       i64,
    /// Frames with a PTS below this are decoded and dropped (seek pre-roll).
    skip_until_pts: i64,
    /// Demuxer ran dry and the decoder has been told so.
    eof:            bool,
    out_w:          u32,
    out_h:          u32,
    scaler:         SwsContext,
    /// Declared average frame rate; NaN or 0 when the container has none.
    pub fps:        f64,
}

impl LiveDecoder {
    pub fn open(path: &Path) -> Result<Self> {
        let ictx = input(&path)?;

        let (video_idx, tb, fps, decoder) = {
            let stream = ictx.streams().best(Type::Video)
                .ok_or_else(|| anyhow!("no video stream"))?;
            let dec_ctx = ffmpeg::codec::context::Context::from_parameters(stream.parameters())?;
            let decoder = dec_ctx.decoder().video()?;
            (stream.index(), stream.time_base(), f64::from(stream.avg_frame_rate()), decoder)
        };

        let out_w = decoder.width().max(2);
        let out_h = decoder.height().max(2);
        let scaler = SwsContext::get(
            decoder.format(), decoder.width(), decoder.height(),
            Pixel::RGBA, out_w, out_h, Flags::BILINEAR,
        )?;

        tracing::info!(
            "preview decoder {out_w}x{out_h} @ {fps:.3} fps ← {}", path.display()
        );

        Ok(Self {
            ictx, decoder, video_idx,
            tb_num: tb.numerator(),
            tb_den: tb.denominator().max(1),
            last_pts: 0,
            skip_until_pts: i64::MIN,
            eof: false,
            out_w, out_h, scaler, fps,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.out_w, self.out_h)
    }

    pub fn ts_to_pts(&self, t: f64) -> i64 {
        (t * self.tb_den as f64 / self.tb_num.max(1) as f64) as i64
    }

    pub fn pts_to_secs(&self, pts: i64) -> f64 {
        pts as f64 * self.tb_num as f64 / self.tb_den as f64
    }

    /// Reposition to `secs`. The next frame returned is the first one at or
    /// after the target, even if the demuxer landed on an earlier keyframe.
    pub fn seek(&mut self, secs: f64) {
        seek_to_secs(&mut self.ictx, secs, "preview");
        self.decoder.flush();
        self.eof            = false;
        self.skip_until_pts = self.ts_to_pts(secs);
        self.last_pts       = self.skip_until_pts;
    }

    /// Decode the next frame sequentially. `None` at end of stream.
    pub fn next_frame(&mut self) -> Option<DecodedFrame> {
        loop {
            // Drain what the decoder already holds before feeding more.
            let mut decoded = VideoFrame::empty();
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                let pts = decoded.pts().unwrap_or(self.last_pts + 1);
                self.last_pts = pts;
                if pts < self.skip_until_pts { continue; }
                return self.scale(&decoded, pts);
            }
            if self.eof {
                return None;
            }
            match self.next_video_packet() {
                Some(packet) => {
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        tracing::debug!("preview send_packet: {e}");
                    }
                }
                None => {
                    let _ = self.decoder.send_eof();
                    self.eof = true;
                }
            }
        }
    }

    fn next_video_packet(&mut self) -> Option<ffmpeg::Packet> {
        for (stream, packet) in self.ictx.packets().flatten() {
            if stream.index() == self.video_idx {
                return Some(packet);
            }
        }
        None
    }

    fn scale(&mut self, decoded: &VideoFrame, pts: i64) -> Option<DecodedFrame> {
        let mut out = VideoFrame::empty();
        if let Err(e) = self.scaler.run(decoded, &mut out) {
            tracing::warn!("preview scale: {e}");
            return None;
        }
        // Destripe: copy only visible pixels, not stride padding
        let stride    = out.stride(0);
        let raw       = out.data(0);
        let row_bytes = self.out_w as usize * 4;
        let data: Vec<u8> = (0..self.out_h as usize)
            .flat_map(|row| &raw[row * stride..row * stride + row_bytes])
            .copied()
            .collect();
        Some(DecodedFrame {
            data,
            width:     self.out_w,
            height:    self.out_h,
            timestamp: self.pts_to_secs(pts),
        })
    }
}
