// crates/clipper-core/src/lib.rs
//
// Pure data and logic: no egui, no ffmpeg, no threads.
// clipper-media and clipper-ui both depend on this crate; nothing here
// depends on them.

pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod helpers;
pub mod interval;
pub mod media_types;
pub mod preview;
pub mod ruler;
pub mod selection;
pub mod state;
pub mod waveform;

pub use error::{CutError, RangeError};
pub use interval::{Interval, IntervalModel, MediaFile};
