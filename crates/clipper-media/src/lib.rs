// crates/clipper-media/src/lib.rs
//
// No egui dependency; communicates with clipper-ui via channels only.
//
// To add a new media capability:
//   1. Create a new module file here
//   2. Add `pub mod mymodule;` below
//   3. Call it from worker.rs (a new MediaWorker method + thread)

pub mod decode;
mod helpers;
pub mod probe;
pub mod transcode;
pub mod worker;

// Re-export the main public API so clipper-ui imports are simple.
pub use worker::MediaWorker;
pub use clipper_core::media_types::{MediaResult, PlaybackFrame};
