// crates/clipper-media/src/helpers/mod.rs
//
// Internal helper modules for clipper-media.
// Not re-exported from lib.rs; decode implementation details, not part of
// the public API consumed by clipper-ui.

pub mod seek;
