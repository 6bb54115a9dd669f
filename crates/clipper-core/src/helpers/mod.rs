// crates/clipper-core/src/helpers/mod.rs
//
// Small shared utilities with no state of their own.

pub mod geometry;
pub mod time;
