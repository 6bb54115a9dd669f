// crates/clipper-ui/src/helpers/mod.rs
pub mod format;
pub mod log;
