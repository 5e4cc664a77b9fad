//! Caption rasterization onto animation frames.

/// Premultiplied pixel blending.
pub mod blend;
/// Parallel per-frame caption drawing.
pub mod compositor;

pub use compositor::{build_thread_pool, render, stroke_offsets};
