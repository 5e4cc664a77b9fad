//! Bringing every frame of an animation to the canvas size.

/// Partial-frame expansion.
pub mod frames;

pub use frames::normalize;
