//! Indexed animation model shared by the codec, the normalizer and the compositor.

/// Palettes, frames and animations.
pub mod model;

pub use model::{Animation, Disposal, Frame, Palette, Repeat};
