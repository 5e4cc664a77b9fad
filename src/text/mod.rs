//! Caption shaping and font-size fitting.

/// Parley-backed shaping and the font-size search.
pub mod fit;

pub use fit::{CaptionLayout, FIT_STEP, MAX_FONT_SIZE, PlacedGlyph, TextLayoutEngine, fit};
