//! External resources: host fonts, the GIF container and source-image paths.

/// Font lookup in the host font database.
pub mod font;
/// Indexed GIF decode and encode.
pub mod gif_codec;
/// Source-image path validation.
pub mod path;

pub use font::{FontCatalog, FontRef};
