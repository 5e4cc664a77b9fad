//! Text-box geometry and caption binding.

/// Default and explicit box layouts.
pub mod template;

pub use template::{BoxSpec, LayoutTemplate, TextBox, default_boxes};
