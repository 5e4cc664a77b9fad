//! Core value types and the error taxonomy.

/// Geometry and color primitives.
pub mod core;
/// Error type and request-boundary classes.
pub mod error;
