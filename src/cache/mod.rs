//! Fingerprint-addressed storage of generated memes.

/// Request digests.
pub mod fingerprint;
/// Single-flight artifact store.
pub mod store;

pub use fingerprint::{Fingerprint, canonical_query};
pub use store::FingerprintCache;
