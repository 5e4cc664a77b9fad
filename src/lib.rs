//! memeoid turns animated GIFs into captioned memes.
//!
//! The pipeline is:
//!
//! - Decode the source into an indexed [`Animation`]
//! - Bind captions to a [`LayoutTemplate`], fitting each one to its box
//! - [`Meme::generate`]: normalize partial frames, then draw every caption on every frame in
//!   parallel
//! - Store the result in a [`FingerprintCache`] keyed by the request's [`Fingerprint`]
//!
//! [`MemeService`] wires these together behind URL-query requests.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod animation;
pub mod assets;
pub mod cache;
pub mod config;
pub mod foundation;
pub mod layout;
pub mod meme;
pub mod normalize;
pub mod render;
pub mod request;
pub mod service;
pub mod text;

pub use crate::animation::{Animation, Disposal, Frame, Palette, Repeat};
pub use crate::assets::font::{FontCatalog, FontRef};
pub use crate::assets::gif_codec::{decode, decode_file, encode, encode_to_vec};
pub use crate::cache::{Fingerprint, FingerprintCache};
pub use crate::config::{FONT_ENV_VAR, FitConfig, MemeConfig};
pub use crate::foundation::core::{Bounds, Point, Rgba8Premul};
pub use crate::foundation::error::{ErrorClass, MemeError, MemeResult};
pub use crate::layout::{BoxSpec, LayoutTemplate, TextBox};
pub use crate::meme::{FrameInfo, Meme, frame_info, meme_from_file, preview_animation};
pub use crate::normalize::normalize;
pub use crate::render::render;
pub use crate::request::{MemeRequest, RequestLayout};
pub use crate::service::{Generated, MemeService};
pub use crate::text::{CaptionLayout, MAX_FONT_SIZE, TextLayoutEngine, fit};
