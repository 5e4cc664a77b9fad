//! A source animation together with the captions drawn onto it.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::animation::{Animation, Disposal};
use crate::assets::font::FontRef;
use crate::assets::gif_codec;
use crate::config::FitConfig;
use crate::foundation::error::{MemeError, MemeResult};
use crate::layout::{LayoutTemplate, TextBox};
use crate::normalize::normalize;
use crate::render::render;

/// Per-frame summary reported by `memeoid info`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FrameInfo {
    /// Position in the animation.
    pub index: usize,
    /// Display delay in milliseconds.
    pub delay_ms: u32,
    /// Frame width.
    pub width: u16,
    /// Frame height.
    pub height: u16,
    /// Left offset on the screen.
    pub left: u16,
    /// Top offset on the screen.
    pub top: u16,
    /// Disposal flag name.
    pub disposal: &'static str,
}

/// Animation plus bound text boxes.
#[derive(Clone, Debug)]
pub struct Meme {
    animation: Animation,
    boxes: Vec<TextBox>,
    border: f32,
    generated: bool,
}

impl Meme {
    /// Pair an animation with already fitted boxes.
    pub fn new(animation: Animation, boxes: Vec<TextBox>, border: f32) -> Self {
        Self {
            animation,
            boxes,
            border,
            generated: false,
        }
    }

    /// Current frames.
    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Bound boxes in caption order.
    pub fn boxes(&self) -> &[TextBox] {
        &self.boxes
    }

    /// Border fraction the default layout was derived with.
    pub fn border(&self) -> f32 {
        self.border
    }

    /// Normalize the frames and draw the captions. Calling it again is a no-op.
    #[tracing::instrument(skip(self), fields(frames = self.animation.len()))]
    pub fn generate(&mut self, threads: Option<usize>) -> MemeResult<()> {
        if self.generated {
            return Ok(());
        }
        normalize(&mut self.animation);
        render(&mut self.animation, &self.boxes, threads)?;
        self.generated = true;
        Ok(())
    }

    /// Write the current frames as a GIF stream.
    pub fn encode<W: Write>(&self, writer: W) -> MemeResult<()> {
        gif_codec::encode(&self.animation, writer)
    }

    /// Write the current frames to a GIF file.
    pub fn save(&self, path: impl AsRef<Path>) -> MemeResult<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| {
            MemeError::store(format!("failed to create '{}': {e}", path.display()))
        })?;
        self.encode(std::io::BufWriter::new(file))
    }
}

/// Thumbnail of the first frame of `anim`.
pub fn preview_animation(
    anim: &Animation,
    max_width: u32,
    max_height: u32,
) -> MemeResult<image::RgbaImage> {
    if max_width == 0 || max_height == 0 {
        return Err(MemeError::invalid(format!(
            "preview size must be non-empty, got {max_width}x{max_height}"
        )));
    }
    let frame = anim
        .frames
        .first()
        .ok_or_else(|| MemeError::corrupt("animation has no frames"))?;
    let width = u32::from(frame.bounds.width);
    let height = u32::from(frame.bounds.height);
    let full = image::RgbaImage::from_raw(width, height, frame.to_rgba_premul())
        .ok_or_else(|| MemeError::render("frame buffer does not match its bounds"))?;

    let scale = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    )
    .min(1.0);
    let w = ((f64::from(width) * scale).round() as u32).max(1);
    let h = ((f64::from(height) * scale).round() as u32).max(1);
    if (w, h) == (width, height) {
        return Ok(full);
    }
    Ok(image::imageops::resize(
        &full,
        w,
        h,
        image::imageops::FilterType::Lanczos3,
    ))
}

/// Per-frame summary of `anim`.
pub fn frame_info(anim: &Animation) -> Vec<FrameInfo> {
    anim.frames
        .iter()
        .enumerate()
        .map(|(index, f)| FrameInfo {
            index,
            delay_ms: u32::from(f.delay) * 10,
            width: f.bounds.width,
            height: f.bounds.height,
            left: f.bounds.left,
            top: f.bounds.top,
            disposal: match f.disposal {
                Disposal::Any => "any",
                Disposal::Keep => "keep",
                Disposal::Background => "background",
                Disposal::Previous => "previous",
            },
        })
        .collect()
}

/// Top/bottom meme of the gif at `path`, ready for [`Meme::generate`].
pub fn meme_from_file(
    path: impl AsRef<Path>,
    top: &str,
    bottom: &str,
    font: FontRef,
    fit: FitConfig,
) -> MemeResult<Meme> {
    LayoutTemplate::simple(path, font, fit)?.meme(&[top, bottom])
}

#[cfg(test)]
#[path = "../tests/unit/meme.rs"]
mod tests;
