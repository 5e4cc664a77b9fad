use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::{Bounds, Rgba8Premul};
use crate::foundation::error::{MemeError, MemeResult};

/// Fixed color table of a frame, with an optional transparent entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 3]>,
    transparent: Option<u8>,
}

impl Palette {
    /// Build a palette from RGB triples. At most 256 colors are allowed.
    pub fn new(colors: Vec<[u8; 3]>, transparent: Option<u8>) -> MemeResult<Self> {
        if colors.is_empty() || colors.len() > 256 {
            return Err(MemeError::corrupt(format!(
                "palette must hold 1..=256 colors, got {}",
                colors.len()
            )));
        }
        Ok(Self {
            colors,
            transparent,
        })
    }

    /// Build a palette from packed `rgbrgb...` bytes as stored in GIF color tables.
    pub fn from_rgb_bytes(bytes: &[u8], transparent: Option<u8>) -> MemeResult<Self> {
        let colors = bytes
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect::<Vec<_>>();
        Self::new(colors, transparent)
    }

    /// Packed `rgbrgb...` bytes.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.colors.iter().flatten().copied().collect()
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`: empty palettes are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Index rendered as fully transparent, if any.
    pub fn transparent(&self) -> Option<u8> {
        self.transparent
    }

    /// Same colors with a different transparent index.
    pub fn with_transparent(&self, transparent: Option<u8>) -> Self {
        Self {
            colors: self.colors.clone(),
            transparent,
        }
    }

    /// Premultiplied color of a palette index. Out-of-range indices read as transparent.
    pub fn color(&self, index: u8) -> Rgba8Premul {
        if self.transparent == Some(index) {
            return Rgba8Premul::transparent();
        }
        match self.colors.get(usize::from(index)) {
            Some(&[r, g, b]) => Rgba8Premul::opaque(r, g, b),
            None => Rgba8Premul::transparent(),
        }
    }

    /// Index of the closest opaque color, or the transparent index for mostly-transparent input.
    pub fn nearest(&self, straight_rgba: [u8; 4]) -> u8 {
        let [r, g, b, a] = straight_rgba;
        if a < 128
            && let Some(t) = self.transparent
        {
            return t;
        }

        let mut best = (u32::MAX, 0u8);
        for (i, &[pr, pg, pb]) in self.colors.iter().enumerate() {
            let i = i as u8;
            if self.transparent == Some(i) {
                continue;
            }
            let d = sq_diff(r, pr) + sq_diff(g, pg) + sq_diff(b, pb);
            if d < best.0 {
                best = (d, i);
                if d == 0 {
                    break;
                }
            }
        }
        best.1
    }
}

fn sq_diff(a: u8, b: u8) -> u32 {
    let d = i32::from(a) - i32::from(b);
    (d * d) as u32
}

/// Per-frame disposal flag as stored in the GIF graphic control extension.
///
/// Carried through decode/encode but not interpreted by normalization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Disposal {
    /// No disposal specified.
    #[default]
    Any,
    /// Leave the frame in place.
    Keep,
    /// Restore the frame area to the background.
    Background,
    /// Restore the frame area to the previous contents.
    Previous,
}

/// Loop behaviour of the animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    /// Loop forever.
    #[default]
    Infinite,
    /// Play the given number of times.
    Finite(u16),
}

/// One indexed raster frame of an animation.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Placement on the logical screen.
    pub bounds: Bounds,
    /// Color table used by `indices`.
    pub palette: Arc<Palette>,
    /// Row-major palette indices, `bounds.width * bounds.height` long.
    pub indices: Vec<u8>,
    /// Display delay in hundredths of a second.
    pub delay: u16,
    /// Disposal flag.
    pub disposal: Disposal,
}

impl Frame {
    /// Build a frame, checking the index buffer matches the bounds.
    pub fn new(bounds: Bounds, palette: Arc<Palette>, indices: Vec<u8>) -> MemeResult<Self> {
        if indices.len() != bounds.area() {
            return Err(MemeError::corrupt(format!(
                "frame has {} pixels, expected {}x{}",
                indices.len(),
                bounds.width,
                bounds.height
            )));
        }
        Ok(Self {
            bounds,
            palette,
            indices,
            delay: 0,
            disposal: Disposal::Any,
        })
    }

    /// Frame with the given delay.
    pub fn with_delay(mut self, delay: u16) -> Self {
        self.delay = delay;
        self
    }

    /// Frame with the given disposal flag.
    pub fn with_disposal(mut self, disposal: Disposal) -> Self {
        self.disposal = disposal;
        self
    }

    /// Color at frame-local pixel `(x, y)`.
    pub fn pixel(&self, x: u16, y: u16) -> Rgba8Premul {
        let i = usize::from(y) * usize::from(self.bounds.width) + usize::from(x);
        self.indices
            .get(i)
            .map_or(Rgba8Premul::transparent(), |&idx| self.palette.color(idx))
    }

    /// Color at an absolute screen position, if the frame covers it.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let lx = (x - u32::from(self.bounds.left)) as u16;
        let ly = (y - u32::from(self.bounds.top)) as u16;
        Some(self.pixel(lx, ly))
    }

    /// Expand the indices into premultiplied RGBA8 bytes.
    pub fn to_rgba_premul(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.indices.len() * 4);
        for &idx in &self.indices {
            out.extend_from_slice(&self.palette.color(idx).to_array());
        }
        out
    }

    /// Replace the indices with the nearest palette entries of premultiplied RGBA8 pixels.
    pub fn quantize_from_rgba_premul(&mut self, rgba: &[u8]) -> MemeResult<()> {
        if rgba.len() != self.indices.len() * 4 {
            return Err(MemeError::render(format!(
                "surface has {} bytes, frame expects {}",
                rgba.len(),
                self.indices.len() * 4
            )));
        }
        let palette = &self.palette;
        let mut lookup = HashMap::<[u8; 4], u8>::new();
        for (dst, px) in self.indices.iter_mut().zip(rgba.chunks_exact(4)) {
            let key = [px[0], px[1], px[2], px[3]];
            *dst = *lookup.entry(key).or_insert_with(|| {
                let premul = Rgba8Premul {
                    r: key[0],
                    g: key[1],
                    b: key[2],
                    a: key[3],
                };
                palette.nearest(premul.to_straight())
            });
        }
        Ok(())
    }
}

/// An ordered sequence of frames on a logical screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    /// Logical screen width.
    pub screen_width: u16,
    /// Logical screen height.
    pub screen_height: u16,
    /// Frames in display order. Never empty.
    pub frames: Vec<Frame>,
    /// Loop count.
    pub repeat: Repeat,
}

impl Animation {
    /// Build an animation; at least one frame is required.
    pub fn new(screen_width: u16, screen_height: u16, frames: Vec<Frame>) -> MemeResult<Self> {
        if frames.is_empty() {
            return Err(MemeError::corrupt("animation has no frames"));
        }
        Ok(Self {
            screen_width,
            screen_height,
            frames,
            repeat: Repeat::Infinite,
        })
    }

    /// Bounds of the first frame, which every frame shares once normalized.
    pub fn canvas_bounds(&self) -> Bounds {
        self.frames.first().map(|f| f.bounds).unwrap_or_default()
    }

    /// Return `true` when every frame has the first frame's bounds.
    pub fn is_normalized(&self) -> bool {
        let canvas = self.canvas_bounds();
        self.frames.iter().all(|f| f.bounds == canvas)
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`: empty animations are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/model.rs"]
mod tests;
