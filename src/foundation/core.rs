use crate::foundation::error::{MemeError, MemeResult};

/// Integer pixel coordinate in image space.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: i32,
    /// Vertical coordinate, growing downwards.
    pub y: i32,
}

impl Point {
    /// Build a point from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangle occupied by a frame on the logical screen.
///
/// GIF frame descriptors store these as 16-bit values, so this does too.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Left edge offset from the screen origin.
    pub left: u16,
    /// Top edge offset from the screen origin.
    pub top: u16,
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
}

impl Bounds {
    /// Create bounds, rejecting empty rectangles.
    pub fn new(left: u16, top: u16, width: u16, height: u16) -> MemeResult<Self> {
        if width == 0 || height == 0 {
            return Err(MemeError::corrupt(format!(
                "frame bounds must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        u32::from(self.left) + u32::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        u32::from(self.top) + u32::from(self.height)
    }

    /// Number of pixels covered.
    pub fn area(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Return `true` when the absolute pixel `(x, y)` lies inside.
    pub fn contains(self, x: u32, y: u32) -> bool {
        x >= u32::from(self.left) && x < self.right() && y >= u32::from(self.top) && y < self.bottom()
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Opaque color from straight RGB.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert back to straight-alpha RGBA8.
    pub fn to_straight(self) -> [u8; 4] {
        if self.a == 0 {
            return [0, 0, 0, 0];
        }
        let a = u16::from(self.a);
        let unpremul = |c: u8| -> u8 { ((u16::from(c) * 255 + a / 2) / a).min(255) as u8 };
        [unpremul(self.r), unpremul(self.g), unpremul(self.b), self.a]
    }

    /// Channels in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
