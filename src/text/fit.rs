use std::borrow::Cow;
use std::collections::HashMap;

use crate::assets::font::FontRef;
use crate::foundation::error::{MemeError, MemeResult};

/// Font size decrement between two fitting attempts.
pub const FIT_STEP: f32 = 2.0;

/// Largest font size the search starts from; larger maxima are clamped to it.
pub const MAX_FONT_SIZE: f32 = 1024.0;

/// One glyph positioned relative to the top-left corner of its caption block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    /// Glyph id in the caption font.
    pub id: u32,
    /// Horizontal pen position.
    pub x: f32,
    /// Baseline position.
    pub y: f32,
}

/// A caption shaped, wrapped and measured at one font size.
///
/// Lines are centered inside the block and separated by the configured line spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionLayout {
    /// Font size the caption was shaped at.
    pub font_size: f32,
    /// Width of the widest line.
    pub width: f32,
    /// Sum of line heights plus inter-line spacing.
    pub height: f32,
    /// Natural height of one line at this size.
    pub line_height: f32,
    /// Number of wrapped lines.
    pub line_count: usize,
    /// Glyphs in drawing order.
    pub glyphs: Vec<PlacedGlyph>,
}

impl CaptionLayout {
    /// Spacing inserted between wrapped lines for `ratio`.
    pub fn spacing_for(line_height: f32, ratio: f32) -> f32 {
        (line_height * ratio).ceil()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FontKey {
    name: String,
    index: u32,
    len: usize,
}

impl FontKey {
    fn of(font: &FontRef) -> Self {
        Self {
            name: font.name().to_string(),
            index: font.index(),
            len: font.bytes().len(),
        }
    }
}

/// Stateful helper for shaping captions with Parley.
///
/// Fonts are registered once per engine and looked up by family name afterwards.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    families: HashMap<FontKey, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &FontRef, size: f32) -> MemeResult<String> {
        let unavailable = || MemeError::FontUnavailable {
            font: font.name().to_string(),
            size,
        };
        if !size.is_finite() || size <= 0.0 {
            return Err(unavailable());
        }

        let key = FontKey::of(font);
        if let Some(name) = self.families.get(&key) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(unavailable)?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(unavailable)?
            .to_string();

        self.families.insert(key, family_name.clone());
        Ok(family_name)
    }

    /// Shape `text` at `size`, wrapping at `max_width`.
    pub fn layout(
        &mut self,
        text: &str,
        font: &FontRef,
        size: f32,
        max_width: f32,
        line_spacing_ratio: f32,
    ) -> MemeResult<CaptionLayout> {
        let family_name = self.family_for(font, size)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(Some(max_width));
        layout.align(
            Some(max_width),
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let mut line_height = 0.0f32;
        let mut width = 0.0f32;
        let mut natural_height = 0.0f32;
        let mut line_count = 0usize;
        for line in layout.lines() {
            let m = line.metrics();
            if line_count == 0 {
                line_height = m.line_height;
            }
            width = width.max((m.advance - m.trailing_whitespace).max(0.0));
            natural_height += m.line_height;
            line_count += 1;
        }
        if line_count == 0 {
            return Err(MemeError::FontUnavailable {
                font: font.name().to_string(),
                size,
            });
        }

        let spacing = CaptionLayout::spacing_for(line_height, line_spacing_ratio);
        let mut glyphs = Vec::new();
        for (i, line) in layout.lines().enumerate() {
            let m = line.metrics();
            let dx = (width - (m.advance - m.trailing_whitespace).max(0.0)) * 0.5;
            let dy = spacing * i as f32;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| PlacedGlyph {
                    id: g.id,
                    x: g.x + dx,
                    y: g.y + dy,
                }));
            }
        }

        Ok(CaptionLayout {
            font_size: size,
            width,
            height: natural_height + spacing * (line_count - 1) as f32,
            line_height,
            line_count,
            glyphs,
        })
    }

    /// Largest size in `[min_size, max_size]`, stepping by [`FIT_STEP`], at which `text` fits.
    ///
    /// Only positive sizes up to [`MAX_FONT_SIZE`] are tried.
    #[allow(clippy::too_many_arguments)]
    pub fn fit(
        &mut self,
        text: &str,
        box_width: i32,
        box_height: i32,
        font: &FontRef,
        max_size: f32,
        min_size: f32,
        line_spacing_ratio: f32,
    ) -> MemeResult<f32> {
        self.fit_layout(
            text,
            box_width,
            box_height,
            font,
            max_size,
            min_size,
            line_spacing_ratio,
        )
        .map(|c| c.font_size)
    }

    /// Like [`TextLayoutEngine::fit`], returning the fitted layout for drawing.
    #[allow(clippy::too_many_arguments)]
    pub fn fit_layout(
        &mut self,
        text: &str,
        box_width: i32,
        box_height: i32,
        font: &FontRef,
        max_size: f32,
        min_size: f32,
        line_spacing_ratio: f32,
    ) -> MemeResult<CaptionLayout> {
        if box_width <= 0 || box_height <= 0 {
            return Err(MemeError::BoxTooSmall {
                width: box_width,
                height: box_height,
            });
        }

        let does_not_fit = || MemeError::TextDoesNotFit {
            text: text.to_string(),
            width: box_width,
            height: box_height,
        };
        let top = max_size.min(MAX_FONT_SIZE);
        if min_size.is_nan() || top < min_size {
            return Err(does_not_fit());
        }

        // Sizes are counted from the top so the search always terminates.
        let steps = ((top - min_size) / FIT_STEP) as u32;
        for step in 0..=steps {
            let size = top - step as f32 * FIT_STEP;
            if size <= 0.0 {
                break;
            }
            let caption = self.layout(text, font, size, box_width as f32, line_spacing_ratio)?;
            if (caption.width as i32) <= box_width && (caption.height as i32) <= box_height {
                tracing::debug!(
                    size,
                    lines = caption.line_count,
                    box_width,
                    box_height,
                    "caption fits"
                );
                return Ok(caption);
            }
        }

        Err(does_not_fit())
    }
}

/// One-shot [`TextLayoutEngine::fit`] with a fresh engine.
#[allow(clippy::too_many_arguments)]
pub fn fit(
    text: &str,
    box_width: i32,
    box_height: i32,
    font: &FontRef,
    max_size: f32,
    min_size: f32,
    line_spacing_ratio: f32,
) -> MemeResult<f32> {
    TextLayoutEngine::new().fit(
        text,
        box_width,
        box_height,
        font,
        max_size,
        min_size,
        line_spacing_ratio,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
