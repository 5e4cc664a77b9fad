use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::assets::font::FontRef;
use crate::assets::gif_codec;
use crate::config::FitConfig;
use crate::foundation::core::Point;
use crate::foundation::error::{MemeError, MemeResult};
use crate::meme::Meme;
use crate::text::{CaptionLayout, TextLayoutEngine};

/// Caller-supplied geometry of one box: center point and size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoxSpec {
    /// Center x.
    pub x: i32,
    /// Center y.
    pub y: i32,
    /// Box width.
    pub width: i32,
    /// Box height.
    pub height: i32,
}

impl BoxSpec {
    /// Parse the `x|y|width|height` form used in request queries.
    pub fn from_query(value: &str) -> MemeResult<Self> {
        let parts = value
            .split('|')
            .map(|p| p.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MemeError::invalid(format!("bad box '{value}': {e}")))?;
        let [x, y, width, height] = parts[..] else {
            return Err(MemeError::invalid(format!(
                "bad box '{value}': expected x|y|width|height"
            )));
        };
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }
}

/// A rectangle that receives one caption.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBox {
    /// Caption text. Blank captions are never drawn.
    pub text: String,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Center of the box in image coordinates.
    pub center: Point,
    /// Font used for the caption.
    pub font: FontRef,
    /// Line spacing as a fraction of the line height.
    pub line_spacing: f32,
    /// Font size chosen by fitting; 0 until fitted.
    pub font_size: f32,
    /// Shaped caption at `font_size`, present once fitted.
    pub caption: Option<CaptionLayout>,
}

impl TextBox {
    /// Empty box with the given geometry.
    pub fn new(spec: BoxSpec, font: FontRef, line_spacing: f32) -> Self {
        Self {
            text: String::new(),
            width: spec.width,
            height: spec.height,
            center: Point::new(spec.x, spec.y),
            font,
            line_spacing,
            font_size: 0.0,
            caption: None,
        }
    }

    /// Geometry of this box.
    pub fn spec(&self) -> BoxSpec {
        BoxSpec {
            x: self.center.x,
            y: self.center.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Return `true` when there is nothing to draw.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Substitute `text` and fit it to the box.
    ///
    /// Blank text is accepted without measuring and is skipped at render time.
    pub fn set_text(
        &mut self,
        engine: &mut TextLayoutEngine,
        text: &str,
        max_font_size: f32,
        min_font_size: f32,
    ) -> MemeResult<()> {
        self.text = text.to_string();
        self.font_size = 0.0;
        self.caption = None;
        if self.is_blank() {
            return Ok(());
        }
        let caption = engine.fit_layout(
            &self.text,
            self.width,
            self.height,
            &self.font,
            max_font_size,
            min_font_size,
            self.line_spacing,
        )?;
        self.font_size = caption.font_size;
        self.caption = Some(caption);
        Ok(())
    }

    /// Radius of the black outline drawn behind the caption.
    pub fn stroke_size(&self) -> i32 {
        let Some(caption) = &self.caption else {
            return 0;
        };
        (CaptionLayout::spacing_for(caption.line_height, self.line_spacing) * 0.4) as i32
    }
}

/// Source image, font and ordered boxes for one meme.
#[derive(Clone, Debug)]
pub struct LayoutTemplate {
    image_path: PathBuf,
    font: FontRef,
    fit: FitConfig,
    boxes: Vec<TextBox>,
    source: Option<Animation>,
}

impl LayoutTemplate {
    /// Top and bottom boxes derived from the source image's first frame.
    #[tracing::instrument(skip_all, fields(image = %image_path.as_ref().display(), font = font.name()))]
    pub fn simple(image_path: impl AsRef<Path>, font: FontRef, fit: FitConfig) -> MemeResult<Self> {
        let image_path = image_path.as_ref();
        let source = gif_codec::decode_file(image_path)?;
        let bounds = source.canvas_bounds();
        let mut tpl = Self::for_image_size(
            image_path,
            u32::from(bounds.width),
            u32::from(bounds.height),
            font,
            fit,
        )?;
        tpl.source = Some(source);
        Ok(tpl)
    }

    /// Top and bottom boxes for an image of `width x height` pixels.
    pub fn for_image_size(
        image_path: impl AsRef<Path>,
        width: u32,
        height: u32,
        font: FontRef,
        fit: FitConfig,
    ) -> MemeResult<Self> {
        fit.validate()?;
        let boxes = default_boxes(width, height, fit.border)
            .into_iter()
            .map(|spec| TextBox::new(spec, font.clone(), fit.line_spacing))
            .collect();
        Ok(Self {
            image_path: image_path.as_ref().to_path_buf(),
            font,
            fit,
            boxes,
            source: None,
        })
    }

    /// One box per caller-supplied spec, used verbatim.
    pub fn explicit(
        image_path: impl AsRef<Path>,
        font: FontRef,
        specs: &[BoxSpec],
        fit: FitConfig,
    ) -> MemeResult<Self> {
        fit.validate()?;
        let boxes = specs
            .iter()
            .map(|&spec| TextBox::new(spec, font.clone(), fit.line_spacing))
            .collect();
        Ok(Self {
            image_path: image_path.as_ref().to_path_buf(),
            font,
            fit,
            boxes,
            source: None,
        })
    }

    /// Path of the source gif.
    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    /// Font shared by every box.
    pub fn font(&self) -> &FontRef {
        &self.font
    }

    /// Sizing policy.
    pub fn fit(&self) -> &FitConfig {
        &self.fit
    }

    /// Unbound boxes in caption order.
    pub fn boxes(&self) -> &[TextBox] {
        &self.boxes
    }

    /// Fit one caption per box, in order.
    ///
    /// Fails without a partial result if the counts differ or any caption does not fit.
    pub fn bind<S: AsRef<str>>(
        &self,
        engine: &mut TextLayoutEngine,
        captions: &[S],
    ) -> MemeResult<Vec<TextBox>> {
        if captions.len() != self.boxes.len() {
            return Err(MemeError::CaptionCountMismatch {
                expected: self.boxes.len(),
                got: captions.len(),
            });
        }
        let mut bound = Vec::with_capacity(self.boxes.len());
        for (template_box, caption) in self.boxes.iter().zip(captions) {
            let mut b = template_box.clone();
            b.set_text(
                engine,
                caption.as_ref(),
                self.fit.max_font_size,
                self.fit.min_font_size,
            )?;
            bound.push(b);
        }
        Ok(bound)
    }

    /// Bind `captions` and load the source animation.
    #[tracing::instrument(skip(self, captions), fields(image = %self.image_path.display()))]
    pub fn meme<S: AsRef<str>>(&self, captions: &[S]) -> MemeResult<Meme> {
        let mut engine = TextLayoutEngine::new();
        let boxes = self.bind(&mut engine, captions)?;
        let animation = match &self.source {
            Some(anim) => anim.clone(),
            None => gif_codec::decode_file(&self.image_path)?,
        };
        Ok(Meme::new(animation, boxes, self.fit.border))
    }
}

/// Geometry of the default top and bottom boxes.
pub fn default_boxes(width: u32, height: u32, border: f32) -> [BoxSpec; 2] {
    let img_w = f64::from(width);
    let img_h = f64::from(height);
    let border = f64::from(border);
    let box_w = img_w * (1.0 - 2.0 * border);
    let box_h = img_h * (1.0 / 3.0 - border);
    let x = (img_w * 0.5) as i32;
    let top_y = (img_h * border + box_h * 0.5) as i32;
    let bottom_y = (img_h - img_h * border - box_h * 0.5) as i32;
    let spec = |y| BoxSpec {
        x,
        y,
        width: box_w as i32,
        height: box_h as i32,
    };
    [spec(top_y), spec(bottom_y)]
}

#[cfg(test)]
#[path = "../../tests/unit/layout/template.rs"]
mod tests;
