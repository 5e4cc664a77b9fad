use rayon::prelude::*;

use crate::animation::{Animation, Frame};
use crate::foundation::error::{MemeError, MemeResult};
use crate::layout::TextBox;
use crate::render::blend::over_in_place;
use crate::text::PlacedGlyph;

const STROKE: [u8; 4] = [0, 0, 0, 255];
const FILL: [u8; 4] = [255, 255, 255, 255];

/// One caption ready for drawing, shared read-only by every worker.
struct CaptionJob<'a> {
    font: vello_cpu::peniko::FontData,
    font_size: f32,
    origin: (f64, f64),
    glyphs: &'a [PlacedGlyph],
    offsets: Vec<(i32, i32)>,
}

impl<'a> CaptionJob<'a> {
    fn for_box(text_box: &'a TextBox) -> Option<Self> {
        if text_box.is_blank() {
            return None;
        }
        let caption = text_box.caption.as_ref()?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(text_box.font.bytes().to_vec()),
            text_box.font.index(),
        );
        let origin = (
            f64::from(text_box.center.x) - f64::from(caption.width) * 0.5,
            f64::from(text_box.center.y) - f64::from(caption.height) * 0.5,
        );
        Some(Self {
            font,
            font_size: caption.font_size,
            origin,
            glyphs: &caption.glyphs,
            offsets: stroke_offsets(text_box.stroke_size()),
        })
    }
}

/// Integer offsets strictly inside the disc of radius `r`.
pub fn stroke_offsets(r: i32) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    if r <= 0 {
        return out;
    }
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy < r * r {
                out.push((dx, dy));
            }
        }
    }
    out
}

/// Per-worker raster state, reused across the frames a worker handles.
#[derive(Default)]
struct Painter {
    ctx: Option<vello_cpu::RenderContext>,
    scratch: Option<(u16, u16, vello_cpu::Pixmap)>,
}

impl Painter {
    fn paint(&mut self, frame: &mut Frame, jobs: &[CaptionJob<'_>]) -> MemeResult<()> {
        let width = frame.bounds.width;
        let height = frame.bounds.height;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        let shift = (
            -f64::from(frame.bounds.left),
            -f64::from(frame.bounds.top),
        );
        for job in jobs {
            set_color(&mut ctx, STROKE);
            for &(dx, dy) in &job.offsets {
                draw_caption(&mut ctx, job, shift, (f64::from(dx), f64::from(dy)));
            }
            set_color(&mut ctx, FILL);
            draw_caption(&mut ctx, job, shift, (0.0, 0.0));
        }
        ctx.flush();

        let mut scratch = match self.scratch.take() {
            Some((w, h, p)) if w == width && h == height => p,
            _ => vello_cpu::Pixmap::new(width, height),
        };
        scratch.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut scratch);

        let mut surface = frame.to_rgba_premul();
        over_in_place(&mut surface, scratch.data_as_u8_slice())?;
        frame.quantize_from_rgba_premul(&surface)?;

        self.ctx = Some(ctx);
        self.scratch = Some((width, height, scratch));
        Ok(())
    }
}

fn set_color(ctx: &mut vello_cpu::RenderContext, [r, g, b, a]: [u8; 4]) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
}

fn draw_caption(
    ctx: &mut vello_cpu::RenderContext,
    job: &CaptionJob<'_>,
    shift: (f64, f64),
    offset: (f64, f64),
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        job.origin.0 + shift.0 + offset.0,
        job.origin.1 + shift.1 + offset.1,
    )));
    let glyphs = job.glyphs.iter().map(|g| vello_cpu::Glyph {
        id: g.id,
        x: g.x,
        y: g.y,
    });
    ctx.glyph_run(&job.font)
        .font_size(job.font_size)
        .fill_glyphs(glyphs);
}

/// Draw every non-blank caption onto every frame, in parallel across frames.
///
/// Each worker writes only the frame it was handed. The first failing frame aborts the render.
#[tracing::instrument(skip(anim, boxes), fields(frames = anim.frames.len(), boxes = boxes.len()))]
pub fn render(anim: &mut Animation, boxes: &[TextBox], threads: Option<usize>) -> MemeResult<()> {
    let pool = build_thread_pool(threads)?;
    let jobs = boxes
        .iter()
        .filter_map(CaptionJob::for_box)
        .collect::<Vec<_>>();
    if jobs.is_empty() {
        tracing::debug!("no captions to draw");
        return Ok(());
    }

    pool.install(|| {
        anim.frames
            .par_iter_mut()
            .enumerate()
            .try_for_each_init(Painter::default, |painter, (i, frame)| {
                painter.paint(frame, &jobs).map_err(|e| {
                    tracing::warn!(frame = i, error = %e, "frame render failed");
                    e
                })
            })
    })
}

/// Thread pool for frame rendering; `None` uses rayon's default size.
pub fn build_thread_pool(threads: Option<usize>) -> MemeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MemeError::config("render 'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MemeError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
