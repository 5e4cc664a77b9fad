use std::borrow::Cow;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::animation::{Animation, Disposal, Frame, Palette, Repeat};
use crate::foundation::core::Bounds;
use crate::foundation::error::{MemeError, MemeResult};

/// Decode every frame of a GIF stream in indexed form.
///
/// Frames keep their own bounds, so partial frames stay partial until normalization.
pub fn decode<R: Read>(reader: R) -> MemeResult<Animation> {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = opts
        .read_info(reader)
        .map_err(|e| MemeError::corrupt(format!("gif header: {e}")))?;

    let global = match decoder.global_palette() {
        Some(bytes) if !bytes.is_empty() => Some(Palette::from_rgb_bytes(bytes, None)?),
        _ => None,
    };
    let screen_width = decoder.width();
    let screen_height = decoder.height();
    let repeat = match decoder.repeat() {
        gif::Repeat::Infinite => Repeat::Infinite,
        gif::Repeat::Finite(n) => Repeat::Finite(n),
    };

    let mut frames = Vec::new();
    while let Some(raw) = decoder
        .read_next_frame()
        .map_err(|e| MemeError::corrupt(format!("gif frame {}: {e}", frames.len())))?
    {
        let palette = match (&raw.palette, &global) {
            (Some(local), _) => Palette::from_rgb_bytes(local, raw.transparent)?,
            (None, Some(global)) => global.with_transparent(raw.transparent),
            (None, None) => {
                return Err(MemeError::corrupt(format!(
                    "gif frame {} has no color table",
                    frames.len()
                )));
            }
        };
        let bounds = Bounds::new(raw.left, raw.top, raw.width, raw.height)?;
        let frame = Frame::new(bounds, Arc::new(palette), raw.buffer.to_vec())?
            .with_delay(raw.delay)
            .with_disposal(disposal_from_gif(raw.dispose));
        frames.push(frame);
    }

    let mut anim = Animation::new(screen_width, screen_height, frames)?;
    anim.repeat = repeat;
    Ok(anim)
}

/// Open and decode a GIF file.
///
/// A missing file surfaces as an I/O error; undecodable content as [`MemeError::CorruptData`].
pub fn decode_file(path: impl AsRef<Path>) -> MemeResult<Animation> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    decode(std::io::BufReader::new(file))
}

/// Encode an animation, writing each frame with its own local color table.
pub fn encode<W: Write>(anim: &Animation, writer: W) -> MemeResult<()> {
    let (width, height) = screen_size(anim);
    let mut encoder = gif::Encoder::new(writer, width, height, &[])
        .map_err(|e| MemeError::store(format!("gif header: {e}")))?;
    let repeat = match anim.repeat {
        Repeat::Infinite => gif::Repeat::Infinite,
        Repeat::Finite(n) => gif::Repeat::Finite(n),
    };
    encoder
        .set_repeat(repeat)
        .map_err(|e| MemeError::store(format!("gif loop extension: {e}")))?;

    for (i, f) in anim.frames.iter().enumerate() {
        let mut out = gif::Frame::default();
        out.left = f.bounds.left;
        out.top = f.bounds.top;
        out.width = f.bounds.width;
        out.height = f.bounds.height;
        out.delay = f.delay;
        out.dispose = disposal_to_gif(f.disposal);
        out.transparent = f.palette.transparent();
        out.palette = Some(f.palette.to_rgb_bytes());
        out.buffer = Cow::Borrowed(&f.indices);
        encoder
            .write_frame(&out)
            .map_err(|e| MemeError::store(format!("gif frame {i}: {e}")))?;
    }

    let mut inner = encoder
        .into_inner()
        .map_err(|e| MemeError::store(format!("gif trailer: {e}")))?;
    inner
        .flush()
        .map_err(|e| MemeError::store(format!("flush: {e}")))?;
    Ok(())
}

/// Encode to an in-memory buffer.
pub fn encode_to_vec(anim: &Animation) -> MemeResult<Vec<u8>> {
    let mut buf = Vec::new();
    encode(anim, &mut buf)?;
    Ok(buf)
}

fn screen_size(anim: &Animation) -> (u16, u16) {
    let mut w = u32::from(anim.screen_width);
    let mut h = u32::from(anim.screen_height);
    for f in &anim.frames {
        w = w.max(f.bounds.right());
        h = h.max(f.bounds.bottom());
    }
    (w.min(u32::from(u16::MAX)) as u16, h.min(u32::from(u16::MAX)) as u16)
}

fn disposal_from_gif(d: gif::DisposalMethod) -> Disposal {
    match d {
        gif::DisposalMethod::Any => Disposal::Any,
        gif::DisposalMethod::Keep => Disposal::Keep,
        gif::DisposalMethod::Background => Disposal::Background,
        gif::DisposalMethod::Previous => Disposal::Previous,
    }
}

fn disposal_to_gif(d: Disposal) -> gif::DisposalMethod {
    match d {
        Disposal::Any => gif::DisposalMethod::Any,
        Disposal::Keep => gif::DisposalMethod::Keep,
        Disposal::Background => gif::DisposalMethod::Background,
        Disposal::Previous => gif::DisposalMethod::Previous,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/gif_codec.rs"]
mod tests;
