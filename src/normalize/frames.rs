use std::collections::HashMap;

use crate::animation::{Animation, Frame};
use crate::foundation::core::{Bounds, Rgba8Premul};

/// Expand every frame to the first frame's bounds.
///
/// A partial frame is painted over its normalized predecessor. Its transparent pixels show the
/// predecessor through, and every inherited color is mapped into the partial frame's own palette.
#[tracing::instrument(skip(anim), fields(frames = anim.frames.len()))]
pub fn normalize(anim: &mut Animation) {
    let canvas = anim.canvas_bounds();
    let mut expanded = 0usize;
    for i in 1..anim.frames.len() {
        if anim.frames[i].bounds == canvas {
            continue;
        }
        let (done, rest) = anim.frames.split_at_mut(i);
        let below = &done[i - 1];
        let partial = &mut rest[0];
        let indices = compose(canvas, below, partial);
        partial.bounds = canvas;
        partial.indices = indices;
        expanded += 1;
    }
    if expanded > 0 {
        tracing::debug!(expanded, "expanded partial frames");
    }
}

fn compose(canvas: Bounds, below: &Frame, partial: &Frame) -> Vec<u8> {
    let palette = &partial.palette;
    let mut inherited = HashMap::<u8, u8>::new();
    let mut out = Vec::with_capacity(canvas.area());

    for y in u32::from(canvas.top)..canvas.bottom() {
        for x in u32::from(canvas.left)..canvas.right() {
            if let Some(idx) = own_index(partial, x, y) {
                out.push(idx);
                continue;
            }
            let below_idx = below_index(below, canvas, x, y);
            let mapped = *inherited.entry(below_idx).or_insert_with(|| {
                let color: Rgba8Premul = below.palette.color(below_idx);
                palette.nearest(color.to_straight())
            });
            out.push(mapped);
        }
    }
    out
}

/// Opaque index the partial frame paints at absolute `(x, y)`, if any.
fn own_index(frame: &Frame, x: u32, y: u32) -> Option<u8> {
    if !frame.bounds.contains(x, y) {
        return None;
    }
    let lx = (x - u32::from(frame.bounds.left)) as usize;
    let ly = (y - u32::from(frame.bounds.top)) as usize;
    let idx = *frame
        .indices
        .get(ly * usize::from(frame.bounds.width) + lx)?;
    (frame.palette.transparent() != Some(idx)).then_some(idx)
}

fn below_index(below: &Frame, canvas: Bounds, x: u32, y: u32) -> u8 {
    let lx = (x - u32::from(canvas.left)) as usize;
    let ly = (y - u32::from(canvas.top)) as usize;
    below
        .indices
        .get(ly * usize::from(canvas.width) + lx)
        .copied()
        .or(below.palette.transparent())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/frames.rs"]
mod tests;
