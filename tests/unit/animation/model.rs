use super::*;

fn rgb_palette() -> Palette {
    Palette::new(vec![[255, 0, 0], [0, 0, 0], [255, 255, 255]], None).unwrap()
}

#[test]
fn nearest_picks_closest_color() {
    let p = rgb_palette();
    assert_eq!(p.nearest([250, 10, 10, 255]), 0);
    assert_eq!(p.nearest([20, 20, 20, 255]), 1);
    assert_eq!(p.nearest([230, 240, 250, 255]), 2);
}

#[test]
fn nearest_skips_transparent_entry() {
    let p = Palette::new(vec![[0, 0, 0], [10, 10, 10]], Some(0)).unwrap();
    assert_eq!(p.nearest([0, 0, 0, 255]), 1);
    assert_eq!(p.nearest([255, 255, 255, 0]), 0);
}

#[test]
fn palette_size_is_bounded() {
    assert!(Palette::new(vec![], None).is_err());
    assert!(Palette::new(vec![[0, 0, 0]; 257], None).is_err());
    let p = Palette::from_rgb_bytes(&[1, 2, 3, 4, 5, 6], None).unwrap();
    assert_eq!(p.len(), 2);
    assert_eq!(p.to_rgb_bytes(), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn frame_rejects_mismatched_buffer() {
    let b = crate::foundation::core::Bounds::new(0, 0, 2, 2).unwrap();
    assert!(Frame::new(b, Arc::new(rgb_palette()), vec![0; 3]).is_err());
}

#[test]
fn frame_rgba_and_quantize_agree() {
    let b = crate::foundation::core::Bounds::new(0, 0, 3, 1).unwrap();
    let mut f = Frame::new(b, Arc::new(rgb_palette()), vec![0, 1, 2]).unwrap();
    let rgba = f.to_rgba_premul();
    assert_eq!(rgba, vec![255, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255, 255]);

    let mut flipped = rgba.clone();
    flipped[0..4].copy_from_slice(&[255, 255, 255, 255]);
    f.quantize_from_rgba_premul(&flipped).unwrap();
    assert_eq!(f.indices, vec![2, 1, 2]);
    assert!(f.quantize_from_rgba_premul(&flipped[..4]).is_err());
}

#[test]
fn pixel_at_uses_screen_coordinates() {
    let b = crate::foundation::core::Bounds::new(5, 5, 2, 1).unwrap();
    let f = Frame::new(b, Arc::new(rgb_palette()), vec![1, 2]).unwrap();
    assert_eq!(f.pixel_at(0, 0), None);
    assert_eq!(
        f.pixel_at(6, 5),
        Some(crate::foundation::core::Rgba8Premul::opaque(255, 255, 255))
    );
}

#[test]
fn animation_requires_frames() {
    assert!(Animation::new(10, 10, vec![]).is_err());
}
