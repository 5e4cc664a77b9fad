use super::*;

#[test]
fn transparent_source_is_noop() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [0, 0, 0, 0]), dst);
}

#[test]
fn opaque_source_replaces_destination() {
    assert_eq!(over([10, 20, 30, 255], [255, 255, 255, 255]), [255, 255, 255, 255]);
}

#[test]
fn half_covered_white_over_black_is_grey() {
    let out = over([0, 0, 0, 255], [128, 128, 128, 128]);
    assert_eq!(out[3], 255);
    assert!((126..=130).contains(&out[0]));
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    assert!(over_in_place(&mut dst[..6], &[0u8; 6]).is_err());
}

#[test]
fn over_in_place_blends_every_pixel() {
    let mut dst = vec![0, 0, 0, 255, 0, 0, 0, 255];
    over_in_place(&mut dst, &[255, 255, 255, 255, 0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![255, 255, 255, 255, 0, 0, 0, 255]);
}
