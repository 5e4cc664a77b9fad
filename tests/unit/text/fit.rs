use super::*;
use crate::assets::font::FontCatalog;

fn dejavu() -> FontRef {
    FontCatalog::system()
        .resolve("DejaVuSans")
        .expect("DejaVuSans must be installed to run text tests")
}

fn garbage_font() -> FontRef {
    FontRef::from_bytes("garbage", vec![0u8; 16], 0)
}

#[test]
fn roomy_box_gets_the_maximum_size() {
    let size = fit("short", 1000, 1000, &dejavu(), 52.0, 8.0, 0.3).unwrap();
    assert_eq!(size, 52.0);
}

#[test]
fn zero_width_is_box_too_small_before_measuring() {
    // A garbage font would fail with FontUnavailable if any measurement was attempted.
    let err = fit("text", 0, 100, &garbage_font(), 52.0, 8.0, 0.3).unwrap_err();
    assert!(matches!(err, MemeError::BoxTooSmall { width: 0, .. }));
    let err = fit("text", 100, -3, &garbage_font(), 52.0, 8.0, 0.3).unwrap_err();
    assert!(matches!(err, MemeError::BoxTooSmall { height: -3, .. }));
}

#[test]
fn long_caption_in_tiny_box_does_not_fit() {
    let err = fit(
        "this caption is far too long to ever fit inside a twenty pixel box",
        20,
        20,
        &dejavu(),
        52.0,
        8.0,
        0.3,
    )
    .unwrap_err();
    assert!(matches!(err, MemeError::TextDoesNotFit { .. }));
}

#[test]
fn unloadable_font_is_font_unavailable() {
    let err = fit("text", 100, 100, &garbage_font(), 52.0, 8.0, 0.3).unwrap_err();
    assert!(matches!(err, MemeError::FontUnavailable { size, .. } if size == 52.0));
}

#[test]
fn fitted_sizes_step_down_from_the_maximum() {
    let font = dejavu();
    let mut engine = TextLayoutEngine::new();
    let size = engine
        .fit("a caption that needs wrapping", 120, 60, &font, 52.0, 8.0, 0.3)
        .unwrap();
    assert!(size < 52.0);
    assert_eq!((52.0 - size) % FIT_STEP, 0.0);

    // The next size up must not fit, otherwise search stopped too early.
    let bigger = engine
        .layout("a caption that needs wrapping", &font, size + FIT_STEP, 120.0, 0.3)
        .unwrap();
    assert!(bigger.width as i32 > 120 || bigger.height as i32 > 60);
}

#[test]
fn fitted_layout_stays_inside_the_box() {
    let mut engine = TextLayoutEngine::new();
    let caption = engine
        .fit_layout("one does not simply walk", 90, 80, &dejavu(), 52.0, 8.0, 0.3)
        .unwrap();
    assert!(caption.width <= 90.0);
    assert!(caption.height <= 80.0);
    assert!(caption.line_count >= 2);
    assert!(!caption.glyphs.is_empty());
    let spacing = CaptionLayout::spacing_for(caption.line_height, 0.3);
    assert!(spacing >= 1.0);
}

#[test]
fn huge_maximum_is_clamped_and_terminates() {
    let font = dejavu();
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(fit("some caption here", 100, 100, &font, 4.0e7, 8.0, 0.3));
    });
    let size = rx
        .recv_timeout(std::time::Duration::from_secs(20))
        .expect("fit did not return")
        .unwrap();
    assert!(size <= MAX_FONT_SIZE);
    assert_eq!((MAX_FONT_SIZE - size) % FIT_STEP, 0.0);
}

#[test]
fn non_positive_minimum_stops_above_zero() {
    let text = "this caption will never fit inside such a small box at all";
    for min in [0.0, -10.0] {
        let err = fit(text, 10, 10, &dejavu(), 4.0, min, 0.3).unwrap_err();
        assert!(matches!(err, MemeError::TextDoesNotFit { .. }), "min {min}: {err}");
    }
}

#[test]
fn inverted_range_does_not_fit() {
    let err = fit("text", 100, 100, &garbage_font(), 8.0, 52.0, 0.3).unwrap_err();
    assert!(matches!(err, MemeError::TextDoesNotFit { .. }));
}
