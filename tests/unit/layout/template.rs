use super::*;
use crate::assets::font::FontCatalog;

fn dejavu() -> FontRef {
    FontCatalog::system()
        .resolve("DejaVuSans")
        .expect("DejaVuSans must be installed to run layout tests")
}

#[test]
fn default_boxes_for_a_square_image() {
    let [top, bottom] = default_boxes(100, 100, 0.01);
    assert_eq!((top.width, top.height), (98, 32));
    assert_eq!((top.x, top.y), (50, 17));
    assert_eq!((bottom.x, bottom.y), (50, 82));
}

#[test]
fn default_boxes_without_border_split_thirds() {
    let [top, bottom] = default_boxes(300, 90, 0.0);
    assert_eq!((top.width, top.height), (300, 30));
    assert_eq!(top.y, 15);
    assert_eq!(bottom.y, 75);
}

#[test]
fn bind_rejects_caption_count_mismatch() {
    let tpl =
        LayoutTemplate::for_image_size("x.gif", 100, 100, dejavu(), FitConfig::default()).unwrap();
    let mut engine = TextLayoutEngine::new();

    let err = tpl.bind(&mut engine, &["only one"]).unwrap_err();
    assert!(matches!(
        err,
        MemeError::CaptionCountMismatch {
            expected: 2,
            got: 1
        }
    ));
    let none: [&str; 0] = [];
    assert!(tpl.bind(&mut engine, &none).is_err());
}

#[test]
fn bind_accepts_empty_captions() {
    let tpl =
        LayoutTemplate::for_image_size("x.gif", 100, 100, dejavu(), FitConfig::default()).unwrap();
    let mut engine = TextLayoutEngine::new();
    let boxes = tpl.bind(&mut engine, &["", "  "]).unwrap();
    assert_eq!(boxes.len(), 2);
    assert!(boxes.iter().all(|b| b.is_blank() && b.caption.is_none()));
    assert!(boxes.iter().all(|b| b.stroke_size() == 0));
}

#[test]
fn bind_fits_every_box_and_leaves_template_untouched() {
    let tpl = LayoutTemplate::explicit(
        "x.gif",
        dejavu(),
        &[BoxSpec {
            x: 200,
            y: 200,
            width: 100,
            height: 50,
        }],
        FitConfig::default(),
    )
    .unwrap();
    let mut engine = TextLayoutEngine::new();
    let boxes = tpl.bind(&mut engine, &["test"]).unwrap();

    assert_eq!(boxes[0].text, "test");
    assert!(boxes[0].font_size >= 8.0 && boxes[0].font_size <= 52.0);
    assert!(boxes[0].caption.is_some());
    assert!(tpl.boxes()[0].text.is_empty());
    assert_eq!(tpl.boxes()[0].spec().width, 100);
}

#[test]
fn one_failing_box_fails_the_whole_bind() {
    let tpl = LayoutTemplate::explicit(
        "x.gif",
        dejavu(),
        &[
            BoxSpec {
                x: 50,
                y: 50,
                width: 100,
                height: 100,
            },
            BoxSpec {
                x: 10,
                y: 10,
                width: 0,
                height: 10,
            },
        ],
        FitConfig::default(),
    )
    .unwrap();
    let mut engine = TextLayoutEngine::new();
    let err = tpl.bind(&mut engine, &["fine", "boom"]).unwrap_err();
    assert!(matches!(err, MemeError::BoxTooSmall { .. }));
}

#[test]
fn stroke_scales_with_line_spacing() {
    let tpl =
        LayoutTemplate::for_image_size("x.gif", 400, 400, dejavu(), FitConfig::default()).unwrap();
    let mut engine = TextLayoutEngine::new();
    let boxes = tpl.bind(&mut engine, &["HELLO", ""]).unwrap();
    let caption = boxes[0].caption.as_ref().unwrap();
    let expected = ((caption.line_height * 0.3).ceil() * 0.4) as i32;
    assert_eq!(boxes[0].stroke_size(), expected);
    assert!(expected > 0);
}

#[test]
fn missing_source_is_not_found() {
    let err = LayoutTemplate::simple("/no/such.gif", dejavu(), FitConfig::default()).unwrap_err();
    assert_eq!(err.class(), crate::foundation::error::ErrorClass::NotFound);
}

#[test]
fn box_spec_parses_pipe_separated_integers() {
    let b = BoxSpec::from_query("10|20|300|40").unwrap();
    assert_eq!(
        b,
        BoxSpec {
            x: 10,
            y: 20,
            width: 300,
            height: 40
        }
    );
    assert_eq!(BoxSpec::from_query(" -5 | 0 |1|1").unwrap().x, -5);
}

#[test]
fn box_spec_rejects_malformed_values() {
    for bad in ["", "1|2|3", "1|2|3|4|5", "a|b|c|d", "1.5|2|3|4"] {
        let err = BoxSpec::from_query(bad).unwrap_err();
        assert!(matches!(err, MemeError::InvalidRequest(_)), "{bad}");
    }
}
