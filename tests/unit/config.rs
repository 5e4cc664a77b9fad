use super::*;

#[test]
fn defaults_match_the_classic_layout() {
    let fit = FitConfig::default();
    assert_eq!(fit.max_font_size, 52.0);
    assert_eq!(fit.min_font_size, 8.0);
    assert_eq!(fit.border, 0.01);
    assert_eq!(fit.line_spacing, 0.3);
    MemeConfig::default().validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memeoid.json");
    std::fs::write(&path, r#"{"meme_dir": "/tmp/out", "fit": {"max_font_size": 30.0}}"#).unwrap();

    let cfg = MemeConfig::load(Some(&path)).unwrap();
    assert_eq!(cfg.meme_dir, PathBuf::from("/tmp/out"));
    assert_eq!(cfg.fit.max_font_size, 30.0);
    assert_eq!(cfg.fit.min_font_size, 8.0);
    assert_eq!(cfg.meme_url, "meme");
}

#[test]
fn invalid_ranges_are_rejected() {
    assert!(
        FitConfig::default()
            .with_font_sizes(4.0, 8.0)
            .validate()
            .is_err()
    );
    let cfg = MemeConfig {
        threads: Some(0),
        ..MemeConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(MemeError::Config(_))));
}

#[test]
fn unreadable_config_is_a_config_error() {
    let err = MemeConfig::load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
    assert!(matches!(err, MemeError::Config(_)));
}

#[test]
fn border_must_leave_room_for_both_boxes() {
    let with_border = |border| FitConfig {
        border,
        ..FitConfig::default()
    };
    with_border(0.0).validate().unwrap();
    with_border(0.3).validate().unwrap();
    for border in [1.0 / 3.0, 0.4, -0.01] {
        assert!(
            matches!(with_border(border).validate(), Err(MemeError::Config(_))),
            "border {border}"
        );
    }
}

#[test]
fn oversized_maximum_font_is_rejected() {
    FitConfig::default()
        .with_font_sizes(MAX_FONT_SIZE, 8.0)
        .validate()
        .unwrap();
    let err = FitConfig::default()
        .with_font_sizes(4.0e7, 8.0)
        .validate()
        .unwrap_err();
    assert!(matches!(err, MemeError::Config(_)));
}
