use super::*;

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("earth.gif").unwrap(), "earth.gif");
    assert_eq!(normalize_rel_path("./a//b.gif").unwrap(), "a/b.gif");
    assert_eq!(normalize_rel_path("a\\b.gif").unwrap(), "a/b.gif");
}

#[test]
fn escapes_and_empties_are_invalid_requests() {
    for bad in ["../x.gif", "/abs.gif", "", "  ", "./", "a/../../b.gif"] {
        let err = normalize_rel_path(bad).unwrap_err();
        assert!(
            matches!(err, MemeError::InvalidRequest(_)),
            "{bad:?} should be rejected"
        );
    }
}
