use super::*;

#[test]
fn top_only_is_default_mode_with_empty_bottom() {
    let req = MemeRequest::from_query("from=homer.gif&top=test").unwrap();
    assert_eq!(req.from, "homer.gif");
    assert_eq!(
        req.layout,
        RequestLayout::Default {
            top: "test".into(),
            bottom: String::new()
        }
    );
    assert_eq!(req.layout.captions(), vec!["test", ""]);
}

#[test]
fn values_are_url_decoded_and_case_preserved() {
    let req = MemeRequest::from_query("?from=Homer.gif&top=One+Does&bottom=NOT%20simply").unwrap();
    assert_eq!(req.from, "Homer.gif");
    assert_eq!(req.layout.captions(), vec!["One Does", "NOT simply"]);
}

#[test]
fn boxes_select_explicit_mode() {
    let req = MemeRequest::from_query(
        "from=a.gif&box=10|10|100|20&box-text=first&box=10|50|100|20&box-text=second&top=ignored",
    )
    .unwrap();
    let RequestLayout::Explicit { boxes, texts } = &req.layout else {
        panic!("expected explicit layout");
    };
    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes[1].y, 50);
    assert_eq!(texts, &vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn missing_from_is_rejected() {
    let err = MemeRequest::from_query("top=x").unwrap_err();
    assert_eq!(err.status_code(), 400);
    let err = MemeRequest::from_query("from=&top=x").unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[test]
fn traversal_in_from_is_rejected() {
    assert!(MemeRequest::from_query("from=../secret.gif&top=x").is_err());
    assert!(MemeRequest::from_query("from=/etc/passwd&top=x").is_err());
}

#[test]
fn no_captions_is_rejected() {
    let err = MemeRequest::from_query("from=a.gif").unwrap_err();
    assert!(err.to_string().contains("no captions"));
}

#[test]
fn malformed_box_is_rejected() {
    let err = MemeRequest::from_query("from=a.gif&box=1|2|3&box-text=x").unwrap_err();
    assert!(matches!(err, MemeError::InvalidRequest(_)));
}

#[test]
fn fingerprint_ignores_parameter_order() {
    let a = MemeRequest::from_query("from=a.gif&top=x&bottom=y").unwrap();
    let b = MemeRequest::from_query("bottom=y&top=x&from=a.gif").unwrap();
    assert_eq!(a.fingerprint, b.fingerprint);
    let c = MemeRequest::from_query("from=a.gif&top=x&bottom=z").unwrap();
    assert_ne!(a.fingerprint, c.fingerprint);
}

#[test]
fn form_encoded_values_are_decoded() {
    let req = MemeRequest::from_query("from=a+b.gif&top=top+%26+more&bottom=").unwrap();
    assert_eq!(req.from, "a b.gif");
    assert_eq!(req.layout.captions(), vec!["top & more", ""]);
}
