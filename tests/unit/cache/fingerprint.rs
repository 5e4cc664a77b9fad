use super::*;

#[test]
fn distinct_key_order_does_not_matter() {
    let a = Fingerprint::from_query("from=homer.gif&top=hello&bottom=world");
    let b = Fingerprint::from_query("bottom=world&from=homer.gif&top=hello");
    assert_eq!(a, b);
}

#[test]
fn repeated_key_order_matters() {
    let a = Fingerprint::from_query("from=x.gif&box-text=one&box-text=two");
    let b = Fingerprint::from_query("from=x.gif&box-text=two&box-text=one");
    assert_ne!(a, b);
}

#[test]
fn any_character_change_changes_the_digest() {
    let a = Fingerprint::from_query("from=homer.gif&top=hello");
    let b = Fingerprint::from_query("from=homer.gif&top=hellO");
    assert_ne!(a, b);
}

#[test]
fn encoding_variants_of_the_same_value_agree() {
    let a = Fingerprint::from_query("from=homer.gif&top=hello+world");
    let b = Fingerprint::from_query("?top=hello%20world&from=homer.gif");
    assert_eq!(a, b);
}

#[test]
fn pairs_and_query_agree() {
    let a = Fingerprint::from_query("top=a&from=b.gif");
    let b = Fingerprint::from_pairs(&[("from", "b.gif"), ("top", "a")]);
    assert_eq!(a, b);
}

#[test]
fn hex_is_64_lowercase_chars() {
    let hex = Fingerprint::of_bytes(b"").to_hex();
    assert_eq!(hex.len(), 64);
    assert_eq!(
        hex,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn canonical_query_sorts_keys() {
    assert_eq!(
        canonical_query(&[("top", "a b"), ("from", "x.gif")]),
        "from=x.gif&top=a+b"
    );
}
