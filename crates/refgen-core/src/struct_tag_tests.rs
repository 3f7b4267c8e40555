use crate::StructTag;

#[test]
fn get_single_key() {
    let tag = StructTag::new(r#"json:"a,omitempty""#);
    assert_eq!(tag.get("json").as_deref(), Some("a,omitempty"));
    assert_eq!(tag.get("ref"), None);
}

#[test]
fn get_among_several_keys() {
    let tag = StructTag::new(r#"json:"b"  ref:"b_id,value" yaml:"-""#);
    assert_eq!(tag.get("json").as_deref(), Some("b"));
    assert_eq!(tag.get("ref").as_deref(), Some("b_id,value"));
    assert_eq!(tag.get("yaml").as_deref(), Some("-"));
}

#[test]
fn escaped_quotes_in_value() {
    let tag = StructTag::new(r#"doc:"say \"hi\"" json:"x""#);
    assert_eq!(tag.get("doc").as_deref(), Some(r#"say "hi""#));
    assert_eq!(tag.get("json").as_deref(), Some("x"));
}

#[test]
fn empty_value_is_present() {
    let tag = StructTag::new(r#"json:"""#);
    assert_eq!(tag.get("json").as_deref(), Some(""));
}

#[test]
fn malformed_tag_stops_scan() {
    let tag = StructTag::new(r#"json:a ref:"b""#);
    assert_eq!(tag.get("json"), None);
    assert_eq!(tag.get("ref"), None);

    let unterminated = StructTag::new(r#"json:"a"#);
    assert_eq!(unterminated.get("json"), None);
}

#[test]
fn pairs_in_order() {
    let tag = StructTag::new(r#"a:"1" b:"2""#);
    let pairs: Vec<_> = tag.pairs().collect();
    assert_eq!(pairs, vec![("a", r#""1""#), ("b", r#""2""#)]);
}
