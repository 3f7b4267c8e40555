use super::types::describe;

#[test]
fn describes_expression() {
    insta::assert_snapshot!(
        describe("[]*pkg.Item").unwrap(),
        @r#"{"written":"[]*pkg.Item","base":"ArrayOfPtrToItem","indirection":1,"dims":1}"#
    );
}

#[test]
fn describes_map_key() {
    insta::assert_snapshot!(
        describe("map[string]int").unwrap(),
        @r#"{"written":"map[string]int","base":"MapOfStringToInt","indirection":0,"dims":0,"map_key":{"written":"string","base":"string","indirection":0,"dims":0}}"#
    );
}

#[test]
fn reports_unsupported_expression() {
    insta::assert_snapshot!(
        describe("[4]int").unwrap_err(),
        @"unsupported type expression `[4]int`: fixed-size arrays are not supported; only dynamic slices are supported"
    );
}
