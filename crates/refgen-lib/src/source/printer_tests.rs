use indoc::indoc;
use refgen_core::Span;

use super::printer::print;
use crate::context::Rewrite;

#[test]
fn strips_comments() {
    let source = indoc! {"
        // +build ignore

        package main // trailing

        /* block
           comment */
        type A int /* inline */ // and more
          // indented
        type B int
    "};
    assert_eq!(
        print(source, &[]),
        indoc! {"

            package main

            type A int
            type B int
        "}
    );
}

#[test]
fn keeps_comment_markers_inside_strings() {
    let source = "var s = \"// not a comment\"\nvar r = `/* nor this */`\n";
    assert_eq!(print(source, &[]), source);
}

#[test]
fn applies_rewrites_over_whole_spans() {
    let source = "type S struct {\n\tA []*pkg.Msg `ref:\"a_id\"`\n\tB int\n}\n";
    let start = source.find("[]").unwrap();
    let end = start + "[]*pkg.Msg".len();
    let rewrites = [Rewrite {
        span: Span::new(start, end),
        text: "*ArrayOfPtrToMsgRef".to_string(),
    }];
    assert_eq!(
        print(source, &rewrites),
        "type S struct {\n\tA *ArrayOfPtrToMsgRef `ref:\"a_id\"`\n\tB int\n}\n"
    );
}

#[test]
fn rewrites_apply_in_source_order() {
    let source = "A x\nB y\n";
    let rewrites = [
        Rewrite {
            span: Span::new(6, 7),
            text: "*YRef".to_string(),
        },
        Rewrite {
            span: Span::new(2, 3),
            text: "*XRef".to_string(),
        },
    ];
    assert_eq!(print(source, &rewrites), "A *XRef\nB *YRef\n");
}
