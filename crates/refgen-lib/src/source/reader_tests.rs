use indoc::indoc;
use refgen_core::{Import, TypeBody};

use super::read_unit;
use crate::Error;
use crate::test_utils::{BASIC, EXAMPLE, unit};

#[test]
fn package_and_imports() {
    let unit = unit(
        "a.go",
        indoc! {r#"
            // Package doc.
            package models

            import "fmt"
            import js "encoding/json"

            import (
                "strings"
                . "math"
                _ "embed"
                yaml "gopkg.in/yaml.v3" // comment
            )
        "#},
    );
    assert_eq!(unit.package, "models");
    assert_eq!(
        unit.imports,
        [
            Import::new("fmt"),
            Import::aliased("js", "encoding/json"),
            Import::new("strings"),
            Import::aliased(".", "math"),
            Import::aliased("_", "embed"),
            Import::aliased("yaml", "gopkg.in/yaml.v3"),
        ]
    );
    assert!(unit.source.is_some());
}

#[test]
fn basic_fixture() {
    let unit = unit("basic.go", BASIC);
    let names: Vec<_> = unit.decls.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["X", "Y", "Z", "W"]);

    let w = unit.decls[3].fields().unwrap();
    assert_eq!(w.len(), 2);
    assert_eq!(w[1].names, ["B"]);
    assert_eq!(w[1].ty, "[]*json.RawMessage");
    assert_eq!(w[1].tag.as_deref(), Some(r#"json:"b" ref:"b_id,value""#));

    let span = w[1].ty_span.unwrap();
    assert_eq!(&BASIC[span.range()], "[]*json.RawMessage");
}

#[test]
fn example_fixture() {
    let unit = unit("example.go", EXAMPLE);
    let names: Vec<_> = unit.decls.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["Int", "Complex", "Hello", "Example", "Another"]);
    assert_eq!(unit.decls[0].body, TypeBody::Other("int".to_string()));

    let hello = unit.decls[2].fields().unwrap();
    assert_eq!(hello[0].names, ["A", "B"]);
    assert_eq!(hello[0].ty, "string");
    assert_eq!(hello[0].tag, None);
    assert_eq!(hello[1].names, ["C"]);
    assert_eq!(hello[1].ty, "Int");
}

#[test]
fn grouped_and_alias_declarations() {
    let unit = unit(
        "a.go",
        indoc! {r#"
            package main

            type (
                ID string
                Names = []string
                Pair struct { A, B int }
                Lookup map[string][]*Pair
            )
        "#},
    );
    let decls: Vec<_> = unit
        .decls
        .iter()
        .map(|d| (d.name.as_str(), d.alias))
        .collect();
    assert_eq!(
        decls,
        [("ID", false), ("Names", true), ("Pair", false), ("Lookup", false)]
    );
    assert_eq!(unit.decls[1].body, TypeBody::Other("[]string".to_string()));
    assert_eq!(unit.decls[2].fields().unwrap()[0].names, ["A", "B"]);
    assert_eq!(
        unit.decls[3].body,
        TypeBody::Other("map[string][]*Pair".to_string())
    );
}

#[test]
fn embedded_and_complex_fields() {
    let unit = unit(
        "a.go",
        indoc! {r#"
            package main

            type S struct {
                Base
                *Other
                pkg.Mixin `json:"mixin"`
                Handler func(a, b int) (string, error)
                Inner struct {
                    X int `json:"x"`
                }
                Tags map[string]string; Count int
            }
        "#},
    );
    let fields = unit.decls[0].fields().unwrap();
    let shapes: Vec<_> = fields
        .iter()
        .map(|f| (f.names.join(","), f.ty.as_str()))
        .collect();
    assert_eq!(
        shapes,
        [
            (String::new(), "Base"),
            (String::new(), "*Other"),
            (String::new(), "pkg.Mixin"),
            ("Handler".to_string(), "func(a, b int) (string, error)"),
            (
                "Inner".to_string(),
                "struct {\n        X int `json:\"x\"`\n    }"
            ),
            ("Tags".to_string(), "map[string]string"),
            ("Count".to_string(), "int"),
        ]
    );
    assert!(fields[0].is_embedded());
    assert_eq!(fields[2].tag.as_deref(), Some(r#"json:"mixin""#));
}

#[test]
fn interpreted_string_tags_are_unquoted() {
    let unit = unit(
        "a.go",
        "package main\n\ntype S struct {\n\tA int \"json:\\\"a\\\"\"\n}\n",
    );
    let field = &unit.decls[0].fields().unwrap()[0];
    assert_eq!(field.tag.as_deref(), Some(r#"json:"a""#));
}

#[test]
fn skips_functions_and_values() {
    let unit = unit(
        "a.go",
        indoc! {r#"
            package main

            var (
                x = map[string]int{"a": 1}
            )

            const limit = 3

            func (s *S) Method() {
                type local struct{}
                if true {
                    return
                }
            }

            type After int
        "#},
    );
    let names: Vec<_> = unit.decls.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["After"]);
}

#[test]
fn missing_package_clause() {
    let err = read_unit("a.go", "type X int\n").unwrap_err();
    assert!(matches!(err.kind(), Error::Source(_)));
    assert_eq!(err.location().unwrap().unit, "a.go");
    insta::assert_snapshot!(err.to_string(), @"a.go: expected package clause, found `type`");
}

#[test]
fn unterminated_struct() {
    let err = read_unit("a.go", "package main\n\ntype X struct {\n\tA int\n").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"a.go: unterminated struct, found end of file");
    let span = err.location().unwrap().span.unwrap();
    assert!(span.is_empty());
}

#[test]
fn trailing_tokens_after_field() {
    let err = read_unit("a.go", "package main\n\ntype X struct {\n\tA int `json:\"a\"` extra\n}\n")
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"a.go: expected end of struct field, found `extra`");
}

#[test]
fn malformed_import() {
    let err = read_unit("a.go", "package main\n\nimport (\n\tfmt\n)\n").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r#"a.go: expected import path, found `\n`"#);
}
