use indoc::indoc;
use refgen_core::{Field, Import, SourceUnit, TypeDecl};

use crate::test_utils::{EXAMPLE, package};
use crate::types::TypeExpr;
use crate::{Config, Context, Error, LookupKind};

fn collect<'a>(config: &'a Config, units: &[SourceUnit]) -> crate::Result<Context<'a>> {
    let mut ctx = Context::new(config)?;
    ctx.collect(units)?;
    Ok(ctx)
}

fn json_unit() -> SourceUnit {
    SourceUnit::new("a.go", "main").import(Import::new("encoding/json"))
}

#[test]
fn example_tables() {
    let config = Config::new();
    let pkg = package(EXAMPLE);
    let ctx = collect(&config, &pkg.units).unwrap();

    let types: Vec<_> = ["Int", "Complex", "Hello", "Example", "Another"]
        .into_iter()
        .filter(|name| ctx.types.contains(name))
        .collect();
    assert_eq!(types.len(), 5);

    let wrappers: Vec<_> = ctx.generate.sorted().iter().map(|w| w.name.as_str()).collect();
    assert_eq!(wrappers, ["ComplexRef", "IntRef"]);
    assert_eq!(
        ctx.generate.get("Int").unwrap().value,
        TypeExpr::pointer(TypeExpr::named("Int"))
    );

    let aggregates: Vec<_> = ctx.marshal.sorted().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(aggregates, ["Another", "Example", "Hello"]);

    let hello = ctx.marshal.get("Hello").unwrap();
    let fields: Vec<_> = hello.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, ["A", "B", "C", "D"]);
    assert_eq!(hello.fields[2].wrapper.as_deref(), Some("Int"));
    assert!(hello.fields[3].ty.is_some(), "omitempty fields keep their type");
    assert!(hello.fields[0].ty.is_none());

    assert!(ctx.dependencies.is_empty());
    assert_eq!(ctx.rewrites("a.go").len(), 4);
    assert!(ctx.has_output());
}

#[test]
fn struct_without_references_is_not_an_aggregate() {
    let config = Config::new();
    let unit = SourceUnit::new("a.go", "main").decl(TypeDecl::structure(
        "Plain",
        vec![Field::new(["A"], "int").tagged(r#"json:"a""#)],
    ));
    let ctx = collect(&config, &[unit]).unwrap();
    assert!(ctx.marshal.is_empty());
    assert!(ctx.generate.is_empty());
    assert!(!ctx.has_output());
}

#[test]
fn wrappers_are_shared_by_base_name() {
    let config = Config::new();
    let unit = json_unit().decl(TypeDecl::structure(
        "S",
        vec![
            Field::new(["A"], "json.RawMessage").tagged(r#"ref:"a_id""#),
            Field::new(["B"], "*json.RawMessage").tagged(r#"ref:"b_id""#),
            Field::new(["C"], "**json.RawMessage").tagged(r#"ref:"c_id""#),
            Field::new(["D"], "[]*json.RawMessage").tagged(r#"ref:"d_id""#),
        ],
    ));
    let ctx = collect(&config, &[unit]).unwrap();

    let wrappers: Vec<_> = ctx
        .generate
        .sorted()
        .iter()
        .map(|w| (w.name.clone(), w.value.to_string()))
        .collect();
    assert_eq!(
        wrappers,
        [
            (
                "ArrayOfPtrToRawMessageRef".to_string(),
                "[]*json.RawMessage".to_string()
            ),
            ("RawMessageRef".to_string(), "*json.RawMessage".to_string()),
        ]
    );
    assert_eq!(ctx.dependencies["json"].path, "encoding/json");
}

#[test]
fn distinct_types_sharing_a_base_collide() {
    let config = Config::new();
    let unit = SourceUnit::new("a.go", "main")
        .import(Import::new("example.com/other"))
        .decl(TypeDecl::structure("Msg", vec![]))
        .decl(TypeDecl::structure(
            "S",
            vec![
                Field::new(["L"], "Msg").tagged(r#"ref:"l_id,value""#),
                Field::new(["R"], "other.Msg").tagged(r#"ref:"r_id,value""#),
            ],
        ));
    let err = collect(&config, &[unit]).unwrap_err();
    assert!(matches!(err.kind(), Error::WrapperCollision { wrapper, .. } if wrapper == "MsgRef"));
    assert_eq!(err.location().unwrap().unit, "a.go");
    insta::assert_snapshot!(err.kind().to_string(), @"wrapper `MsgRef` would hold both `*Msg` and `*other.Msg`");
}

#[test]
fn one_type_written_two_ways_shares_a_wrapper() {
    let config = Config::new();
    let unit = SourceUnit::new("a.go", "main")
        .decl(TypeDecl::structure("Msg", vec![]))
        .decl(TypeDecl::structure(
            "S",
            vec![
                Field::new(["A"], "Msg").tagged(r#"ref:"a_id""#),
                Field::new(["B"], "*Msg").tagged(r#"ref:"b_id""#),
            ],
        ));
    let ctx = collect(&config, &[unit]).unwrap();
    assert_eq!(ctx.generate.len(), 1);
    assert_eq!(ctx.generate.get("Msg").unwrap().value.to_string(), "*Msg");
}

#[test]
fn duplicate_declarations_keep_the_first() {
    let config = Config::new();
    let a = SourceUnit::new("a.go", "main").decl(TypeDecl::other("Int", "int"));
    let b = SourceUnit::new("b.go", "main").decl(TypeDecl::other("Int", "string"));
    let ctx = collect(&config, &[a, b]).unwrap();
    assert_eq!(ctx.types.len(), 1);
    assert_eq!(
        ctx.types.get("Int").unwrap().body,
        refgen_core::TypeBody::Other("int".to_string())
    );
}

#[test]
fn unexported_reference_type_is_rejected() {
    let config = Config::new();
    let unit = SourceUnit::new("a.go", "main")
        .decl(TypeDecl::other("thing", "int"))
        .decl(TypeDecl::structure(
            "S",
            vec![Field::new(["A"], "*thing").tagged(r#"ref:"a_id""#)],
        ));
    let err = collect(&config, &[unit]).unwrap_err();
    assert!(matches!(err.kind(), Error::Export { field, .. } if field == "A"));
    assert_eq!(err.location().unwrap().unit, "a.go");
    insta::assert_snapshot!(err.kind().to_string(), @"reference field `A` must have an exported type, found `*thing`");
}

#[test]
fn undeclared_local_type_is_a_lookup_error() {
    let config = Config::new();
    let unit = SourceUnit::new("a.go", "main").decl(TypeDecl::structure(
        "S",
        vec![Field::new(["A"], "Missing").tagged(r#"ref:"a_id""#)],
    ));
    let err = collect(&config, &[unit]).unwrap_err();
    assert!(matches!(
        err.kind(),
        Error::Lookup { name, kind: LookupKind::Declaration } if name == "Missing"
    ));
}

#[test]
fn unknown_qualifier_is_a_lookup_error() {
    let config = Config::new();
    let unit = SourceUnit::new("a.go", "main").decl(TypeDecl::structure(
        "S",
        vec![Field::new(["A"], "uuid.UUID").tagged(r#"ref:"a_id""#)],
    ));
    let err = collect(&config, &[unit.clone()]).unwrap_err();
    insta::assert_snapshot!(err.kind().to_string(), @"no import found for `uuid`");

    // A forced import satisfies the qualifier.
    let config = Config::new().extra_import("github.com/google/uuid");
    let ctx = collect(&config, &[unit]).unwrap();
    assert_eq!(ctx.dependencies["uuid"].path, "github.com/google/uuid");
}

#[test]
fn aliased_imports_resolve_by_alias() {
    let config = Config::new();
    let unit = SourceUnit::new("a.go", "main")
        .import(Import::aliased("js", "encoding/json"))
        .decl(TypeDecl::structure(
            "S",
            vec![Field::new(["A"], "js.RawMessage").tagged(r#"ref:"a_id""#)],
        ));
    let ctx = collect(&config, &[unit]).unwrap();
    let import = &ctx.dependencies["js"];
    assert_eq!(import.path, "encoding/json");
    assert_eq!(import.alias.as_deref(), Some("js"));
}

#[test]
fn fixed_array_reference_is_a_syntax_error() {
    let config = Config::new();
    let unit = SourceUnit::new("a.go", "main").decl(TypeDecl::structure(
        "S",
        vec![Field::new(["A"], "[4]Thing").tagged(r#"ref:"a_id""#)],
    ));
    let err = collect(&config, &[unit]).unwrap_err();
    assert!(matches!(err.kind(), Error::Syntax(_)));
}

#[test]
fn plain_fields_are_not_parsed_without_omitempty() {
    let config = Config::new();
    let unit = json_unit().decl(TypeDecl::structure(
        "S",
        vec![
            Field::new(["Raw"], "[16]byte").tagged(r#"json:"raw""#),
            Field::new(["A"], "json.RawMessage").tagged(r#"ref:"a_id""#),
        ],
    ));
    let ctx = collect(&config, &[unit]).unwrap();
    assert!(ctx.marshal.get("S").unwrap().fields[0].ty.is_none());
}

#[test]
fn omitted_and_unexported_fields_are_dropped() {
    let config = Config::new();
    let unit = json_unit().decl(TypeDecl::structure(
        "S",
        vec![
            Field::new(["Skip"], "int").tagged(r#"json:"-""#),
            Field::new(["hidden"], "int"),
            Field::new(["A"], "json.RawMessage").tagged(r#"ref:"a_id""#),
            Field::new(["Dropped"], "json.RawMessage").tagged(r#"ref:"-""#),
        ],
    ));
    let ctx = collect(&config, &[unit]).unwrap();
    let fields: Vec<_> = ctx.marshal.get("S").unwrap().fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, ["A"]);
}

#[test]
fn id_type_names_must_resolve() {
    let config = Config::new().id_type("uuid.UUID");
    let err = collect(&config, &[json_unit()]).unwrap_err();
    assert!(matches!(err, Error::Lookup { kind: LookupKind::Import, .. }));

    let config = Config::new().id_type("[2]int");
    assert!(matches!(Context::new(&config), Err(Error::Syntax(_))));
}

#[test]
fn inspect_serialization() {
    let config = Config::new();
    let pkg = package(indoc! {r#"
        package main

        import "encoding/json"

        type S struct {
            A json.RawMessage `json:"a" ref:"a_id,value"`
        }
    "#});
    let ctx = collect(&config, &pkg.units).unwrap();
    let value = serde_json::to_value(&ctx).unwrap();
    assert_eq!(value["generate"]["RawMessage"]["name"], "RawMessageRef");
    assert_eq!(value["marshal"]["S"]["fields"][0]["policy"]["variant"], "value");
    assert_eq!(value["dependencies"]["json"]["path"], "encoding/json");
}
