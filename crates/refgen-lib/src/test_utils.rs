//! Test helpers shared across modules.

use indoc::indoc;
use refgen_core::SourceUnit;

use crate::codegen::MarshalPlan;
use crate::source::read_unit;
use crate::{Config, Driver, Package};

/// Read `source` as a unit named `name`, panicking on reader errors.
pub fn unit(name: &str, source: &str) -> SourceUnit {
    read_unit(name, source).unwrap_or_else(|e| panic!("`{name}` should read: {e}"))
}

/// A single-unit package `main` read from `source`.
pub fn package(source: &str) -> Package {
    let unit = unit("a.go", source);
    Package::new(unit.package.clone(), vec![unit])
}

/// Generated package artifact for `source` under `config`.
pub fn package_output(config: &Config, source: &str) -> String {
    let artifacts = Driver::new(config)
        .generate(&package(source))
        .unwrap_or_else(|e| panic!("generation should succeed: {e}"));
    artifacts
        .into_iter()
        .find(|a| a.name == config.package_artifact_name())
        .map(|a| a.text)
        .unwrap_or_default()
}

/// Marshal plan of `aggregate` declared in `source`.
pub fn plan(config: &Config, source: &str, aggregate: &str) -> MarshalPlan {
    let ctx = Driver::new(config)
        .collect(&package(source))
        .unwrap_or_else(|e| panic!("collect should succeed: {e}"));
    let entry = ctx
        .marshal
        .get(aggregate)
        .unwrap_or_else(|| panic!("`{aggregate}` should be an aggregate"));
    MarshalPlan::build(&ctx, entry).unwrap_or_else(|e| panic!("plan should build: {e}"))
}

/// Tabs shown as four spaces so expectations can be written with `indoc!`.
pub fn untab(text: &str) -> String {
    text.replace('\t', "    ")
}

/// Declarations from the basic round-trip fixture.
pub const BASIC: &str = indoc! {r#"
    // +build ignore

    package main

    import (
      "fmt"
      "testing"
      "encoding/json"
    )

    type X struct {
      A int                 `json:"a"`
      B json.RawMessage     `json:"b" ref:"b_id,value"`
    }

    type Y struct {
      A int                 `json:"a"`
      B json.RawMessage     `json:"b" ref:"b_id"`
    }

    type Z struct {
      A int                 `json:"a"`
      B []json.RawMessage   `json:"b" ref:"b_id,value"`
    }

    type W struct {
      A int                 `json:"a"`
      B []*json.RawMessage  `json:"b" ref:"b_id,value"`
    }

    func TestMarshalRoundtrip(t *testing.T) {
      m := json.RawMessage(`{"a":123}`)
      fmt.Println(m)
    }
"#};

/// Declarations from the example package fixture.
pub const EXAMPLE: &str = indoc! {r#"
    // +build ignore

    package main

    import (
      "fmt"
      "encoding/json"
    )

    type Int int

    type Complex struct {
      A string  `json:"a,omitempty"`
      B int     `json:"b"`
    }

    type Hello struct {
      A, B string
      C Int `json:"hello,omitempty" ref:"hello_id,id"`
      D int `json:"d,omitempty"`
    }

    type Example struct {
      A   *Int      `json:"a" ref:"a_id,value"`
      B   *Complex  `json:"b" ref:"b_id,id"`
    }

    type Another struct {
      A   Int     `json:"a" ref:"a_id"`
    }

    func main() {
      v := Int(123)
      c := Hello{}
      fmt.Println(v, c, json.Valid(nil))
    }
"#};
