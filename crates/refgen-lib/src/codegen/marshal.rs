//! Go rendering of `MarshalJSON` and `UnmarshalJSON`.
//!
//! Marshal writes one flat object in declaration order. A counter of
//! emitted fields decides separators, so fields skipped at runtime never
//! leave a stray comma.

use refgen_core::utils::quote;

use crate::policy::Variant;

use super::{FieldStep, GoWriter, MarshalPlan, go_literal, wire_key};

pub fn render_marshal(w: &mut GoWriter, plan: &MarshalPlan) {
    w.open(&format!(
        "func (v {}) MarshalJSON() ([]byte, error) {{",
        plan.aggregate
    ));
    w.line("var b bytes.Buffer");
    if !plan.is_empty() {
        w.line("var x []byte");
        w.line("var err error");
        w.line("n := 0");
    }
    w.line("b.WriteByte('{')");

    for step in &plan.steps {
        match step {
            FieldStep::Plain {
                field,
                wire,
                omit_empty,
            } => {
                let target = format!("v.{field}");
                let guard = omit_empty.and_then(|check| check.nonzero(&target));
                emit_guarded(w, guard, wire, &target);
            }
            FieldStep::Reference {
                field,
                value_wire,
                id_wire,
                variant,
                id_check,
                ..
            } => {
                let wrapper = format!("v.{field}");
                match variant {
                    Variant::Value => {
                        let guard = format!("{wrapper} != nil && {wrapper}.HasValue()");
                        emit_guarded(w, Some(guard), value_wire, &format!("{wrapper}.Value"));
                    }
                    Variant::Id => {
                        let id = format!("{wrapper}.Id");
                        let guard = match id_check.nonzero(&id) {
                            Some(nonzero) => format!("{wrapper} != nil && {nonzero}"),
                            None => format!("{wrapper} != nil"),
                        };
                        emit_guarded(w, Some(guard), id_wire, &id);
                    }
                }
            }
        }
    }

    w.line("b.WriteByte('}')");
    w.line("return b.Bytes(), nil");
    w.close("}");
}

fn emit_guarded(w: &mut GoWriter, guard: Option<String>, wire: &str, value: &str) {
    match guard {
        Some(guard) => {
            w.open(&format!("if {guard} {{"));
            emit_member(w, wire, value);
            w.close("}");
        }
        None => emit_member(w, wire, value),
    }
}

fn emit_member(w: &mut GoWriter, wire: &str, value: &str) {
    w.open("if n > 0 {");
    w.line("b.WriteByte(',')");
    w.close("}");
    w.line(&format!("b.WriteString({})", go_literal(&wire_key(wire))));
    w.line(&format!("x, err = json.Marshal({value})"));
    w.open("if err != nil {");
    w.line("return nil, err");
    w.close("}");
    w.line("b.Write(x)");
    w.line("n++");
}

pub fn render_unmarshal(w: &mut GoWriter, plan: &MarshalPlan) {
    w.open(&format!(
        "func (v *{}) UnmarshalJSON(data []byte) error {{",
        plan.aggregate
    ));
    w.line("var m map[string]json.RawMessage");
    decode_into(w, "data", "&m");

    let id_type = plan.id_type.render();
    for step in &plan.steps {
        match step {
            FieldStep::Plain { field, wire, .. } => {
                w.open(&format!("if x, ok := m[{}]; ok && len(x) > 0 {{", quote(wire)));
                decode_into(w, "x", &format!("&v.{field}"));
                w.close("}");
            }
            FieldStep::Reference {
                field,
                wrapper,
                value_wire,
                id_wire,
                value_type,
                ..
            } => {
                w.open(&format!(
                    "if x, ok := m[{}]; ok && len(x) > 0 {{",
                    quote(value_wire)
                ));
                w.line(&format!("var y {}", value_type.render()));
                decode_into(w, "x", "&y");
                w.line(&format!("v.{field} = New{wrapper}(y)"));
                w.reopen(&format!(
                    "}} else if x, ok := m[{}]; ok && len(x) > 0 {{",
                    quote(id_wire)
                ));
                w.line(&format!("var y {id_type}"));
                decode_into(w, "x", "&y");
                w.line(&format!("v.{field} = New{wrapper}Id(y)"));
                w.close("}");
            }
        }
    }

    w.line("return nil");
    w.close("}");
}

fn decode_into(w: &mut GoWriter, data: &str, target: &str) {
    w.open(&format!("if err := json.Unmarshal({data}, {target}); err != nil {{"));
    w.line("return err");
    w.close("}");
}
