//! Reference wrapper types.

use crate::context::WrapperSpec;
use crate::types::TypeExpr;

use super::GoWriter;

/// Emit the wrapper type, its constructors, and `HasValue`.
pub fn render_wrapper(w: &mut GoWriter, spec: &WrapperSpec, id_type: &TypeExpr) {
    let name = &spec.name;
    let value = spec.value.render();
    let id = id_type.render();

    w.open(&format!("type {name} struct {{"));
    w.line(&format!("Id    {id}"));
    w.line(&format!("Value {value}"));
    w.close("}");
    w.blank();

    w.open(&format!("func New{name}(v {value}) *{name} {{"));
    w.line(&format!("return &{name}{{Value: v}}"));
    w.close("}");
    w.blank();

    w.open(&format!("func New{name}Id(id {id}) *{name} {{"));
    w.line(&format!("return &{name}{{Id: id}}"));
    w.close("}");
    w.blank();

    w.open(&format!("func (v {name}) HasValue() bool {{"));
    w.line("return v.Value != nil");
    w.close("}");
}
