//! Plan execution over JSON values.
//!
//! Mirrors the generated Go routines step for step: a [`Record`] stands in
//! for a struct value, a [`FieldValue::Reference`] for a wrapper pointer.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::policy::Variant;

use super::{FieldStep, MarshalPlan, ZeroCheck};

/// Field name → value. Absent fields hold their zero value.
pub type Record = IndexMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Plain(Value),
    /// `None` is a nil wrapper pointer.
    Reference(Option<WrapperValue>),
}

impl FieldValue {
    pub fn plain(value: impl Into<Value>) -> Self {
        FieldValue::Plain(value.into())
    }
}

/// Contents of a wrapper. `None` fields hold their zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WrapperValue {
    pub id: Option<Value>,
    pub value: Option<Value>,
}

impl WrapperValue {
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self {
            id: None,
            value: Some(value.into()),
        }
    }

    pub fn with_id(id: impl Into<Value>) -> Self {
        Self {
            id: Some(id.into()),
            value: None,
        }
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

pub struct PlanEvaluator<'p> {
    plan: &'p MarshalPlan,
}

impl<'p> PlanEvaluator<'p> {
    pub fn new(plan: &'p MarshalPlan) -> Self {
        Self { plan }
    }

    /// Marshal `record` the way the generated `MarshalJSON` would.
    pub fn encode(&self, record: &Record) -> String {
        let mut out = String::from("{");
        let mut n = 0;

        for step in &self.plan.steps {
            let member = match step {
                FieldStep::Plain {
                    field,
                    wire,
                    omit_empty,
                } => {
                    let value = match record.get(field) {
                        Some(FieldValue::Plain(value)) => value.clone(),
                        _ => omit_empty.map_or(Value::Null, ZeroCheck::zero_value),
                    };
                    let skip = omit_empty.is_some_and(|check| check.is_zero(&value));
                    (!skip).then_some((wire, value))
                }
                FieldStep::Reference {
                    field,
                    value_wire,
                    id_wire,
                    variant,
                    id_check,
                    ..
                } => match record.get(field) {
                    Some(FieldValue::Reference(Some(wrapper))) => match variant {
                        Variant::Value => wrapper.value.clone().map(|v| (value_wire, v)),
                        Variant::Id => {
                            let id = wrapper.id.clone().unwrap_or_else(|| id_check.zero_value());
                            (!id_check.is_zero(&id)).then_some((id_wire, id))
                        }
                    },
                    _ => None,
                },
            };

            if let Some((wire, value)) = member {
                if n > 0 {
                    out.push(',');
                }
                out.push_str(&super::wire_key(wire));
                out.push_str(&value.to_string());
                n += 1;
            }
        }

        out.push('}');
        out
    }

    /// Unmarshal `data` the way the generated `UnmarshalJSON` would.
    pub fn decode(&self, data: &[u8]) -> Result<Record, serde_json::Error> {
        let object: Option<Map<String, Value>> = serde_json::from_slice(data)?;
        let object = object.unwrap_or_default();
        let mut record = Record::new();

        for step in &self.plan.steps {
            match step {
                FieldStep::Plain { field, wire, .. } => {
                    // Decoding null leaves a Go value untouched.
                    if let Some(value) = object.get(wire).filter(|v| !v.is_null()) {
                        record.insert(field.clone(), FieldValue::Plain(value.clone()));
                    }
                }
                FieldStep::Reference {
                    field,
                    value_wire,
                    id_wire,
                    ..
                } => {
                    let wrapper = if let Some(value) = object.get(value_wire) {
                        WrapperValue {
                            id: None,
                            value: (!value.is_null()).then(|| value.clone()),
                        }
                    } else if let Some(id) = object.get(id_wire) {
                        WrapperValue {
                            id: (!id.is_null()).then(|| id.clone()),
                            value: None,
                        }
                    } else {
                        continue;
                    };
                    record.insert(field.clone(), FieldValue::Reference(Some(wrapper)));
                }
            }
        }

        Ok(record)
    }
}
