//! Marshal plans: the ordered wire steps of one aggregate.
//!
//! A plan is built once per aggregate after collect. It is rendered to Go by
//! `marshal` and executed directly by `eval`, so both read the same steps.

use serde::Serialize;

use crate::context::{Aggregate, Context};
use crate::policy::Variant;
use crate::types::TypeExpr;
use crate::{Error, LookupKind, Result};

use super::{ZeroCheck, zero_check};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldStep {
    Plain {
        field: String,
        wire: String,
        /// Present for omitempty fields.
        #[serde(skip_serializing_if = "Option::is_none")]
        omit_empty: Option<ZeroCheck>,
    },
    Reference {
        field: String,
        wrapper: String,
        value_wire: String,
        id_wire: String,
        variant: Variant,
        /// Type of the wrapper's `Value`.
        value_type: TypeExpr,
        id_check: ZeroCheck,
    },
}

impl FieldStep {
    pub fn field(&self) -> &str {
        match self {
            FieldStep::Plain { field, .. } | FieldStep::Reference { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarshalPlan {
    pub aggregate: String,
    pub id_type: TypeExpr,
    pub steps: Vec<FieldStep>,
}

impl MarshalPlan {
    pub fn build(ctx: &Context<'_>, aggregate: &Aggregate) -> Result<Self> {
        let id_check = zero_check(&ctx.types, ctx.id_type())?;
        let mut steps = Vec::with_capacity(aggregate.fields.len());

        for field in &aggregate.fields {
            let policy = &field.policy;
            let step = match &field.wrapper {
                Some(base) => {
                    let wrapper = ctx.generate.get(base).ok_or_else(|| Error::Lookup {
                        name: base.clone(),
                        kind: LookupKind::Declaration,
                    })?;
                    FieldStep::Reference {
                        field: field.name.clone(),
                        wrapper: wrapper.name.clone(),
                        value_wire: policy.wire_name_value.clone(),
                        id_wire: policy.wire_name_id.clone(),
                        variant: policy.variant,
                        value_type: wrapper.value.clone(),
                        id_check,
                    }
                }
                None => {
                    let omit_empty = match (&field.ty, policy.omit_empty) {
                        (Some(ty), true) => Some(
                            zero_check(&ctx.types, &ty.expr)
                                .map_err(|e| e.at(&aggregate.unit, field.span))?,
                        ),
                        (None, true) => field.zero,
                        (_, false) => None,
                    };
                    FieldStep::Plain {
                        field: field.name.clone(),
                        wire: policy.wire_name_value.clone(),
                        omit_empty,
                    }
                }
            };
            steps.push(step);
        }

        Ok(Self {
            aggregate: aggregate.name.clone(),
            id_type: ctx.id_type().clone(),
            steps,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
