//! Struct tag policy resolution.
//!
//! Two tag keys drive generation. The wire tag (`json:"name,omitempty"`)
//! names the value side on the wire; the reference tag
//! (`ref:"name_id,id|value"`) marks a reference field, names its id side,
//! and fixes which side is marshaled.

use refgen_core::{Field, utils::is_exported};
use serde::Serialize;

use crate::{Error, REF_TAG, Result, WIRE_TAG};

/// Raw tag values for one field line. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAnnotations {
    pub wire: Option<String>,
    pub reference: Option<String>,
}

impl FieldAnnotations {
    pub fn new(wire: Option<&str>, reference: Option<&str>) -> Self {
        let keep = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            wire: keep(wire),
            reference: keep(reference),
        }
    }

    pub fn from_field(field: &Field) -> Self {
        let tag = field.struct_tag();
        Self::new(tag.get(WIRE_TAG).as_deref(), tag.get(REF_TAG).as_deref())
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }
}

/// Which side of a reference goes on the wire when marshaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Id,
    Value,
}

impl Variant {
    fn from_option(option: &str) -> Option<Self> {
        match option {
            "" | "id" => Some(Variant::Id),
            "value" => Some(Variant::Value),
            _ => None,
        }
    }
}

/// Resolved marshaling behavior of one field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPolicy {
    pub field: String,
    pub wire_name_value: String,
    /// Empty for plain fields.
    pub wire_name_id: String,
    pub variant: Variant,
    pub is_reference: bool,
    pub omit: bool,
    pub omit_empty: bool,
}

impl FieldPolicy {
    fn omitted(field: &str) -> Self {
        Self {
            field: field.to_string(),
            wire_name_value: String::new(),
            wire_name_id: String::new(),
            variant: Variant::Id,
            is_reference: false,
            omit: true,
            omit_empty: false,
        }
    }

    /// Resolve the policy of `field`, one of the `names` declared on a field
    /// line carrying `annotations`.
    ///
    /// Returns `Ok(None)` for fields that are skipped silently.
    pub fn resolve(
        annotations: &FieldAnnotations,
        names: &[String],
        field: &str,
    ) -> Result<Option<Self>> {
        let wire = annotations.wire.as_deref().unwrap_or("");
        let reference = annotations.reference.as_deref().unwrap_or("");

        if is_omitted(wire) || is_omitted(reference) {
            return Ok(Some(Self::omitted(field)));
        }

        if (!wire.is_empty() || !reference.is_empty()) && names.len() > 1 {
            return Err(Error::AmbiguousTag {
                names: names.to_vec(),
            });
        }

        if !is_exported(field) {
            return Ok(None);
        }

        let (wire_name, wire_flags) = split_tag(wire);
        // Flags other than omitempty (`string`, for one) have no effect here.
        let omit_empty = wire_flags.split(',').any(|flag| flag == "omitempty");
        let wire_name_value = if wire_name.is_empty() {
            field.to_string()
        } else {
            wire_name.to_string()
        };

        let mut policy = Self {
            field: field.to_string(),
            wire_name_value,
            wire_name_id: String::new(),
            variant: Variant::Id,
            is_reference: false,
            omit: false,
            omit_empty,
        };

        if reference.is_empty() {
            return Ok(Some(policy));
        }

        let (id_name, option) = split_tag(reference);
        if id_name.is_empty() {
            return Err(Error::Policy {
                field: field.to_string(),
                message: "reference tag names no identifier field".to_string(),
            });
        }
        let Some(variant) = Variant::from_option(option) else {
            return Err(Error::Policy {
                field: field.to_string(),
                message: format!("invalid marshaling option `{option}`"),
            });
        };

        policy.is_reference = true;
        policy.wire_name_id = id_name.to_string();
        policy.variant = variant;
        Ok(Some(policy))
    }

    /// Wire name of the side this field marshals.
    pub fn marshaled_name(&self) -> &str {
        match (self.is_reference, self.variant) {
            (true, Variant::Id) => &self.wire_name_id,
            _ => &self.wire_name_value,
        }
    }
}

/// `name,rest` split at the first comma.
fn split_tag(tag: &str) -> (&str, &str) {
    tag.split_once(',').unwrap_or((tag, ""))
}

fn is_omitted(tag: &str) -> bool {
    if tag.is_empty() {
        return false;
    }
    let (name, rest) = split_tag(tag);
    name == "-" || rest.split(',').any(|flag| flag == "-")
}
