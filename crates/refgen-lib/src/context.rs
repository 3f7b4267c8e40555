//! Per-package tables built during the collect phase.
//!
//! Collect runs in three passes over the package's units:
//! 1. register every type declaration in the [`TypeTable`]
//! 2. analyse aggregates carrying reference fields, filling the
//!    [`GenerateSet`] and [`MarshalSet`] and recording type rewrites
//! 3. resolve the imports that generated wrappers depend on
//!
//! The tables are read-only once collect returns.

use indexmap::IndexMap;
use indexmap::map::Entry;
use refgen_core::{Import, SourceUnit, Span, TypeBody, TypeDecl, utils::is_predeclared_type};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::codegen::{ZeroCheck, unparsed_check};
use crate::policy::{FieldAnnotations, FieldPolicy};
use crate::types::{Identifier, TypeExpr, naming::wrapper_name, parse};
use crate::{Config, Error, LookupKind, Result};

/// Declared type name → declaration, in order of first sight.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct TypeTable {
    entries: IndexMap<String, TypeEntry>,
}

#[derive(Debug, Serialize)]
pub struct TypeEntry {
    pub unit: String,
    pub decl: TypeDecl,
}

impl TypeTable {
    /// Register `decl`. The first declaration of a name wins.
    pub fn insert(&mut self, unit: &str, decl: &TypeDecl) -> bool {
        match self.entries.entry(decl.name.clone()) {
            Entry::Occupied(existing) => {
                warn!(
                    name = %decl.name,
                    unit,
                    first = %existing.get().unit,
                    "duplicate type declaration ignored"
                );
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(TypeEntry {
                    unit: unit.to_string(),
                    decl: decl.clone(),
                });
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.entries.get(name).map(|e| &e.decl)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A wrapper type to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrapperSpec {
    pub name: String,
    pub base: String,
    /// Type of the `Value` field.
    pub value: TypeExpr,
}

impl WrapperSpec {
    /// Wrapper for the base type of `id`.
    ///
    /// The value shape strips leading pointers, then keeps nullable shapes
    /// as they are and points to everything else.
    pub fn for_identifier(id: &Identifier) -> Self {
        let stripped = id.expr.strip_pointers();
        let value = if stripped.is_nullable() {
            stripped.clone()
        } else {
            TypeExpr::pointer(stripped.clone())
        };
        Self {
            name: wrapper_name(&id.base),
            base: id.base.clone(),
            value,
        }
    }
}

/// Canonical base name → wrapper spec.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct GenerateSet {
    wrappers: IndexMap<String, WrapperSpec>,
}

impl GenerateSet {
    /// Register the wrapper for `id`. Re-registering the same value type is a
    /// no-op; a different type with the same base is a collision.
    pub fn register(&mut self, id: &Identifier) -> Result<&WrapperSpec> {
        let candidate = WrapperSpec::for_identifier(id);
        match self.wrappers.entry(id.base.clone()) {
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                if existing.value != candidate.value {
                    return Err(Error::WrapperCollision {
                        wrapper: existing.name.clone(),
                        first: existing.value.render(),
                        second: candidate.value.render(),
                    });
                }
                Ok(existing)
            }
            Entry::Vacant(entry) => Ok(entry.insert(candidate)),
        }
    }

    pub fn get(&self, base: &str) -> Option<&WrapperSpec> {
        self.wrappers.get(base)
    }

    /// Wrappers sorted by canonical base name.
    pub fn sorted(&self) -> Vec<&WrapperSpec> {
        let mut wrappers: Vec<_> = self.wrappers.values().collect();
        wrappers.sort_by(|a, b| a.base.cmp(&b.base));
        wrappers
    }

    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }
}

/// One resolved field of an aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedField {
    pub name: String,
    pub policy: FieldPolicy,
    /// Parsed only where generation needs the shape: references and
    /// omitempty fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<Identifier>,
    /// Base name of the wrapper replacing the field's type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,
    /// Empty form of an omitempty type the expression grammar does not cover.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero: Option<ZeroCheck>,
    #[serde(skip)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Aggregate {
    pub name: String,
    pub unit: String,
    pub fields: Vec<ResolvedField>,
}

/// Aggregate name → resolved fields.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct MarshalSet {
    aggregates: IndexMap<String, Aggregate>,
}

impl MarshalSet {
    pub fn get(&self, name: &str) -> Option<&Aggregate> {
        self.aggregates.get(name)
    }

    /// Aggregates sorted by name.
    pub fn sorted(&self) -> Vec<&Aggregate> {
        let mut aggregates: Vec<_> = self.aggregates.values().collect();
        aggregates.sort_by(|a, b| a.name.cmp(&b.name));
        aggregates
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }
}

/// Replace `span` of a unit's source with `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    pub span: Span,
    pub text: String,
}

/// Tables for one package run.
#[derive(Debug, Serialize)]
pub struct Context<'a> {
    #[serde(skip)]
    config: &'a Config,
    #[serde(skip)]
    id_type: TypeExpr,
    pub types: TypeTable,
    pub generate: GenerateSet,
    pub marshal: MarshalSet,
    /// Package qualifier → import, for names used by generated code.
    pub dependencies: IndexMap<String, Import>,
    #[serde(skip)]
    rewrites: IndexMap<String, Vec<Rewrite>>,
}

impl<'a> Context<'a> {
    /// Fresh tables. Fails when the configured id type does not parse.
    pub fn new(config: &'a Config) -> Result<Self> {
        Ok(Self {
            config,
            id_type: config.id_expr()?,
            types: TypeTable::default(),
            generate: GenerateSet::default(),
            marshal: MarshalSet::default(),
            dependencies: IndexMap::new(),
            rewrites: IndexMap::new(),
        })
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn id_type(&self) -> &TypeExpr {
        &self.id_type
    }

    /// Rewrites recorded for `unit`, in source order.
    pub fn rewrites(&self, unit: &str) -> &[Rewrite] {
        self.rewrites.get(unit).map_or(&[], Vec::as_slice)
    }

    /// Whether emission would produce a package artifact.
    pub fn has_output(&self) -> bool {
        !self.generate.is_empty() || !self.marshal.is_empty()
    }

    /// Run all collect passes over `units`.
    pub fn collect(&mut self, units: &[SourceUnit]) -> Result<()> {
        for unit in units {
            for decl in &unit.decls {
                self.types.insert(&unit.name, decl);
            }
        }
        debug!(types = self.types.len(), "registered declarations");

        for unit in units {
            for decl in &unit.decls {
                self.analyse(unit, decl)
                    .map_err(|e| e.at(&unit.name, decl.span))?;
            }
        }

        self.resolve_id_type()?;
        debug!(
            wrappers = self.generate.len(),
            aggregates = self.marshal.len(),
            dependencies = self.dependencies.len(),
            "collected package"
        );
        Ok(())
    }

    fn analyse(&mut self, unit: &SourceUnit, decl: &TypeDecl) -> Result<()> {
        let TypeBody::Struct(fields) = &decl.body else {
            return Ok(());
        };
        if decl.alias {
            return Ok(());
        }
        // A shadowed duplicate declaration contributes nothing.
        let registered = self
            .types
            .entries
            .get(&decl.name)
            .is_some_and(|e| e.unit == unit.name && e.decl == *decl);
        if !registered || self.marshal.aggregates.contains_key(&decl.name) {
            return Ok(());
        }

        let annotated: Vec<FieldAnnotations> = fields.iter().map(FieldAnnotations::from_field).collect();
        if !annotated.iter().any(FieldAnnotations::is_reference) {
            return Ok(());
        }

        let mut resolved = Vec::new();
        for (field, annotations) in fields.iter().zip(&annotated) {
            for name in &field.names {
                let located = |e: Error| e.at(&unit.name, field.ty_span);
                let Some(policy) =
                    FieldPolicy::resolve(annotations, &field.names, name).map_err(located)?
                else {
                    trace!(aggregate = %decl.name, field = %name, "skipping unexported field");
                    continue;
                };
                if policy.omit {
                    trace!(aggregate = %decl.name, field = %name, "field omitted");
                    continue;
                }
                let entry = self
                    .resolve_field(unit, name, &field.ty, field.ty_span, policy)
                    .map_err(located)?;
                resolved.push(entry);
            }
        }

        debug!(aggregate = %decl.name, fields = resolved.len(), "analysed aggregate");
        self.marshal.aggregates.insert(
            decl.name.clone(),
            Aggregate {
                name: decl.name.clone(),
                unit: unit.name.clone(),
                fields: resolved,
            },
        );
        Ok(())
    }

    fn resolve_field(
        &mut self,
        unit: &SourceUnit,
        name: &str,
        ty: &str,
        span: Option<Span>,
        policy: FieldPolicy,
    ) -> Result<ResolvedField> {
        if !policy.is_reference {
            let (parsed, zero) = if policy.omit_empty {
                match parse(ty) {
                    Ok(id) => (Some(id), None),
                    Err(err) => {
                        let Some(zero) = unparsed_check(ty) else {
                            return Err(err.into());
                        };
                        trace!(field = %name, ty = %ty, ?zero, "omitempty type outside the grammar");
                        (None, Some(zero))
                    }
                }
            } else {
                (None, None)
            };
            return Ok(ResolvedField {
                name: name.to_string(),
                policy,
                ty: parsed,
                wrapper: None,
                zero,
                span,
            });
        }

        let id = parse(ty)?;
        if !id.is_exported() {
            return Err(Error::Export {
                field: name.to_string(),
                type_name: id.written.clone(),
            });
        }

        let wrapper = self.generate.register(&id)?.clone();
        self.resolve_dependencies(unit, &wrapper.value)?;

        if self.config.is_traced() {
            info!(field = %name, ty = %id.written, wrapper = %wrapper.name, variant = ?policy.variant, "reference field");
        } else {
            debug!(field = %name, wrapper = %wrapper.name, "reference field");
        }

        if let Some(span) = span {
            self.rewrites
                .entry(unit.name.clone())
                .or_default()
                .push(Rewrite {
                    span,
                    text: format!("*{}", wrapper.name),
                });
        }

        Ok(ResolvedField {
            name: name.to_string(),
            policy,
            ty: Some(id),
            wrapper: Some(wrapper.base),
            zero: None,
            span,
        })
    }

    /// Every name in `shape` must be declared, predeclared, or imported.
    fn resolve_dependencies(&mut self, unit: &SourceUnit, shape: &TypeExpr) -> Result<()> {
        let mut names = Vec::new();
        shape.for_each_named(&mut |qualifier, name| names.push((qualifier, name)));

        for (qualifier, name) in names {
            match qualifier {
                Some(qualifier) => {
                    let import = match unit.resolve_qualifier(qualifier) {
                        Some(import) => import.clone(),
                        None => self.forced_import(qualifier)?,
                    };
                    self.add_dependency(qualifier, import);
                }
                None if is_predeclared_type(name) || self.types.contains(name) => {}
                None => {
                    return Err(Error::Lookup {
                        name: name.to_string(),
                        kind: LookupKind::Declaration,
                    });
                }
            }
        }
        Ok(())
    }

    /// The id type's names can only come from forced imports.
    fn resolve_id_type(&mut self) -> Result<()> {
        let id_type = self.id_type.clone();
        let mut names = Vec::new();
        id_type.for_each_named(&mut |qualifier, name| names.push((qualifier, name)));

        for (qualifier, name) in names {
            match qualifier {
                Some(qualifier) => {
                    let import = self.forced_import(qualifier)?;
                    self.add_dependency(qualifier, import);
                }
                None if is_predeclared_type(name) || self.types.contains(name) => {}
                None => {
                    return Err(Error::Lookup {
                        name: name.to_string(),
                        kind: LookupKind::Declaration,
                    });
                }
            }
        }
        Ok(())
    }

    fn forced_import(&self, qualifier: &str) -> Result<Import> {
        self.config
            .extra_imports()
            .iter()
            .map(Import::new)
            .find(|import| import.qualifier() == qualifier)
            .ok_or_else(|| Error::Lookup {
                name: qualifier.to_string(),
                kind: LookupKind::Import,
            })
    }

    fn add_dependency(&mut self, qualifier: &str, import: Import) {
        match self.dependencies.entry(qualifier.to_string()) {
            Entry::Occupied(existing) => {
                if existing.get().path != import.path {
                    warn!(
                        qualifier,
                        kept = %existing.get().path,
                        ignored = %import.path,
                        "conflicting imports for qualifier"
                    );
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(import);
            }
        }
    }
}
