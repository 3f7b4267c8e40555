//! Two-phase package processing.
//!
//! [`Driver::generate`] collects the whole package, builds every plan, and
//! renders every artifact in memory. Only a fully successful generation is
//! handed to a [`Sink`]. A sink stages what it accepts until [`Sink::commit`],
//! so a package whose hand-off fails midway leaves no partial output.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use refgen_core::{Import, SourceUnit};
use tracing::{debug, info, warn};

use crate::codegen::marshal::{render_marshal, render_unmarshal};
use crate::codegen::wrapper::render_wrapper;
use crate::codegen::{GoWriter, MarshalPlan};
use crate::context::Context;
use crate::source::printer;
use crate::{Config, Error, Result};

/// First line of every generated file.
pub const HEADER: &str = "// Code generated by refgen. DO NOT EDIT.";

/// Units sharing one package clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub units: Vec<SourceUnit>,
}

impl Package {
    pub fn new(name: impl Into<String>, units: Vec<SourceUnit>) -> Self {
        Self {
            name: name.into(),
            units,
        }
    }
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub text: String,
}

/// Receives generated text, one package at a time.
///
/// Accepted artifacts become visible on [`commit`](Sink::commit). After a
/// failed accept the driver calls [`discard`](Sink::discard) instead, and the
/// sink drops whatever the package staged. Sinks without staging keep the
/// defaults.
pub trait Sink {
    fn accept(&mut self, artifact: &str, text: &str) -> std::io::Result<()>;

    fn commit(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    fn discard(&mut self) {}
}

/// Keeps committed artifacts in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub artifacts: IndexMap<String, String>,
    staged: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, artifact: &str) -> Option<&str> {
        self.artifacts.get(artifact).map(String::as_str)
    }
}

impl Sink for MemorySink {
    fn accept(&mut self, artifact: &str, text: &str) -> std::io::Result<()> {
        self.staged.push((artifact.to_string(), text.to_string()));
        Ok(())
    }

    fn commit(&mut self) -> std::io::Result<()> {
        self.artifacts.extend(self.staged.drain(..));
        Ok(())
    }

    fn discard(&mut self) {
        self.staged.clear();
    }
}

pub struct Driver<'a> {
    config: &'a Config,
}

impl<'a> Driver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Collect phase only.
    pub fn collect(&self, package: &Package) -> Result<Context<'a>> {
        let mut ctx = Context::new(self.config)?;
        ctx.collect(&package.units)?;
        Ok(ctx)
    }

    /// Generate every artifact of `package` without touching any sink.
    pub fn generate(&self, package: &Package) -> Result<Vec<Artifact>> {
        let ctx = self.collect(package)?;

        let mut plans = Vec::with_capacity(ctx.marshal.len());
        for aggregate in ctx.marshal.sorted() {
            let plan = MarshalPlan::build(&ctx, aggregate)
                .map_err(|e| e.at(&aggregate.unit, None))?;
            plans.push(plan);
        }

        let mut artifacts = Vec::new();
        if ctx.has_output() {
            artifacts.push(Artifact {
                name: self.config.package_artifact_name(),
                text: self.render_package(&package.name, &ctx, &plans),
            });
        } else {
            debug!(package = %package.name, "nothing to generate");
        }

        for unit in &package.units {
            let Some(source) = &unit.source else {
                continue;
            };
            let printed = printer::print(source, ctx.rewrites(&unit.name));
            artifacts.push(Artifact {
                name: self.config.unit_artifact_name(&unit.name),
                text: format!("{HEADER}\n\n{}\n", printed.trim()),
            });
        }

        Ok(artifacts)
    }

    /// Generate `package` and hand its artifacts to `sink`.
    pub fn run(&self, package: &Package, sink: &mut impl Sink) -> Result<usize> {
        let artifacts = self.generate(package)?;
        for artifact in &artifacts {
            if let Err(source) = sink.accept(&artifact.name, &artifact.text) {
                sink.discard();
                return Err(Error::Sink {
                    artifact: artifact.name.clone(),
                    source,
                });
            }
        }
        sink.commit().map_err(|source| Error::Commit {
            package: package.name.clone(),
            source,
        })?;
        info!(package = %package.name, artifacts = artifacts.len(), "generated package");
        Ok(artifacts.len())
    }

    /// Run every package; a failure does not stop the others.
    pub fn run_all(
        &self,
        packages: &[Package],
        sink: &mut impl Sink,
    ) -> Vec<(String, Result<usize>)> {
        packages
            .iter()
            .map(|package| {
                let result = self.run(package, sink);
                if let Err(err) = &result {
                    warn!(package = %package.name, error = %err, "package failed");
                }
                (package.name.clone(), result)
            })
            .collect()
    }

    fn render_package(&self, name: &str, ctx: &Context<'_>, plans: &[MarshalPlan]) -> String {
        let mut w = GoWriter::new();
        w.line(HEADER);
        w.blank();
        w.line(&format!("package {name}"));

        let imports = self.imports(ctx, !plans.is_empty());
        if !imports.is_empty() {
            w.blank();
            w.open("import (");
            for (path, alias) in &imports {
                match alias {
                    Some(alias) => w.line(&format!("{alias} \"{path}\"")),
                    None => w.line(&format!("\"{path}\"")),
                }
            }
            w.close(")");
        }

        for wrapper in ctx.generate.sorted() {
            w.blank();
            render_wrapper(&mut w, wrapper, ctx.id_type());
        }

        for plan in plans {
            w.blank();
            render_marshal(&mut w, plan);
            w.blank();
            render_unmarshal(&mut w, plan);
        }

        w.finish()
    }

    /// `(path, alias)` pairs sorted by path. A path may appear under
    /// several names when a unit aliases a package generated code also uses.
    fn imports(&self, ctx: &Context<'_>, marshals: bool) -> BTreeSet<(String, Option<String>)> {
        let mut imports = BTreeSet::new();
        if marshals {
            imports.insert(("bytes".to_string(), None));
            imports.insert(("encoding/json".to_string(), None));
        }
        for path in self.config.extra_imports() {
            imports.insert((path.clone(), None));
        }
        for (qualifier, import) in &ctx.dependencies {
            // An alias is only written when it differs from what Go infers.
            let inferred = Import::new(import.path.clone());
            let alias = (inferred.qualifier() != qualifier.as_str()).then(|| qualifier.clone());
            imports.insert((import.path.clone(), alias));
        }
        imports
    }
}
