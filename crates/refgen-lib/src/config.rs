//! Run configuration.

use crate::types::{SyntaxError, TypeExpr, parser::parse_expr};

/// Immutable settings threaded through one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Go type of wrapper identifiers
    pub(crate) id_type: String,
    /// Inserted before `.go` in generated file names
    pub(crate) output_suffix: String,
    /// Regenerate even when outputs look current
    pub(crate) force: bool,
    /// Log per-field resolution at info level
    pub(crate) trace: bool,
    /// Import paths always added to the package artifact
    pub(crate) extra_imports: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_type: "string".to_string(),
            output_suffix: "_ref".to_string(),
            force: false,
            trace: false,
            extra_imports: Vec::new(),
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier type used by wrapper `Id` fields.
    pub fn id_type(mut self, value: impl Into<String>) -> Self {
        self.id_type = value.into();
        self
    }

    /// Set the generated file name suffix.
    pub fn output_suffix(mut self, value: impl Into<String>) -> Self {
        self.output_suffix = value.into();
        self
    }

    /// Set whether staleness checks are bypassed.
    pub fn force(mut self, value: bool) -> Self {
        self.force = value;
        self
    }

    /// Set whether per-field resolution is traced.
    pub fn trace(mut self, value: bool) -> Self {
        self.trace = value;
        self
    }

    /// Add an import path that generated packages always include.
    pub fn extra_import(mut self, path: impl Into<String>) -> Self {
        self.extra_imports.push(path.into());
        self
    }

    pub fn id_type_name(&self) -> &str {
        &self.id_type
    }

    pub fn suffix(&self) -> &str {
        &self.output_suffix
    }

    pub fn is_forced(&self) -> bool {
        self.force
    }

    pub fn is_traced(&self) -> bool {
        self.trace
    }

    pub fn extra_imports(&self) -> &[String] {
        &self.extra_imports
    }

    pub(crate) fn id_expr(&self) -> Result<TypeExpr, SyntaxError> {
        parse_expr(&self.id_type)
    }

    /// Whether `file_name` is one of our own outputs.
    pub fn is_generated_file(&self, file_name: &str) -> bool {
        file_name
            .strip_suffix(".go")
            .is_some_and(|stem| stem.ends_with(self.output_suffix.as_str()))
    }

    /// Output file name for a source unit (`a.go` → `a_ref.go`).
    pub fn unit_artifact_name(&self, unit: &str) -> String {
        let stem = unit.strip_suffix(".go").unwrap_or(unit);
        format!("{stem}{}.go", self.output_suffix)
    }

    /// Output file name for a package's generated declarations.
    pub fn package_artifact_name(&self) -> String {
        format!("pkg{}.go", self.output_suffix)
    }
}
