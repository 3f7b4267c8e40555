//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::generate::GenerateArgs;
use crate::commands::inspect::InspectArgs;
use crate::commands::types::TypesArgs;

pub struct GenerateParams {
    pub dirs: Vec<PathBuf>,
    pub force: bool,
    pub trace: bool,
    pub debug: bool,
    pub id_type: Option<String>,
    pub suffix: Option<String>,
    pub imports: Vec<String>,
    pub color: ColorChoice,
}

impl GenerateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let mut dirs: Vec<PathBuf> = m
            .get_many::<PathBuf>("dirs")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        if dirs.is_empty() {
            dirs.push(PathBuf::from("."));
        }

        Self {
            dirs,
            force: m.get_flag("force"),
            trace: m.get_flag("trace"),
            debug: m.get_flag("debug"),
            id_type: m.get_one::<String>("id_type").cloned(),
            suffix: m.get_one::<String>("suffix").cloned(),
            imports: m
                .get_many::<String>("imports")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            color: parse_color(m),
        }
    }
}

impl From<GenerateParams> for GenerateArgs {
    fn from(p: GenerateParams) -> Self {
        Self {
            dirs: p.dirs,
            force: p.force,
            trace: p.trace,
            debug: p.debug,
            id_type: p.id_type,
            suffix: p.suffix,
            imports: p.imports,
            color: p.color.should_colorize(),
        }
    }
}

pub struct InspectParams {
    pub dir: PathBuf,
    pub id_type: Option<String>,
    pub compact: bool,
    pub color: ColorChoice,
}

impl InspectParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            dir: m
                .get_one::<PathBuf>("dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".")),
            id_type: m.get_one::<String>("id_type").cloned(),
            compact: m.get_flag("compact"),
            color: parse_color(m),
        }
    }
}

impl From<InspectParams> for InspectArgs {
    fn from(p: InspectParams) -> Self {
        Self {
            dir: p.dir,
            id_type: p.id_type,
            compact: p.compact,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TypesParams {
    pub exprs: Vec<String>,
}

impl TypesParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            exprs: m
                .get_many::<String>("exprs")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
        }
    }
}

impl From<TypesParams> for TypesArgs {
    fn from(p: TypesParams) -> Self {
        Self { exprs: p.exprs }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
