//! Shared argument builders for CLI commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Package directories (positional, repeatable).
pub fn dirs_arg() -> Arg {
    Arg::new("dirs")
        .value_name("DIR")
        .num_args(0..)
        .value_parser(value_parser!(PathBuf))
        .help("Package directories [default: .]")
}

/// Single package directory (positional).
pub fn dir_arg() -> Arg {
    Arg::new("dir")
        .value_name("DIR")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Package directory")
}

/// Type expressions (positional, at least one).
pub fn exprs_arg() -> Arg {
    Arg::new("exprs")
        .value_name("EXPR")
        .required(true)
        .num_args(1..)
        .help("Go type expressions")
}

/// Regenerate up-to-date packages (--force).
pub fn force_arg() -> Arg {
    Arg::new("force")
        .short('f')
        .long("force")
        .action(ArgAction::SetTrue)
        .help("Regenerate even when outputs are newer than sources")
}

/// Debug logging for refgen (--trace).
pub fn trace_arg() -> Arg {
    Arg::new("trace")
        .long("trace")
        .action(ArgAction::SetTrue)
        .help("Log every resolution step")
}

/// Print instead of writing (--debug).
pub fn debug_arg() -> Arg {
    Arg::new("debug")
        .long("debug")
        .action(ArgAction::SetTrue)
        .help("Print generated files to stdout instead of writing them")
}

/// Identifier type of wrappers (--id-type).
pub fn id_type_arg() -> Arg {
    Arg::new("id_type")
        .long("id-type")
        .value_name("TYPE")
        .help("Go type of wrapper identifiers [default: string]")
}

/// Output file suffix (--suffix).
pub fn suffix_arg() -> Arg {
    Arg::new("suffix")
        .long("suffix")
        .value_name("SUFFIX")
        .help("Suffix of generated file stems [default: _ref]")
}

/// Extra import of the package file (--import, repeatable).
pub fn import_arg() -> Arg {
    Arg::new("imports")
        .short('i')
        .long("import")
        .value_name("PATH")
        .action(ArgAction::Append)
        .help("Additional import path for the generated package file")
}

/// Single-line JSON output (--compact).
pub fn compact_arg() -> Arg {
    Arg::new("compact")
        .long("compact")
        .action(ArgAction::SetTrue)
        .help("Output compact JSON")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}
