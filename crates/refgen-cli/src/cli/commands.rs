//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("refgen")
        .about("Reference wrappers and JSON marshaling for Go types")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(generate_command())
        .subcommand(inspect_command())
        .subcommand(types_command())
}

/// Generate wrappers, marshal routines and rewritten sources.
pub fn generate_command() -> Command {
    Command::new("generate")
        .about("Generate reference wrappers and marshal routines")
        .override_usage(
            "\
  refgen generate [DIR]...
  refgen generate <DIR> --debug",
        )
        .after_help(
            r#"EXAMPLES:
  refgen generate                       # current directory
  refgen generate ./models ./api        # several packages
  refgen generate ./models --force      # ignore timestamps
  refgen generate . --id-type int64     # numeric identifiers
  refgen generate . --debug             # print instead of writing"#,
        )
        .arg(dirs_arg())
        .arg(force_arg())
        .arg(trace_arg())
        .arg(debug_arg())
        .arg(id_type_arg())
        .arg(suffix_arg())
        .arg(import_arg())
        .arg(color_arg())
}

/// Dump collected tables as JSON.
pub fn inspect_command() -> Command {
    Command::new("inspect")
        .about("Show the tables collected for each package")
        .after_help(
            r#"EXAMPLES:
  refgen inspect ./models               # pretty JSON
  refgen inspect ./models --compact     # single line"#,
        )
        .arg(dir_arg())
        .arg(id_type_arg())
        .arg(compact_arg())
        .arg(color_arg())
}

/// Describe type expressions.
pub fn types_command() -> Command {
    Command::new("types")
        .about("Show the canonical descriptor of type expressions")
        .after_help(
            r#"EXAMPLES:
  refgen types '[]*Item'                # {"written":"[]*Item","base":"ArrayOfPtrToItem",...}
  refgen types 'map[string]pkg.Value'"#,
        )
        .arg(exprs_arg())
}
