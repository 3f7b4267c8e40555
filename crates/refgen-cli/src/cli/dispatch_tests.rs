use std::path::PathBuf;

use super::*;
use crate::cli::commands::{generate_command, inspect_command, types_command};

#[test]
fn generate_defaults_to_current_directory() {
    let m = generate_command()
        .try_get_matches_from(["generate"])
        .unwrap();
    let params = GenerateParams::from_matches(&m);

    assert_eq!(params.dirs, vec![PathBuf::from(".")]);
    assert!(!params.force);
    assert!(!params.trace);
    assert!(!params.debug);
    assert_eq!(params.id_type, None);
    assert_eq!(params.suffix, None);
    assert!(params.imports.is_empty());
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn generate_collects_dirs_and_repeated_imports() {
    let m = generate_command()
        .try_get_matches_from([
            "generate",
            "models",
            "api",
            "--import",
            "fmt",
            "-i",
            "github.com/google/uuid",
            "--id-type",
            "uuid.UUID",
            "--suffix",
            "_gen",
            "--force",
            "--trace",
            "--debug",
            "--color",
            "never",
        ])
        .unwrap();
    let params = GenerateParams::from_matches(&m);

    assert_eq!(
        params.dirs,
        vec![PathBuf::from("models"), PathBuf::from("api")]
    );
    assert_eq!(params.imports, vec!["fmt", "github.com/google/uuid"]);
    assert_eq!(params.id_type.as_deref(), Some("uuid.UUID"));
    assert_eq!(params.suffix.as_deref(), Some("_gen"));
    assert!(params.force && params.trace && params.debug);
    assert_eq!(params.color, ColorChoice::Never);
}

#[test]
fn generate_rejects_unknown_color() {
    let result = generate_command().try_get_matches_from(["generate", "--color", "sometimes"]);
    assert!(result.is_err());
}

#[test]
fn generate_args_carry_resolved_color() {
    let m = generate_command()
        .try_get_matches_from(["generate", "--color", "always"])
        .unwrap();
    let args: crate::commands::generate::GenerateArgs = GenerateParams::from_matches(&m).into();
    assert!(args.color);
}

#[test]
fn inspect_requires_dir() {
    assert!(inspect_command().try_get_matches_from(["inspect"]).is_err());

    let m = inspect_command()
        .try_get_matches_from(["inspect", "models", "--compact"])
        .unwrap();
    let params = InspectParams::from_matches(&m);
    assert_eq!(params.dir, PathBuf::from("models"));
    assert!(params.compact);
}

#[test]
fn types_takes_one_or_more_exprs() {
    assert!(types_command().try_get_matches_from(["types"]).is_err());

    let m = types_command()
        .try_get_matches_from(["types", "[]*Item", "map[string]int"])
        .unwrap();
    let params = TypesParams::from_matches(&m);
    assert_eq!(params.exprs, vec!["[]*Item", "map[string]int"]);
}

#[test]
fn generate_help_lists_flags() {
    let mut cmd = generate_command();
    let help = cmd.render_help().to_string();
    for flag in ["--force", "--trace", "--debug", "--id-type", "--suffix", "--import"] {
        assert!(help.contains(flag), "missing {flag} in help");
    }
}

#[test]
fn cli_requires_subcommand() {
    let result = build_cli().try_get_matches_from(["refgen"]);
    assert!(result.is_err());
}
