mod cli;
mod commands;
mod diagnostics;
mod logging;

use cli::{GenerateParams, InspectParams, TypesParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("generate", m)) => {
            let params = GenerateParams::from_matches(m);
            logging::init(params.trace);
            commands::generate::run(params.into());
        }
        Some(("inspect", m)) => {
            let params = InspectParams::from_matches(m);
            logging::init(false);
            commands::inspect::run(params.into());
        }
        Some(("types", m)) => {
            let params = TypesParams::from_matches(m);
            logging::init(false);
            commands::types::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
