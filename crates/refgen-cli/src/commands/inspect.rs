use std::path::{Path, PathBuf};

use refgen_lib::codegen::MarshalPlan;
use refgen_lib::{Config, Driver};
use serde_json::{Map, Value};

use super::package_loader::load_packages;
use crate::diagnostics::{render_error, render_load_error};

pub struct InspectArgs {
    pub dir: PathBuf,
    pub id_type: Option<String>,
    pub compact: bool,
    pub color: bool,
}

pub fn run(args: InspectArgs) {
    let mut config = Config::new();
    if let Some(id_type) = &args.id_type {
        config = config.id_type(id_type);
    }

    match inspect(&args.dir, &config, args.color) {
        Ok(tables) => {
            let output = if args.compact {
                serde_json::to_string(&tables)
            } else {
                serde_json::to_string_pretty(&tables)
            };
            match output {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(1);
                }
            }
        }
        Err(rendered) => {
            eprint!("{rendered}");
            std::process::exit(1);
        }
    }
}

/// Collected tables and marshal plans of every package in `dir`, keyed by
/// package name.
///
/// On failure the error comes back rendered.
pub fn inspect(dir: &Path, config: &Config, colored: bool) -> Result<Value, String> {
    let packages = load_packages(dir, config).map_err(|e| render_load_error(&e, dir, colored))?;

    let driver = Driver::new(config);
    let mut tables = Map::new();
    for package in &packages {
        let source_of = |unit: &str| {
            package
                .units
                .iter()
                .find(|u| u.name == unit)?
                .source
                .as_deref()
        };
        let render = |e: refgen_lib::Error| render_error(&e, dir, source_of, colored);

        let ctx = driver.collect(package).map_err(render)?;
        let mut plans = Map::new();
        for aggregate in ctx.marshal.sorted() {
            let plan = MarshalPlan::build(&ctx, aggregate)
                .map_err(|e| render(e.at(&aggregate.unit, None)))?;
            plans.insert(aggregate.name.clone(), json_value(&plan.steps)?);
        }

        let mut value = json_value(&ctx)?;
        if let Value::Object(object) = &mut value {
            object.insert("plans".to_string(), Value::Object(plans));
        }
        tables.insert(package.name.clone(), value);
    }
    Ok(Value::Object(tables))
}

fn json_value(value: &impl serde::Serialize) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| format!("error: {e}\n"))
}
