use refgen_lib::types::parse;

pub struct TypesArgs {
    pub exprs: Vec<String>,
}

pub fn run(args: TypesArgs) {
    let mut failed = false;
    for described in args.exprs.iter().map(|expr| describe(expr)) {
        match described {
            Ok(json) => println!("{json}"),
            Err(message) => {
                eprintln!("error: {message}");
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}

/// Descriptor of `expr` as a JSON line.
pub fn describe(expr: &str) -> Result<String, String> {
    let ident = parse(expr).map_err(|e| e.to_string())?;
    serde_json::to_string(&ident).map_err(|e| e.to_string())
}
