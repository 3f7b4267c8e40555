use std::io::{self, Write};
use std::path::{Path, PathBuf};

use refgen_lib::{Config, Driver, Package, Sink};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::package_loader::{is_stale, load_packages};
use crate::diagnostics::{render_error, render_load_error};

pub struct GenerateArgs {
    pub dirs: Vec<PathBuf>,
    pub force: bool,
    pub trace: bool,
    pub debug: bool,
    pub id_type: Option<String>,
    pub suffix: Option<String>,
    pub imports: Vec<String>,
    pub color: bool,
}

impl GenerateArgs {
    pub fn config(&self) -> Config {
        let mut config = Config::new().force(self.force).trace(self.trace);
        if let Some(id_type) = &self.id_type {
            config = config.id_type(id_type);
        }
        if let Some(suffix) = &self.suffix {
            config = config.output_suffix(suffix);
        }
        self.imports
            .iter()
            .fold(config, |config, path| config.extra_import(path))
    }
}

/// Package counts of one invocation.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub generated: usize,
    pub up_to_date: usize,
    pub failed: usize,
}

/// Where artifacts go.
pub enum Output {
    /// Next to the sources in `dir`. Artifacts are staged in temporary files
    /// there and renamed into place when the package commits.
    Dir {
        dir: PathBuf,
        staged: Vec<(String, NamedTempFile)>,
    },
    /// Written as accepted; nothing to take back.
    Stdout,
}

impl Output {
    pub fn dir(dir: impl Into<PathBuf>) -> Self {
        Output::Dir {
            dir: dir.into(),
            staged: Vec::new(),
        }
    }
}

impl Sink for Output {
    fn accept(&mut self, artifact: &str, text: &str) -> io::Result<()> {
        match self {
            Output::Dir { dir, staged } => {
                let mut file = NamedTempFile::new_in(&*dir)?;
                file.write_all(text.as_bytes())?;
                staged.push((artifact.to_string(), file));
                Ok(())
            }
            Output::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "// {artifact}")?;
                stdout.write_all(text.as_bytes())
            }
        }
    }

    fn commit(&mut self) -> io::Result<()> {
        let Output::Dir { dir, staged } = self else {
            return Ok(());
        };
        for (artifact, file) in staged.drain(..) {
            file.persist(dir.join(&artifact)).map_err(|e| e.error)?;
        }
        Ok(())
    }

    fn discard(&mut self) {
        if let Output::Dir { staged, .. } = self {
            // Dropping a staged file removes it.
            staged.clear();
        }
    }
}

pub fn run(args: GenerateArgs) {
    let config = args.config();
    let summary = generate(&args.dirs, &config, args.debug, args.color, &mut io::stderr());

    info!(
        generated = summary.generated,
        up_to_date = summary.up_to_date,
        failed = summary.failed,
        "done"
    );
    if summary.failed > 0 {
        std::process::exit(1);
    }
}

/// Generate every package of every directory in `dirs`, reporting
/// failures to `errors` and carrying on.
pub fn generate(
    dirs: &[PathBuf],
    config: &Config,
    debug: bool,
    colored: bool,
    errors: &mut impl Write,
) -> Summary {
    let mut summary = Summary::default();
    for dir in dirs {
        if !dir.is_dir() {
            warn!(path = %dir.display(), "not a package directory; skipping");
            continue;
        }
        let output = if debug {
            Output::Stdout
        } else {
            Output::dir(dir)
        };
        generate_dir(dir, config, output, colored, errors, &mut summary);
    }
    summary
}

fn generate_dir(
    dir: &Path,
    config: &Config,
    mut output: Output,
    colored: bool,
    errors: &mut impl Write,
    summary: &mut Summary,
) {
    let packages = match load_packages(dir, config) {
        Ok(packages) => packages,
        Err(err) => {
            report(errors, &render_load_error(&err, dir, colored));
            summary.failed += 1;
            return;
        }
    };

    let mut pending: Vec<Package> = Vec::with_capacity(packages.len());
    for package in packages {
        if config.is_forced() {
            pending.push(package);
            continue;
        }
        match is_stale(dir, &package, config) {
            Ok(true) => pending.push(package),
            Ok(false) => {
                info!(dir = %dir.display(), package = %package.name, "up to date");
                summary.up_to_date += 1;
            }
            Err(err) => {
                report(errors, &format!("error: {}: {err}\n", dir.display()));
                summary.failed += 1;
            }
        }
    }

    let driver = Driver::new(config);
    for (name, result) in driver.run_all(&pending, &mut output) {
        let Err(err) = result else {
            summary.generated += 1;
            continue;
        };
        let package = pending.iter().find(|p| p.name == name);
        let source_of = |unit: &str| {
            package?
                .units
                .iter()
                .find(|u| u.name == unit)?
                .source
                .as_deref()
        };
        report(errors, &render_error(&err, dir, source_of, colored));
        summary.failed += 1;
    }
}

fn report(errors: &mut impl Write, text: &str) {
    if let Err(err) = errors.write_all(text.as_bytes()) {
        warn!(error = %err, "failed to report error");
    }
}
