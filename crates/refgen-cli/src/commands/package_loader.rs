//! Reads a directory's Go files and groups them by package clause.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use refgen_lib::source::read_unit;
use refgen_lib::{Config, Package};
use tracing::{debug, trace};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{source}")]
    Read {
        path: PathBuf,
        text: String,
        #[source]
        source: refgen_lib::Error,
    },
}

/// Source files of `dir` that refgen should read, sorted by name.
///
/// Our own outputs and Go test files are left out.
pub fn source_files(dir: &Path, config: &Config) -> Result<Vec<PathBuf>, LoadError> {
    let io_error = |source: io::Error| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".go") || name.ends_with("_test.go") || config.is_generated_file(name) {
            continue;
        }
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Every package in `dir`, sorted by name. Units keep their file name.
pub fn load_packages(dir: &Path, config: &Config) -> Result<Vec<Package>, LoadError> {
    let mut grouped: BTreeMap<String, Vec<_>> = BTreeMap::new();

    for path in source_files(dir, config)? {
        let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let name = unit_name(&path);
        let unit = match read_unit(&name, &text) {
            Ok(unit) => unit,
            Err(source) => return Err(LoadError::Read { path, text, source }),
        };
        trace!(file = %path.display(), package = %unit.package, "loaded unit");
        grouped.entry(unit.package.clone()).or_default().push(unit);
    }

    debug!(dir = %dir.display(), packages = grouped.len(), "loaded directory");
    Ok(grouped
        .into_iter()
        .map(|(name, units)| Package::new(name, units))
        .collect())
}

/// Whether any output of `package` is missing or older than its source.
pub fn is_stale(dir: &Path, package: &Package, config: &Config) -> io::Result<bool> {
    for unit in &package.units {
        let dst = dir.join(config.unit_artifact_name(&unit.name));
        let src = dir.join(&unit.name);
        if is_out_of_date(&dst, &src)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_out_of_date(dst: &Path, src: &Path) -> io::Result<bool> {
    let dst_time = match modified(dst) {
        Ok(time) => time,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(err) => return Err(err),
    };
    Ok(modified(src)? > dst_time)
}

fn modified(path: &Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

fn unit_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
