//! Rendering of generation errors against the unit they point into.

use std::error::Error as _;
use std::path::Path;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};
use refgen_lib::Error;

use crate::commands::package_loader::LoadError;

/// Render `error`, looking up the located unit's text with `source_of`.
///
/// `dir` is the package directory unit names are relative to.
pub fn render_error<'s>(
    error: &Error,
    dir: &Path,
    source_of: impl Fn(&str) -> Option<&'s str>,
    colored: bool,
) -> String {
    let message = message(error.kind());
    let Some(location) = error.location() else {
        return format!("error: {}: {message}\n", dir.display());
    };

    let path = dir.join(&location.unit);
    let path = path.to_string_lossy();
    match (location.span, source_of(&location.unit)) {
        (Some(span), Some(source)) => {
            let range = adjust_range(span.range(), source.len());
            let snippet = Snippet::source(source)
                .line_start(1)
                .path(path.as_ref())
                .annotation(AnnotationKind::Primary.span(range).label(&message));
            let report = [Level::ERROR.primary_title(&message).element(snippet)];
            let renderer = if colored {
                Renderer::styled()
            } else {
                Renderer::plain()
            };
            format!("{}\n", renderer.render(&report))
        }
        _ => format!("error: {path}: {message}\n"),
    }
}

pub fn render_load_error(error: &LoadError, dir: &Path, colored: bool) -> String {
    match error {
        LoadError::Read { path, text, source } => {
            let dir = path.parent().unwrap_or(dir);
            render_error(source, dir, |_| Some(text.as_str()), colored)
        }
        LoadError::Io { .. } => format!("error: {error}\n"),
    }
}

/// Display text of `error`, with the I/O cause of a sink failure appended.
fn message(error: &Error) -> String {
    match error {
        Error::Sink { .. } => match error.source() {
            Some(cause) => format!("{error}: {cause}"),
            None => error.to_string(),
        },
        _ => error.to_string(),
    }
}

fn adjust_range(range: std::ops::Range<usize>, limit: usize) -> std::ops::Range<usize> {
    if range.start == range.end {
        return range.start..(range.start + 1).min(limit);
    }
    range
}
