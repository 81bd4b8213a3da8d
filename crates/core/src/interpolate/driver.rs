//! Walk-then-apply orchestration over a template tree.

use std::path::Path;

use super::substitute::TemplateSubstitutor;
use super::walk;
use super::PlaceholderBinding;
use crate::error::InterpolateError;

/// Per-file transform invoked by [`interpolate`].
///
/// Implemented for any
/// `FnMut(&Path, &PlaceholderBinding) -> Result<(), InterpolateError>`.
pub trait FileAction {
    fn apply(&mut self, path: &Path, binding: &PlaceholderBinding) -> Result<(), InterpolateError>;
}

impl<F> FileAction for F
where
    F: FnMut(&Path, &PlaceholderBinding) -> Result<(), InterpolateError>,
{
    fn apply(&mut self, path: &Path, binding: &PlaceholderBinding) -> Result<(), InterpolateError> {
        self(path, binding)
    }
}

/// Summary of a completed interpolation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterpolationReport {
    /// Files the action was invoked on.
    pub files_visited: usize,
}

/// Enumerate `root` and run `action` once per file, sequentially.
///
/// If enumeration fails no action runs. The first action error stops the loop
/// and is returned; files handled before it stay modified.
pub fn interpolate<A: FileAction>(
    root: &Path,
    binding: &PlaceholderBinding,
    mut action: A,
) -> Result<InterpolationReport, InterpolateError> {
    let report = for_each_file(root, |path| action.apply(path, binding))?;

    tracing::info!(
        root = %root.display(),
        key = %binding.key,
        files_visited = report.files_visited,
        "Interpolation pass complete",
    );
    Ok(report)
}

/// Stamp every binding into the templates under `root` in a single walk.
///
/// Each file is read once and all tokens are replaced in one scan of its
/// original text, so a value inserted for one key is never expanded by
/// another. Stops at the first failing file.
pub fn interpolate_all(
    root: &Path,
    bindings: &[PlaceholderBinding],
    substitutor: &TemplateSubstitutor,
) -> Result<InterpolationReport, InterpolateError> {
    let report = for_each_file(root, |path| {
        substitutor.substitute_all(path, bindings).map(|_| ())
    })?;

    tracing::info!(
        root = %root.display(),
        bindings = bindings.len(),
        files_visited = report.files_visited,
        "Interpolation pass complete",
    );
    Ok(report)
}

fn for_each_file<F>(root: &Path, mut f: F) -> Result<InterpolationReport, InterpolateError>
where
    F: FnMut(&Path) -> Result<(), InterpolateError>,
{
    let files = walk::enumerate(root)?;

    let mut report = InterpolationReport::default();
    for path in &files {
        f(path)?;
        report.files_visited += 1;
    }
    Ok(report)
}
