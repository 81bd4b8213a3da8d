//! In-place placeholder substitution for a single template file.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::{substitute_tokens, PlaceholderBinding};
use crate::error::InterpolateError;

/// Default template glob.
pub const DEFAULT_TEMPLATE_PATTERN: &str = "*.cql";

/// Glob deciding which file base names are eligible for substitution.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    pattern: glob::Pattern,
}

impl ExtensionFilter {
    /// Compile `pattern`, rejecting malformed globs up front.
    pub fn new(pattern: &str) -> Result<Self, InterpolateError> {
        let pattern = glob::Pattern::new(pattern).map_err(|source| {
            InterpolateError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self { pattern })
    }

    /// Test the base name of `path`. Paths without a UTF-8 file name never match.
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.pattern.matches(name))
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self {
            pattern: glob::Pattern::new(DEFAULT_TEMPLATE_PATTERN)
                .expect("DEFAULT_TEMPLATE_PATTERN is a valid glob"),
        }
    }
}

/// What [`TemplateSubstitutor::substitute`] did with a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionOutcome {
    /// The path is a directory; nothing to do.
    SkippedDirectory,
    /// The base name does not match the filter; file left untouched.
    SkippedFilter,
    /// The file is a template but contains none of the tokens; not rewritten.
    Unchanged,
    /// The file is a template and `occurrences` tokens were replaced.
    Rewritten { occurrences: usize },
}

/// Rewrites eligible template files, replacing `${key}` with a value.
#[derive(Debug, Clone, Default)]
pub struct TemplateSubstitutor {
    filter: ExtensionFilter,
}

impl TemplateSubstitutor {
    pub fn new(filter: ExtensionFilter) -> Self {
        Self { filter }
    }

    /// Substitute `binding` into the file at `path`.
    ///
    /// Directories and non-matching files are a successful no-op. Matching
    /// files are read as UTF-8, every token occurrence is replaced, and the
    /// result atomically replaces the original (temp file in the same
    /// directory, then rename). The original permissions are kept.
    pub fn substitute(
        &self,
        path: &Path,
        binding: &PlaceholderBinding,
    ) -> Result<SubstitutionOutcome, InterpolateError> {
        self.substitute_all(path, std::slice::from_ref(binding))
    }

    /// Like [`substitute`](Self::substitute), with every binding applied in a
    /// single scan of the original contents.
    pub fn substitute_all(
        &self,
        path: &Path,
        bindings: &[PlaceholderBinding],
    ) -> Result<SubstitutionOutcome, InterpolateError> {
        let metadata = std::fs::metadata(path).map_err(|source| InterpolateError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        if metadata.is_dir() {
            return Ok(SubstitutionOutcome::SkippedDirectory);
        }

        if !self.filter.matches(path) {
            return Ok(SubstitutionOutcome::SkippedFilter);
        }

        let contents = std::fs::read_to_string(path).map_err(|source| InterpolateError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (rewritten, occurrences) = substitute_tokens(&contents, bindings);
        if occurrences == 0 {
            return Ok(SubstitutionOutcome::Unchanged);
        }

        replace_contents(path, rewritten.as_bytes(), metadata.permissions()).map_err(
            |source| InterpolateError::Write {
                path: path.to_path_buf(),
                source,
            },
        )?;

        tracing::debug!(
            path = %path.display(),
            bindings = bindings.len(),
            occurrences,
            "Rewrote template",
        );

        Ok(SubstitutionOutcome::Rewritten { occurrences })
    }
}

/// Write `bytes` to a sibling temp file and rename it over `path`.
fn replace_contents(
    path: &Path,
    bytes: &[u8],
    permissions: std::fs::Permissions,
) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    std::fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
