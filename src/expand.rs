use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::MapError;

// ---------------------------------------------------------------------------
// GlobSpec
// ---------------------------------------------------------------------------

/// An ordered, non-empty set of glob patterns, each interpreted relative to
/// the input root. Patterns may overlap in what they match — expansion
/// deduplicates.
///
/// There is deliberately no way to build a `GlobSpec` from a bare string
/// where a list is expected: [`single`](GlobSpec::single) takes one pattern,
/// [`new`](GlobSpec::new) takes a collection of them, and a `&str` does not
/// satisfy the collection bound. The classic mistake of a pattern string
/// being iterated character by character is a compile-time type error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobSpec(Vec<String>);

impl GlobSpec {
    /// Single-pattern convenience form, equivalent to a one-element set.
    pub fn single(pattern: impl Into<String>) -> Self {
        GlobSpec(vec![pattern.into()])
    }

    /// Build a spec from an ordered list of patterns.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::EmptyPatternSet`] if `patterns` yields nothing.
    pub fn new<I, S>(patterns: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        if patterns.is_empty() {
            return Err(MapError::EmptyPatternSet);
        }
        Ok(GlobSpec(patterns))
    }

    /// The patterns, in the order they will be expanded.
    pub fn patterns(&self) -> &[String] {
        &self.0
    }

    /// Compile-check every pattern without touching the filesystem.
    pub(crate) fn validate(&self) -> Result<(), MapError> {
        for pattern in &self.0 {
            glob::Pattern::new(pattern).map_err(|source| MapError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Render the spec for diagnostics: a lone pattern as-is, several as a
    /// brace expression `{p1,p2,...}`.
    pub(crate) fn brace_expression(&self) -> String {
        match self.0.as_slice() {
            [single] => single.clone(),
            many => format!("{{{}}}", many.join(",")),
        }
    }
}

// ---------------------------------------------------------------------------
// MatchMode
// ---------------------------------------------------------------------------

/// Which kind of matched filesystem entry a mapper yields. Entries of the
/// other kind are skipped silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Regular files only.
    FilesOnly,
    /// Directories only.
    DirectoriesOnly,
}

impl MatchMode {
    fn admits(self, path: &Path) -> bool {
        match self {
            MatchMode::FilesOnly => path.is_file(),
            MatchMode::DirectoriesOnly => path.is_dir(),
        }
    }
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

/// Lazily expand `spec` against `root`.
///
/// Each pattern is matched independently and in order; within a pattern the
/// walk yields in sorted filesystem order, so the merged sequence is
/// deterministic on a given filesystem snapshot. A `seen` set, keyed on the
/// matched path and cleared per traversal, guarantees no path is yielded
/// twice across overlapping patterns. Zero total matches are the caller's
/// condition to detect — expansion itself never aborts.
pub(crate) fn expand<'a>(
    root: &Path,
    spec: &'a GlobSpec,
    mode: MatchMode,
) -> Box<dyn Iterator<Item = Result<PathBuf, MapError>> + 'a> {
    // Metacharacters in the root itself must match literally; only the
    // pattern part is interpreted.
    let Some(root_str) = root.to_str() else {
        let err = MapError::NonUtf8Path(root.to_path_buf());
        return Box::new(std::iter::once(Err(err)));
    };
    let escaped_root = glob::Pattern::escape(root_str);
    debug!(
        "expanding {} pattern(s) under {}",
        spec.patterns().len(),
        root.display()
    );

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let matched = spec
        .patterns()
        .iter()
        .flat_map(move |pattern| expand_one(&escaped_root, pattern))
        .filter_map(move |entry| match entry {
            Ok(path) => {
                if !mode.admits(&path) {
                    return None;
                }
                if !seen.insert(path.clone()) {
                    debug!("already yielded, skipping: {}", path.display());
                    return None;
                }
                Some(Ok(path))
            }
            Err(err) => Some(Err(err)),
        });
    Box::new(matched)
}

/// Expand a single pattern rooted at the (already escaped) root string.
///
/// Entries the walk cannot read are skipped, mirroring a tolerant
/// recursive scan; kind filtering and deduplication happen in the caller.
fn expand_one(
    escaped_root: &str,
    pattern: &str,
) -> Box<dyn Iterator<Item = Result<PathBuf, MapError>>> {
    let full = format!("{}/{}", escaped_root.trim_end_matches('/'), pattern);
    match glob::glob(&full) {
        Ok(paths) => Box::new(paths.filter_map(|entry| match entry {
            Ok(path) => Some(Ok(path)),
            Err(err) => {
                debug!("skipping unreadable match: {err}");
                None
            }
        })),
        // Patterns are compile-checked at build time; a late failure still
        // surfaces rather than silently yielding nothing.
        Err(source) => Box::new(std::iter::once(Err(MapError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }))),
    }
}
