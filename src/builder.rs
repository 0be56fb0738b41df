use std::path::{Path, PathBuf};

use log::debug;

use crate::error::MapError;
use crate::expand::{GlobSpec, MatchMode};
use crate::mapper::{InputSource, PathMapper};
use crate::naming::NamingStrategy;

/// Default pattern for file mappers: every entry under the input root.
const DEFAULT_GLOB: &str = "**/*";

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

impl PathMapper {
    /// One pair per regular file under `input_root`.
    ///
    /// Matches everything (`**/*`) unless narrowed with
    /// [`glob`](MapperBuilder::glob) or [`globs`](MapperBuilder::globs);
    /// directories matched by a pattern are skipped silently.
    pub fn file_mapper(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
    ) -> MapperBuilder {
        MapperBuilder::new(input_root, output_root, SourceKind::Glob(MatchMode::FilesOnly))
    }

    /// One pair per immediate child directory of `input_root`.
    ///
    /// A direct one-level directory listing, not a glob.
    pub fn dir_mapper_shallow(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
    ) -> MapperBuilder {
        MapperBuilder::new(input_root, output_root, SourceKind::ShallowDirs)
    }

    /// One pair per leaf directory — a directory containing no
    /// sub-directories — anywhere under `input_root`. Suits per-study or
    /// per-session batch layouts where the input tree has variable depth.
    pub fn dir_mapper_deep(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
    ) -> MapperBuilder {
        MapperBuilder::new(input_root, output_root, SourceKind::LeafDirs)
    }

    /// Generic constructor: explicit patterns with an explicit match mode,
    /// for callers needing multi-pattern selection such as
    /// `["**/*.txt", "**/*.rb"]`.
    pub fn glob_mapper(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        mode: MatchMode,
    ) -> MapperBuilder {
        MapperBuilder::new(input_root, output_root, SourceKind::Glob(mode))
    }
}

// ---------------------------------------------------------------------------
// MapperBuilder
// ---------------------------------------------------------------------------

enum SourceKind {
    Glob(MatchMode),
    ShallowDirs,
    LeafDirs,
}

/// Configures and validates a [`PathMapper`].
///
/// Created via the named constructors on [`PathMapper`]. Configure with
/// chained methods, then call [`build()`](MapperBuilder::build); all
/// validation happens there, before any filesystem access.
///
/// # Example
///
/// ```no_run
/// use pathmap::PathMapper;
///
/// let mapper = PathMapper::file_mapper("incoming", "outgoing")
///     .glob("**/*.nii")
///     .stem_suffix("_segmentation")
///     .build()?;
/// # Ok::<(), pathmap::MapError>(())
/// ```
pub struct MapperBuilder {
    input_root: PathBuf,
    output_root: PathBuf,
    kind: SourceKind,
    globs: Option<Vec<String>>,
    naming: NamingStrategy,
    create_parents: bool,
}

impl MapperBuilder {
    fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>, kind: SourceKind) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            kind,
            globs: None,
            naming: NamingStrategy::Identity,
            create_parents: true,
        }
    }

    // ── Pattern selection ─────────────────────────────────────────────────

    /// Replace the pattern set with a single pattern.
    pub fn glob(mut self, pattern: impl Into<String>) -> Self {
        self.globs = Some(vec![pattern.into()]);
        self
    }

    /// Replace the pattern set with an ordered list of patterns.
    ///
    /// Takes a slice of patterns, never a bare pattern string — passing a
    /// `&str` here is a compile-time type error, which rules out the
    /// classic mistake of a pattern string being iterated character by
    /// character. Mutually exclusive with [`glob`](MapperBuilder::glob):
    /// the last call wins.
    pub fn globs<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.globs = Some(patterns.iter().map(|p| p.as_ref().to_string()).collect());
        self
    }

    /// Replace the pattern set with an already-built [`GlobSpec`], for
    /// callers that assemble or share pattern sets ahead of time.
    pub fn glob_spec(mut self, spec: GlobSpec) -> Self {
        self.globs = Some(spec.patterns().to_vec());
        self
    }

    // ── Naming ────────────────────────────────────────────────────────────

    /// Set the naming strategy directly.
    pub fn naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    /// Replace the input's extension with `suffix` to get the output name.
    /// Include the leading separator if one is wanted, e.g. `".processed"`.
    pub fn suffix(self, suffix: impl Into<String>) -> Self {
        self.naming(NamingStrategy::SuffixAppend(suffix.into()))
    }

    /// Insert `suffix` between the input's stem and its extension, so
    /// `brain.nii` becomes `brain_segmentation.nii` for `"_segmentation"`.
    pub fn stem_suffix(self, suffix: impl Into<String>) -> Self {
        self.naming(NamingStrategy::StemSuffixAppend(suffix.into()))
    }

    /// Name outputs from a template containing exactly one `{}`
    /// placeholder, substituted with the input's stem: `"prefix_{}"`
    /// applied to `rel/fruity.dat` yields `rel/prefix_fruity.dat`, while
    /// `"{}.suffix"` yields `rel/fruity.suffix` — a template ending with
    /// the placeholder keeps the input's extension, anywhere else the
    /// template supplies it. Validated in
    /// [`build()`](MapperBuilder::build). Separators in the template pass
    /// through verbatim into the joined output path.
    pub fn template(self, template: impl Into<String>) -> Self {
        self.naming(NamingStrategy::Template(template.into()))
    }

    /// Full control: `f(input_path, output_root)` produces the output path
    /// directly, bypassing the relative-path convention entirely.
    pub fn name_with<F>(self, f: F) -> Self
    where
        F: Fn(&Path, &Path) -> PathBuf + Send + Sync + 'static,
    {
        self.naming(NamingStrategy::Custom(Box::new(f)))
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Whether iteration creates output parent directories as pairs are
    /// consumed. Enabled by default.
    pub fn parents(mut self, yes: bool) -> Self {
        self.create_parents = yes;
        self
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Validate the configuration and produce the mapper.
    ///
    /// No filesystem access happens here; traversal starts when the mapper
    /// is consumed.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty pattern list
    /// ([`MapError::EmptyPatternSet`]), a malformed pattern
    /// ([`MapError::InvalidPattern`]), a template without exactly one
    /// placeholder ([`MapError::InvalidTemplate`]), or patterns supplied to
    /// a directory-listing mapper ([`MapError::PatternsWithDirMode`]).
    pub fn build(self) -> Result<PathMapper, MapError> {
        self.naming.validate()?;

        let source = match self.kind {
            SourceKind::Glob(mode) => {
                let patterns = self
                    .globs
                    .unwrap_or_else(|| vec![DEFAULT_GLOB.to_string()]);
                let spec = GlobSpec::new(patterns)?;
                spec.validate()?;
                InputSource::Glob { spec, mode }
            }
            SourceKind::ShallowDirs => {
                if self.globs.is_some() {
                    return Err(MapError::PatternsWithDirMode);
                }
                InputSource::ShallowDirs
            }
            SourceKind::LeafDirs => {
                if self.globs.is_some() {
                    return Err(MapError::PatternsWithDirMode);
                }
                InputSource::LeafDirs
            }
        };

        debug!(
            "mapper configured: {} -> {}",
            self.input_root.display(),
            self.output_root.display()
        );

        Ok(PathMapper {
            input_root: self.input_root,
            output_root: self.output_root,
            source,
            naming: self.naming,
            create_parents: self.create_parents,
        })
    }
}
