use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use crate::error::MapError;
use crate::expand::{self, GlobSpec, MatchMode};
use crate::listing;
use crate::naming::NamingStrategy;
use crate::pair::PathPair;

// ---------------------------------------------------------------------------
// InputSource
// ---------------------------------------------------------------------------

/// How a mapper discovers its input items.
#[derive(Debug)]
pub(crate) enum InputSource {
    /// Glob expansion against the input root.
    Glob { spec: GlobSpec, mode: MatchMode },

    /// Immediate child directories of the input root.
    ShallowDirs,

    /// Leaf directories (directories containing no sub-directories) at any
    /// depth under the input root.
    LeafDirs,
}

impl InputSource {
    fn walk<'a>(&'a self, root: &Path) -> Box<dyn Iterator<Item = Result<PathBuf, MapError>> + 'a> {
        match self {
            InputSource::Glob { spec, mode } => expand::expand(root, spec, *mode),
            InputSource::ShallowDirs => listing::shallow_dirs(root),
            InputSource::LeafDirs => listing::leaf_dirs(root),
        }
    }

    /// The pattern expression shown in the empty-input diagnostic.
    fn expression(&self) -> String {
        match self {
            InputSource::Glob { spec, .. } => spec.brace_expression(),
            InputSource::ShallowDirs => "*/".to_string(),
            InputSource::LeafDirs => "**/".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// PathMapper
// ---------------------------------------------------------------------------

/// A stateless descriptor of how to traverse an input tree and name the
/// corresponding outputs.
///
/// Built via [`PathMapper::file_mapper`], [`PathMapper::dir_mapper_shallow`],
/// [`PathMapper::dir_mapper_deep`] or [`PathMapper::glob_mapper`] (all
/// returning a [`MapperBuilder`](crate::MapperBuilder)). A mapper owns no
/// filesystem state and holds no cursor: every consumption — counting,
/// iterating, or both, in any order — re-scans the filesystem, so the same
/// mapper can be consumed repeatedly and yields the same sequence on an
/// unchanged tree.
#[derive(Debug)]
pub struct PathMapper {
    pub(crate) input_root: PathBuf,
    pub(crate) output_root: PathBuf,
    pub(crate) source: InputSource,
    pub(crate) naming: NamingStrategy,
    pub(crate) create_parents: bool,
}

impl PathMapper {
    /// The configured input root.
    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    /// The configured output root.
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// The raw matched input items, before naming. Exposed for
    /// introspection and testing; unlike pair iteration, an empty result is
    /// simply an empty sequence.
    pub fn iter_input(&self) -> impl Iterator<Item = Result<PathBuf, MapError>> + '_ {
        self.source.walk(&self.input_root)
    }

    /// Count the input items by re-running the traversal.
    ///
    /// No output paths are materialized and no directories are created, so
    /// `count()` can be called before, after, or interleaved with
    /// iteration; on an unchanged filesystem it equals the number of pairs
    /// a full iteration produces.
    ///
    /// # Errors
    ///
    /// Propagates listing failures ([`MapError::ListDir`]).
    pub fn count(&self) -> Result<usize, MapError> {
        let mut total = 0;
        for item in self.iter_input() {
            item?;
            total += 1;
        }
        Ok(total)
    }

    /// Iterate over the `(input, output)` pairs.
    ///
    /// Pairs are produced lazily in a deterministic order: pattern order,
    /// then sorted filesystem order within a pattern. When the mapper was
    /// built with `parents(true)` (the default), each pair's output parent
    /// directory is created idempotently immediately before the pair is
    /// handed over.
    ///
    /// # Process termination
    ///
    /// An empty batch almost always means a wrong path or pattern, so if
    /// the traversal matches nothing at all this prints
    /// `no input found for "<input_root>/<pattern>"` to stderr and
    /// terminates the process. Reconstructing the mapper with corrected
    /// inputs and retrying is always safe — no poisoned state is retained.
    pub fn pairs(&self) -> Pairs<'_> {
        Pairs {
            inner: self.source.walk(&self.input_root),
            mapper: self,
            yielded_any: false,
        }
    }

    /// Consume the pair sequence, invoking `f` once per pair.
    ///
    /// A sequential convenience for the common "run this transformation on
    /// every file" loop. Per-item failures belong to the caller's own error
    /// handling; only traversal and directory-creation errors surface here.
    pub fn apply<F>(&self, mut f: F) -> Result<(), MapError>
    where
        F: FnMut(PathPair),
    {
        for pair in self.pairs() {
            f(pair?);
        }
        Ok(())
    }

    fn emit(&self, input: PathBuf) -> Result<PathPair, MapError> {
        let rel = input
            .strip_prefix(&self.input_root)
            .map_err(|_| MapError::OutsideRoot(input.clone()))?;
        let output = self.naming.resolve(&input, rel, &self.output_root)?;
        if self.create_parents {
            if let Some(parent) = output.parent() {
                // create_dir_all is idempotent and tolerates another worker
                // creating a shared ancestor first.
                fs::create_dir_all(parent).map_err(|source| MapError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(PathPair { input, output })
    }

    fn exit_no_input(&self) -> ! {
        // Exact phrasing is part of the contract; external tooling may
        // parse or test against it.
        eprintln!(
            "no input found for \"{}\"",
            self.input_root.join(self.source.expression()).display()
        );
        process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Pairs
// ---------------------------------------------------------------------------

/// Lazy iterator over [`PathPair`]s, created by [`PathMapper::pairs`].
pub struct Pairs<'a> {
    inner: Box<dyn Iterator<Item = Result<PathBuf, MapError>> + 'a>,
    mapper: &'a PathMapper,
    yielded_any: bool,
}

impl Iterator for Pairs<'_> {
    type Item = Result<PathPair, MapError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next() {
            Some(item) => {
                self.yielded_any = true;
                Some(item.and_then(|input| self.mapper.emit(input)))
            }
            // Exhausted without a single match: configuration error.
            None if !self.yielded_any => self.mapper.exit_no_input(),
            None => None,
        }
    }
}

impl<'a> IntoIterator for &'a PathMapper {
    type Item = Result<PathPair, MapError>;
    type IntoIter = Pairs<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs()
    }
}
