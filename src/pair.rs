use std::path::PathBuf;

/// A single unit of work produced by a [`PathMapper`](crate::PathMapper).
///
/// `input` is a matched filesystem entry resolved against the input root;
/// `output` mirrors the input's path relative to the input root, rewritten
/// by the mapper's [`NamingStrategy`](crate::NamingStrategy) under the
/// output root. Plain data — safe to hand off to worker threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair {
    /// The entry to read from.
    pub input: PathBuf,

    /// Where the caller should write its result. When the mapper was built
    /// with `parents(true)` (the default), this path's parent directory
    /// exists by the time the pair is handed over.
    pub output: PathBuf,
}
