//! # pathmap
//!
//! Batch file-pair generator for data pipelines — lazy, restartable, zero
//! opinions.
//!
//! pathmap turns an input directory, a set of glob patterns, and a naming
//! strategy into a deduplicated, order-stable sequence of
//! `(input_path, output_path)` pairs. It owns traversal, naming, and output
//! parent creation. It does **not** own the transformation applied to each
//! pair, concurrency, or CLI plumbing — those belong to the caller.
//!
//! # Quick Start
//!
//! Map every `.nii` file under `incoming/` to a `_segmentation`-suffixed
//! path under `outgoing/`, creating output parents as needed:
//!
//! ```no_run
//! use pathmap::{PathMapper, PathPair};
//!
//! let mapper = PathMapper::file_mapper("incoming", "outgoing")
//!     .glob("**/*.nii")
//!     .stem_suffix("_segmentation")
//!     .build()?;
//!
//! for pair in &mapper {
//!     let PathPair { input, output } = pair?;
//!     // run the per-file transformation here
//! }
//! # Ok::<(), pathmap::MapError>(())
//! ```
//!
//! A file `incoming/scan1/recon.nii` is paired with
//! `outgoing/scan1/recon_segmentation.nii`, and `outgoing/scan1/` exists by
//! the time the pair is handed over. A file not matching the pattern is
//! ignored. If *nothing* matches, iteration prints
//! `no input found for "incoming/**/*.nii"` to stderr and terminates the
//! process — an empty batch is treated as a broken pipeline setup, not a
//! silent no-op.
//!
//! # Counting and re-iteration
//!
//! A mapper is a descriptor, not a cursor: it re-scans the filesystem on
//! every consumption, so counting (say, for a progress bar) and iterating
//! compose in any order:
//!
//! ```no_run
//! use pathmap::PathMapper;
//!
//! let mapper = PathMapper::file_mapper("incoming", "outgoing").build()?;
//! let total = mapper.count()?;
//! for pair in &mapper {
//!     let pair = pair?;
//!     // total pairs will come through here
//! }
//! # Ok::<(), pathmap::MapError>(())
//! ```
//!
//! # Directory granularity
//!
//! For one-unit-of-work-per-directory pipelines, map immediate child
//! directories, or leaf directories of a variable-depth tree:
//!
//! ```no_run
//! use pathmap::PathMapper;
//!
//! // incoming/study1/, incoming/study2/, ... -> outgoing/study1/, ...
//! let shallow = PathMapper::dir_mapper_shallow("incoming", "outgoing").build()?;
//!
//! // every directory with no sub-directories, however deep
//! let deep = PathMapper::dir_mapper_deep("incoming", "outgoing").build()?;
//! # Ok::<(), pathmap::MapError>(())
//! ```
//!
//! # Concurrency
//!
//! Traversal is single-threaded and synchronous. [`PathPair`] is plain
//! data, so callers are free to fan pairs out to worker threads; pairs are
//! *produced* in a deterministic order, but nothing may be assumed about
//! the order in which concurrent workers *finish*.

#![forbid(unsafe_code)]

mod builder;
mod error;
mod expand;
mod listing;
mod mapper;
mod naming;
mod pair;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::MapperBuilder;
pub use error::MapError;
pub use expand::{GlobSpec, MatchMode};
pub use mapper::{Pairs, PathMapper};
pub use naming::{NameFn, NamingStrategy};
pub use pair::PathPair;
