use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    // Configuration — surfaced by `MapperBuilder::build()`, before any
    // filesystem access
    #[error("no glob patterns given")]
    EmptyPatternSet,

    #[error("invalid glob pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("template `{0}` must contain exactly one `{{}}` placeholder")]
    InvalidTemplate(String),

    #[error("glob patterns cannot be combined with a directory-listing mapper")]
    PatternsWithDirMode,

    // Traversal
    #[error("failed to list directory {}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Naming / emission
    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("path is not valid unicode: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("input {} lies outside the input root", .0.display())]
    OutsideRoot(PathBuf),
}

impl MapError {
    /// The path this error occurred at, if applicable.
    /// Callers use this to present "failed: <path>" without pattern matching on variants.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ListDir { path, .. } | Self::CreateDir { path, .. } => Some(path),
            Self::NonUtf8Path(p) | Self::OutsideRoot(p) => Some(p),
            _ => None,
        }
    }

    /// Whether this error was detected at construction time.
    ///
    /// Configuration errors (empty pattern set, malformed pattern or
    /// template, patterns on a directory-listing mapper) indicate a broken
    /// pipeline setup and are reported by `build()` before any traversal.
    /// Everything else arises during iteration and carries an I/O source.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyPatternSet
                | Self::InvalidPattern { .. }
                | Self::InvalidTemplate(_)
                | Self::PatternsWithDirMode
        )
    }
}
