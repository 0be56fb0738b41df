use std::fs;
use std::io;
use std::iter;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::MapError;

/// Immediate child directories of `root`, sorted by name.
///
/// One `read_dir` level, no recursion. Non-directories are skipped; the
/// listing error itself propagates.
pub(crate) fn shallow_dirs(
    root: &Path,
) -> Box<dyn Iterator<Item = Result<PathBuf, MapError>>> {
    debug!("listing child directories of {}", root.display());
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(source) => return Box::new(iter::once(Err(list_err(root, source)))),
    };

    let mut dirs = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_dir() {
                    dirs.push(path);
                }
            }
            Err(source) => return Box::new(iter::once(Err(list_err(root, source)))),
        }
    }
    // read_dir order is platform-dependent; sorting keeps the emitted
    // sequence deterministic on a given snapshot.
    dirs.sort();
    Box::new(dirs.into_iter().map(Ok))
}

/// Leaf directories under `root`: every directory, at any depth, that
/// itself contains no sub-directories. The root is never yielded.
pub(crate) fn leaf_dirs(root: &Path) -> Box<dyn Iterator<Item = Result<PathBuf, MapError>>> {
    debug!("searching for leaf directories under {}", root.display());
    let fallback = root.to_path_buf();
    let walk = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        // Descend through directories only; files are pruned outright.
        .filter_entry(|entry| entry.file_type().is_dir());

    Box::new(walk.filter_map(move |entry| match entry {
        Ok(entry) => match has_child_dir(entry.path()) {
            Ok(true) => None,
            Ok(false) => Some(Ok(entry.path().to_path_buf())),
            Err(err) => Some(Err(err)),
        },
        Err(source) => {
            let path = source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| fallback.clone());
            let source = source
                .into_io_error()
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "walk error"));
            Some(Err(list_err(&path, source)))
        }
    }))
}

fn has_child_dir(dir: &Path) -> Result<bool, MapError> {
    let entries = fs::read_dir(dir).map_err(|source| list_err(dir, source))?;
    for entry in entries {
        let entry = entry.map_err(|source| list_err(dir, source))?;
        let file_type = entry.file_type().map_err(|source| list_err(dir, source))?;
        if file_type.is_dir() {
            return Ok(true);
        }
    }
    Ok(false)
}

fn list_err(path: &Path, source: io::Error) -> MapError {
    MapError::ListDir {
        path: path.to_path_buf(),
        source,
    }
}
