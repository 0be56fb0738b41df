use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::MapError;

/// A caller-supplied naming function: `(input_path, output_root) -> output_path`.
pub type NameFn = Box<dyn Fn(&Path, &Path) -> PathBuf + Send + Sync>;

/// The placeholder token substituted by [`NamingStrategy::Template`].
const PLACEHOLDER: &str = "{}";

/// How an output path is derived from a matched input.
///
/// All variants except [`Custom`](NamingStrategy::Custom) operate on the
/// input's path *relative to the input root* and place the result under the
/// output root. Resolution is pure — directory creation is the mapper's
/// job, never the naming strategy's.
pub enum NamingStrategy {
    /// `output_root / relative_path`, extension unchanged.
    Identity,

    /// Replace the final extension with the given suffix. The suffix
    /// carries its own leading separator if one is wanted (`".processed"`);
    /// an empty suffix strips the extension.
    SuffixAppend(String),

    /// Insert the given text between the stem and the extension:
    /// `"scan.nii"` with `"_segmentation"` becomes `"scan_segmentation.nii"`.
    StemSuffixAppend(String),

    /// Substitute the input's stem for the one `{}` placeholder, within the
    /// same directory as the relative path: `"prefix_{}"` applied to
    /// `fruity.dat` yields `prefix_fruity.dat`. A template ending with the
    /// placeholder keeps the input's extension; anywhere else, the
    /// extension, if any, comes from the template itself (`"{}.suffix"`
    /// yields `fruity.suffix`).
    Template(String),

    /// Full control: the function receives `(input_path, output_root)` and
    /// returns the output path directly, bypassing the relative-path
    /// convention entirely.
    Custom(NameFn),
}

impl fmt::Debug for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "Identity"),
            Self::SuffixAppend(s) => f.debug_tuple("SuffixAppend").field(s).finish(),
            Self::StemSuffixAppend(s) => f.debug_tuple("StemSuffixAppend").field(s).finish(),
            Self::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl NamingStrategy {
    /// Check the strategy's configuration without touching any path.
    pub(crate) fn validate(&self) -> Result<(), MapError> {
        if let Self::Template(template) = self {
            if template.matches(PLACEHOLDER).count() != 1 {
                return Err(MapError::InvalidTemplate(template.clone()));
            }
        }
        Ok(())
    }

    /// Compute the output path for one input.
    ///
    /// `rel` is `input` stripped of the input root; `input` itself is only
    /// consulted by [`Custom`](NamingStrategy::Custom) strategies.
    pub(crate) fn resolve(
        &self,
        input: &Path,
        rel: &Path,
        output_root: &Path,
    ) -> Result<PathBuf, MapError> {
        match self {
            Self::Identity => Ok(output_root.join(rel)),
            Self::SuffixAppend(suffix) => {
                let stem = stem_of(rel)?;
                Ok(output_root.join(rel).with_file_name(format!("{stem}{suffix}")))
            }
            Self::StemSuffixAppend(suffix) => {
                let stem = stem_of(rel)?;
                let name = match rel.extension() {
                    Some(ext) => {
                        let ext = ext
                            .to_str()
                            .ok_or_else(|| MapError::NonUtf8Path(rel.to_path_buf()))?;
                        format!("{stem}{suffix}.{ext}")
                    }
                    None => format!("{stem}{suffix}"),
                };
                Ok(output_root.join(rel).with_file_name(name))
            }
            Self::Template(template) => {
                let stem = stem_of(rel)?;
                let mut segment = template.replacen(PLACEHOLDER, stem, 1);
                // A template ending with the placeholder keeps the input's
                // extension; anywhere else, the template supplies it.
                if template.ends_with(PLACEHOLDER) {
                    if let Some(ext) = rel.extension() {
                        let ext = ext
                            .to_str()
                            .ok_or_else(|| MapError::NonUtf8Path(rel.to_path_buf()))?;
                        segment = format!("{segment}.{ext}");
                    }
                }
                let dir = rel.parent().unwrap_or_else(|| Path::new(""));
                // Separators in the template pass through verbatim.
                Ok(output_root.join(dir).join(segment))
            }
            Self::Custom(f) => Ok(f(input, output_root)),
        }
    }
}

fn stem_of(rel: &Path) -> Result<&str, MapError> {
    rel.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| MapError::NonUtf8Path(rel.to_path_buf()))
}
