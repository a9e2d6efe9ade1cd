//! Mapping from source paths to output paths.

use std::path::{Path, PathBuf};

/// Relocates sources from an input namespace into an output namespace.
///
/// `images/cat.png` becomes `images/output/cat.png` with the default layout.
/// The output directory must already exist; nothing here touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    input_root: PathBuf,
    output_root: PathBuf,
}

impl OutputLayout {
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Destination for a source path.
    ///
    /// Sources under the input root keep their relative path below the
    /// output root. Anything else lands directly in the output root under
    /// its file name, so a source is never its own destination.
    pub fn destination_for(&self, source: &Path) -> PathBuf {
        match source.strip_prefix(&self.input_root) {
            Ok(relative) if !relative.as_os_str().is_empty() => self.output_root.join(relative),
            _ => match source.file_name() {
                Some(name) => self.output_root.join(name),
                None => self.output_root.clone(),
            },
        }
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new("images", Path::new("images").join("output"))
    }
}
