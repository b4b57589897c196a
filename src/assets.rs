//! Static asset copying.
//!
//! Two kinds of assets end up in the output:
//!
//! ```text
//! static/                    dist/
//! ├── style.css        →     ├── style.css
//! ├── CNAME            →     ├── CNAME
//! └── (robots.txt)     ✗     │   (missing: warning, build continues)
//! images/                    └── images/
//! ├── pancakes.jpg     →         ├── pancakes.jpg
//! └── soup.webp        →         └── soup.webp
//! ```
//!
//! Named files come from an explicit list; each is optional. The images
//! directory is copied wholesale (files only, one level) and is optional as a
//! whole. Destination files are overwritten unconditionally.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Output subdirectory the images directory is mirrored into.
pub const IMAGES_OUTPUT_DIR: &str = "images";

/// What happened to one asset.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetEvent {
    /// A named file was copied to the output root.
    Copied { name: String },
    /// A named file does not exist in the asset root.
    Missing { name: String, root: PathBuf },
    /// A file from the images directory was copied to `images/`.
    ImageCopied { name: String },
    /// The images directory does not exist.
    ImagesDirMissing { path: PathBuf },
}

impl AssetEvent {
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Missing { .. } | Self::ImagesDirMissing { .. })
    }
}

/// Copy each named file from `root` to `output`, skipping missing ones.
///
/// Returns the number of files copied.
pub fn copy_manifest(
    root: &Path,
    names: &[String],
    output: &Path,
    mut report: impl FnMut(AssetEvent),
) -> Result<usize, AssetError> {
    let mut copied = 0;
    for name in names {
        let from = root.join(name);
        if !from.is_file() {
            report(AssetEvent::Missing {
                name: name.clone(),
                root: root.to_path_buf(),
            });
            continue;
        }
        copy_file(&from, &output.join(name))?;
        copied += 1;
        report(AssetEvent::Copied { name: name.clone() });
    }
    Ok(copied)
}

/// Copy every file directly inside `images` to `output/images/`.
///
/// Subdirectories are skipped. A missing `images` directory is reported and
/// is not an error. Returns the number of files copied.
pub fn copy_images(
    images: &Path,
    output: &Path,
    mut report: impl FnMut(AssetEvent),
) -> Result<usize, AssetError> {
    if !images.is_dir() {
        report(AssetEvent::ImagesDirMissing {
            path: images.to_path_buf(),
        });
        return Ok(0);
    }

    let dest = output.join(IMAGES_OUTPUT_DIR);
    fs::create_dir_all(&dest).map_err(|source| AssetError::CreateDir {
        path: dest.clone(),
        source,
    })?;

    let read_err = |source| AssetError::ReadDir {
        path: images.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(images).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    for from in &files {
        let Some(name) = from.file_name() else {
            continue;
        };
        copy_file(from, &dest.join(name))?;
        report(AssetEvent::ImageCopied {
            name: name.to_string_lossy().into_owned(),
        });
    }
    Ok(files.len())
}

fn copy_file(from: &Path, to: &Path) -> Result<(), AssetError> {
    log::trace!("copy {} -> {}", from.display(), to.display());
    fs::copy(from, to).map_err(|source| AssetError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}
