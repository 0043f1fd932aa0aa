//! The ordered, fixed list of images shown behind the glass card.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

use super::scene::Scene;

/// File extensions picked up when a directory is given.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),
    #[error("no images found in {}", .0.display())]
    NoImages(PathBuf),
}

/// Where one image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Builtin(Scene),
}

impl ImageSource {
    /// Short name for the status bar.
    pub fn label(&self) -> String {
        match self {
            ImageSource::File(path) => path
                .file_name()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| path.display().to_string()),
            ImageSource::Builtin(scene) => scene.label().to_string(),
        }
    }
}

/// Immutable image list.
#[derive(Debug, Clone)]
pub struct Gallery {
    sources: Vec<ImageSource>,
}

impl Gallery {
    pub fn new(sources: Vec<ImageSource>) -> Self {
        Self { sources }
    }

    /// The five built-in scenes.
    pub fn builtin() -> Self {
        Self::new(Scene::ALL.iter().copied().map(ImageSource::Builtin).collect())
    }

    /// Build from command-line paths.  No paths means the built-in scenes;
    /// directories expand to the images they directly contain.
    pub fn from_paths(paths: &[PathBuf]) -> Result<Self, GalleryError> {
        if paths.is_empty() {
            return Ok(Self::builtin());
        }

        let mut sources = Vec::new();
        for path in paths {
            if path.is_dir() {
                let files = images_in_dir(path);
                if files.is_empty() {
                    return Err(GalleryError::NoImages(path.clone()));
                }
                sources.extend(files.into_iter().map(ImageSource::File));
            } else if path.is_file() {
                sources.push(ImageSource::File(path.clone()));
            } else {
                return Err(GalleryError::NotFound(path.clone()));
            }
        }
        Ok(Self::new(sources))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn get(&self, index: usize) -> Option<&ImageSource> {
        self.sources.get(index)
    }

    pub fn sources(&self) -> &[ImageSource] {
        &self.sources
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by file name.  Hidden and
/// git-ignored entries are skipped; unreadable entries are logged and
/// skipped.
fn images_in_dir(dir: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1)) // only immediate children
        .hidden(true)
        .git_ignore(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!("skipping entry in {}: {err}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        // WalkBuilder yields the root itself first.
        if path == dir {
            continue;
        }
        if path.is_file() && has_image_extension(path) {
            files.push(path.to_path_buf());
        } else {
            tracing::debug!("not an image, skipping {}", path.display());
        }
    }

    files.sort_by_key(|p| p.file_name().map(|n| n.to_ascii_lowercase()));
    files
}
