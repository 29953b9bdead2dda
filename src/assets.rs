//! Texture handles and the loader seam
//!
//! The simulation only ever sees an already-loaded [`Texture`]. Loading is the
//! host's job; failures come back as [`AssetError`] so the host can fall back
//! to an untextured player instead of aborting.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to load asset {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A loaded image, as far as the game cares: a name and pixel dimensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Something that can turn a path into a texture handle
pub trait TextureLoader {
    fn load(&mut self, path: &Path) -> Result<Texture, AssetError>;
}

/// Loads textures from disk, reading only the image header for dimensions
#[derive(Debug, Default)]
pub struct FsTextureLoader {
    root: Option<PathBuf>,
}

impl FsTextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl TextureLoader for FsTextureLoader {
    fn load(&mut self, path: &Path) -> Result<Texture, AssetError> {
        let full = self.resolve(path);
        if !full.exists() {
            return Err(AssetError::NotFound(full));
        }

        let (width, height) =
            image::image_dimensions(&full).map_err(|e| load_error(&full, e))?;
        if width == 0 || height == 0 {
            return Err(AssetError::InvalidData(format!(
                "{} has zero size ({}x{})",
                full.display(),
                width,
                height
            )));
        }

        let name = full
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| full.display().to_string());
        log::debug!("Loaded texture {} ({}x{})", name, width, height);

        Ok(Texture::new(name, width, height))
    }
}

/// Read failures stay I/O errors; anything the decoder rejects is a load failure
fn load_error(path: &Path, err: image::ImageError) -> AssetError {
    match err {
        image::ImageError::IoError(e) => AssetError::Io(e),
        other => AssetError::LoadFailed {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}
