//! Texture lookup on disk for the probe.

use std::path::{Path, PathBuf};

use skyline_landscape::{TextureHandle, TextureImage, TextureResolver};

/// Finds landscape textures in the landscape's own directory, then in a
/// shared directory, and decodes them eagerly.
#[derive(Clone, Debug)]
pub struct DirectoryTextureResolver {
    landscape_dir: PathBuf,
    shared_dir: Option<PathBuf>,
}

impl DirectoryTextureResolver {
    pub fn new(landscape_dir: impl Into<PathBuf>, shared_dir: Option<PathBuf>) -> Self {
        Self {
            landscape_dir: landscape_dir.into(),
            shared_dir,
        }
    }

    /// First existing file named `file_name`, in search order.
    pub fn find(&self, file_name: &str) -> Option<PathBuf> {
        std::iter::once(&self.landscape_dir)
            .chain(self.shared_dir.as_ref())
            .map(|dir| dir.join(file_name))
            .find(|path| path.is_file())
    }
}

/// Decode an image file into RGBA8.
pub fn decode_texture(path: &Path) -> Result<TextureImage, image::ImageError> {
    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    TextureImage::new(width, height, rgba.into_raw()).ok_or_else(|| {
        image::ImageError::Limits(image::error::LimitError::from_kind(
            image::error::LimitErrorKind::DimensionError,
        ))
    })
}

impl TextureResolver for DirectoryTextureResolver {
    fn resolve(&self, landscape_id: &str, file_name: &str) -> Option<TextureHandle> {
        let Some(path) = self.find(file_name) else {
            log::debug!("Landscape '{landscape_id}': no file '{file_name}' in search path");
            return None;
        };
        match decode_texture(&path) {
            Ok(image) => {
                log::debug!(
                    "Decoded {} ({}x{})",
                    path.display(),
                    image.width(),
                    image.height()
                );
                Some(TextureHandle::ready(file_name, image))
            }
            Err(e) => {
                log::warn!("Failed to decode {}: {e}", path.display());
                None
            }
        }
    }
}
