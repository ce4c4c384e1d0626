//! Probe error type.

use std::path::PathBuf;

use skyline_config::ConfigError;
use skyline_landscape::LandscapeError;
use skyline_render::{GpuError, TextureError};

/// Anything that stops the probe.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Landscape(#[from] LandscapeError),

    /// `landscape.ini` exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Ini {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error(transparent)]
    Texture(#[from] TextureError),
}
