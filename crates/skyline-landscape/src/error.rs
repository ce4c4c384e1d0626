//! Landscape loading errors.

use std::path::PathBuf;

use skyline_config::LandscapeKind;

/// Why a landscape failed to load. A landscape that returned one of these is
/// left invalid: it draws nothing and reports the default opacity.
#[derive(Debug, thiserror::Error)]
pub enum LandscapeError {
    /// The description has an empty `name`.
    #[error("landscape '{id}' has no name")]
    MissingName { id: String },

    /// The description is for another projection.
    #[error("landscape '{id}' is {found}, expected {expected}")]
    TypeMismatch {
        id: String,
        expected: LandscapeKind,
        found: LandscapeKind,
    },

    /// A key the projection cannot do without is absent.
    #[error("landscape '{id}' does not set {key}")]
    MissingKey { id: String, key: &'static str },

    /// A required texture could not be resolved.
    #[error("texture '{name}' of landscape '{id}' is unavailable")]
    TextureUnavailable { id: String, name: String },

    /// The horizon list produced fewer than three usable points.
    #[error("horizon list {} yields no polygon", path.display())]
    DegenerateHorizon { path: PathBuf },

    /// A side panel references a side texture that does not exist.
    #[error("side {side} references texture {texture}, but only {available} are defined")]
    InvalidSide {
        side: usize,
        texture: usize,
        available: usize,
    },

    /// Tessellation needs a positive radius.
    #[error("landscape radius must be positive, got {0}")]
    InvalidRadius(f64),
}
