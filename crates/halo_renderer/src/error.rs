//! Recoverable renderer errors.

use thiserror::Error;

/// Errors that can occur while assembling a scene.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Sphere {id} has no material ({materials} materials defined)")]
    MissingMaterial { id: u32, materials: usize },

    #[error("Sphere id {0} is used more than once")]
    DuplicateId(u32),
}

/// Errors that can occur when starting or running a render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Image size {width}x{height} has no pixels")]
    EmptyImage { width: u32, height: u32 },

    #[error("Samples per pixel must be at least 1")]
    NoSamples,

    #[error("Tile size must be at least 1")]
    ZeroTileSize,

    #[error("Max depth must be at least 1")]
    ZeroMaxDepth,

    #[error("Render cancelled")]
    Cancelled,
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
