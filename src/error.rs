use thiserror::Error;

/// Contract violations raised while building sketch model values.
///
/// These indicate a caller bug rather than noisy input, so construction is
/// rejected instead of silently repaired.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SketchError {
    #[error("Sketch canvas must have a non-zero size, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("A brush set needs at least one pen color")]
    NoBrushes,

    #[error("A stroke needs at least one path node")]
    EmptyStroke,

    #[error("A path node holds 1 to 3 points, got {0}")]
    InvalidPathNode(usize),

    #[error("Brush index {index} out of range (set has {len} brushes)")]
    BrushOutOfRange { index: usize, len: usize },
}

/// Result type for model construction
pub type SketchResult<T> = Result<T, SketchError>;
