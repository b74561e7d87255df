use thiserror::Error;

/// Errors raised by the lighting estimators and the mesh bake.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LightingError {
    #[error("Cannot estimate lighting over an empty triangle list")]
    EmptyMesh,

    #[error("Sample count must be at least 1")]
    NoSamples,

    #[error("Vertex count {vertices} is not a multiple of 3")]
    IncompleteTriangle { vertices: usize },

    #[error("Bake cancelled after {completed} of {total} triangles")]
    Cancelled { completed: usize, total: usize },

    #[error("Unknown shading mode {0:?}, expected \"irradiance\" or \"shading\"")]
    UnknownShadingMode(String),
}

/// Result type for lighting operations.
pub type LightingResult<T> = Result<T, LightingError>;
