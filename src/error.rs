//! Error types for asteroid generation and world synchronization

use thiserror::Error;

/// Errors that can occur during configuration, generation, or synchronization
///
/// Generation errors never escape a body build: the mesh pipeline catches
/// them and substitutes a fallback primitive. They are still typed so the
/// recovery can be logged and tested.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AsteroidError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Too few vertices or triangles were produced
    #[error("degenerate geometry: {0}")]
    GenerationDegenerate(String),

    /// A triangulation index points past the vertex buffer
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// A completion barrier arrived with spawn records missing
    #[error("world sync desync: missing spawn records {missing:?}")]
    ProtocolDesync { missing: Vec<i32> },

    /// Message encoding or decoding failed
    #[error("message codec error: {0}")]
    Codec(String),

    /// Collision shape derivation failed
    #[error("collision shape derivation failed: {0}")]
    CollisionShape(String),
}

impl From<serde_json::Error> for AsteroidError {
    fn from(err: serde_json::Error) -> Self {
        AsteroidError::Codec(err.to_string())
    }
}

/// Result type alias for asteroid operations
pub type Result<T> = std::result::Result<T, AsteroidError>;
