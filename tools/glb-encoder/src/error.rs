//! Error types for mesh validation and GLB encoding

use std::fmt;

/// Largest index value representable in a `u16` index buffer
pub const MAX_INDEX_VALUE: u32 = u16::MAX as u32;

/// Largest vertex count addressable by 16-bit indices
pub const MAX_VERTEX_COUNT: usize = MAX_INDEX_VALUE as usize + 1;

/// Vertex attribute named in shape errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Positions,
    Normals,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Positions => f.write_str("positions"),
            Attribute::Normals => f.write_str("normals"),
        }
    }
}

/// Malformed mesh input, detected before any bytes are produced
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// No positions supplied
    #[error("mesh has no vertices")]
    Empty,

    /// Flat attribute length is not a whole number of xyz triples
    #[error("{attribute} length {len} is not a multiple of 3")]
    NotTriples { attribute: Attribute, len: usize },

    /// NaN or infinite component; `position` indexes the flat list
    #[error("{attribute} component {position} is not finite")]
    NonFinite { attribute: Attribute, position: usize },

    /// Normals present but not one per vertex
    #[error("normal count {normals} does not match vertex count {vertices}")]
    NormalCountMismatch { vertices: usize, normals: usize },

    /// Index length is not a whole number of triangles
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    /// No indices supplied
    #[error("mesh has no triangles")]
    NoTriangles,

    /// More vertices than 16-bit indices can address
    #[error("vertex count {0} exceeds the 16-bit index limit of 65536")]
    TooManyVertices(usize),
}

/// Error returned by the container encoder
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("invalid mesh input: {0}")]
    InputShape(#[from] ShapeError),

    /// Index past the vertex count or the u16 range
    #[error("index {value} at position {position} is out of range for {vertex_count} vertices")]
    IndexRange {
        position: usize,
        value: u32,
        vertex_count: usize,
    },

    #[error("failed to serialize glTF document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
