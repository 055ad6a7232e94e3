//! GLB container encoding for placeholder meshes
//!
//! Turns flat position, normal and index lists into a self-contained binary
//! glTF file:
//! - BufferBuilder: Pack binary data with automatic alignment
//! - MeshBuilder: Validate and pack one indexed triangle mesh
//! - GltfBuilder: Top-level GLTF document construction
//! - encode_glb / write_glb: One-shot encoding of a [`MeshInput`]
//! - inspect_glb: Parse a GLB back into a [`GlbSummary`]
//!
//! Inputs are validated before anything is produced. Indices past the vertex
//! count or the 16-bit range are rejected rather than truncated.
//!
//! # Example
//!
//! ```no_run
//! use glb_encoder::*;
//!
//! let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let input = MeshInput::new("Triangle", &positions, &[0, 1, 2])
//!     .with_material(Material::PLACEHOLDER);
//!
//! write_glb(&input, std::path::Path::new("triangle.glb"))?;
//! # Ok::<(), EncodeError>(())
//! ```

pub mod buffer;
pub mod document;
pub mod encode;
pub mod error;
pub mod inspect;
pub mod material;
pub mod mesh;
pub mod utils;

pub use buffer::{AccessorIndex, BufferBuilder};
pub use document::GltfBuilder;
pub use encode::{GENERATOR, MeshInput, encode_glb, write_glb};
pub use error::{Attribute, EncodeError, MAX_INDEX_VALUE, MAX_VERTEX_COUNT, ShapeError};
pub use inspect::{AccessorSummary, GlbSummary, InspectError, ViewSummary, inspect_glb};
pub use material::Material;
pub use mesh::{MeshAccessors, MeshBuilder};
pub use utils::{align_buffer, assemble_glb, compute_bounds};

// Re-export commonly used gltf-json types
pub use gltf_json as json;
