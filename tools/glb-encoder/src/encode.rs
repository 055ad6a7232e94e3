//! One-shot encoding of a single mesh into a GLB file

use crate::error::EncodeError;
use crate::utils::assemble_glb;
use crate::{BufferBuilder, GltfBuilder, Material, MeshBuilder};
use gltf_json as json;
use std::fs;
use std::path::Path;

/// Generator string recorded in `asset.generator`
pub const GENERATOR: &str = concat!("glb-encoder ", env!("CARGO_PKG_VERSION"));

/// Borrowed inputs for one GLB file
///
/// `normals` may be empty. `indices` are validated against the vertex count
/// and the 16-bit range before anything is encoded.
#[derive(Debug, Clone, Copy)]
pub struct MeshInput<'a> {
    /// Name given to the mesh and its node
    pub name: &'a str,
    pub positions: &'a [f32],
    pub normals: &'a [f32],
    pub indices: &'a [u32],
    pub material: Option<Material>,
}

impl<'a> MeshInput<'a> {
    pub fn new(name: &'a str, positions: &'a [f32], indices: &'a [u32]) -> Self {
        Self {
            name,
            positions,
            normals: &[],
            indices,
            material: None,
        }
    }

    pub fn with_normals(mut self, normals: &'a [f32]) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    fn mesh_builder(&self) -> MeshBuilder {
        MeshBuilder::new()
            .positions(self.positions)
            .normals(self.normals)
            .indices(self.indices)
    }

    /// Check the inputs without encoding
    pub fn validate(&self) -> Result<(), EncodeError> {
        self.mesh_builder().validate()
    }
}

/// Encode a mesh into GLB bytes
pub fn encode_glb(input: &MeshInput<'_>) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = BufferBuilder::new();
    let mesh = input.mesh_builder().build(&mut buffer)?;

    let mut gltf = GltfBuilder::new().buffer_byte_length(buffer.data().len() as u64);
    if let Some(material) = input.material {
        gltf = gltf.add_material(material);
    }
    let material = gltf.last_material_index();

    let mesh_index = json::Index::new(gltf.mesh_count());
    let node = gltf.node_count();
    let gltf = gltf
        .add_mesh_from_accessors(input.name, &mesh, material)
        .add_mesh_node(input.name, mesh_index)
        .add_scene("Scene", &[node]);

    let root = gltf.build(buffer.views(), buffer.accessors(), GENERATOR);
    assemble_glb(&root, buffer.data())
}

/// Encode a mesh and write it to `path`
///
/// The file is only created once encoding has succeeded. The parent
/// directory must already exist. Returns the number of bytes written.
pub fn write_glb(input: &MeshInput<'_>, path: &Path) -> Result<usize, EncodeError> {
    let glb = encode_glb(input)?;
    fs::write(path, &glb)?;

    tracing::debug!(path = %path.display(), bytes = glb.len(), "wrote GLB");
    Ok(glb.len())
}
