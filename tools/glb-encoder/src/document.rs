//! GLTF document construction

use crate::{Material, MeshAccessors};
use gltf_json as json;
use gltf_json::validation::Checked::Valid;
use std::collections::BTreeMap;

/// Builder for complete GLTF documents
pub struct GltfBuilder {
    nodes: Vec<json::Node>,
    meshes: Vec<json::Mesh>,
    materials: Vec<json::Material>,
    scenes: Vec<json::Scene>,
    buffer_byte_length: u64,
}

impl GltfBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            meshes: Vec::new(),
            materials: Vec::new(),
            scenes: Vec::new(),
            buffer_byte_length: 0,
        }
    }

    /// Set buffer byte length (required before building)
    pub fn buffer_byte_length(mut self, length: u64) -> Self {
        self.buffer_byte_length = length;
        self
    }

    /// Add a material, referenced by the next meshes through [`Self::last_material_index`]
    pub fn add_material(mut self, material: Material) -> Self {
        self.materials.push(material.to_json());
        self
    }

    /// Get the index of the last added material
    pub fn last_material_index(&self) -> Option<json::Index<json::Material>> {
        if self.materials.is_empty() {
            None
        } else {
            Some(json::Index::new(self.materials.len() as u32 - 1))
        }
    }

    /// Add a mesh with a single triangle-list primitive
    pub fn add_mesh_from_accessors(
        mut self,
        name: &str,
        accessors: &MeshAccessors,
        material: Option<json::Index<json::Material>>,
    ) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            Valid(json::mesh::Semantic::Positions),
            accessors.positions.as_json_index(),
        );

        if let Some(normals) = accessors.normals {
            attributes.insert(
                Valid(json::mesh::Semantic::Normals),
                normals.as_json_index(),
            );
        }

        let primitive = json::mesh::Primitive {
            attributes,
            extensions: Default::default(),
            extras: Default::default(),
            indices: Some(accessors.indices.as_json_index()),
            material,
            mode: Valid(json::mesh::Mode::Triangles),
            targets: None,
        };

        self.meshes.push(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(name.to_string()),
            primitives: vec![primitive],
            weights: None,
        });

        self
    }

    /// Get the current mesh count, which is also the index of the next mesh
    pub fn mesh_count(&self) -> u32 {
        self.meshes.len() as u32
    }

    /// Get the index of the last added mesh
    pub fn last_mesh_index(&self) -> Option<json::Index<json::Mesh>> {
        if self.meshes.is_empty() {
            None
        } else {
            Some(json::Index::new(self.meshes.len() as u32 - 1))
        }
    }

    /// Add a node instancing a mesh
    pub fn add_mesh_node(mut self, name: &str, mesh: json::Index<json::Mesh>) -> Self {
        self.nodes.push(json::Node {
            camera: None,
            children: None,
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: Some(mesh),
            name: Some(name.to_string()),
            rotation: None,
            scale: None,
            skin: None,
            translation: None,
            weights: None,
        });
        self
    }

    /// Get the current node count
    pub fn node_count(&self) -> u32 {
        self.nodes.len() as u32
    }

    /// Add a scene
    pub fn add_scene(mut self, name: &str, root_nodes: &[u32]) -> Self {
        self.scenes.push(json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(name.to_string()),
            nodes: root_nodes.iter().map(|n| json::Index::new(*n)).collect(),
        });
        self
    }

    /// Build final GLTF Root (requires buffer views and accessors from BufferBuilder)
    pub fn build(
        self,
        buffer_views: &[json::buffer::View],
        accessors: &[json::Accessor],
        generator: &str,
    ) -> json::Root {
        let buffers = vec![json::Buffer {
            byte_length: self.buffer_byte_length.into(),
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            uri: None,
        }];

        json::Root {
            accessors: accessors.to_vec(),
            animations: Vec::new(),
            asset: json::Asset {
                copyright: None,
                extensions: Default::default(),
                extras: Default::default(),
                generator: Some(generator.to_string()),
                min_version: None,
                version: "2.0".to_string(),
            },
            buffers,
            buffer_views: buffer_views.to_vec(),
            cameras: Vec::new(),
            extensions: Default::default(),
            extensions_required: Vec::new(),
            extensions_used: Vec::new(),
            extras: Default::default(),
            images: Vec::new(),
            materials: self.materials,
            meshes: self.meshes,
            nodes: self.nodes,
            samplers: Vec::new(),
            scene: if self.scenes.is_empty() {
                None
            } else {
                Some(json::Index::new(0))
            },
            scenes: self.scenes,
            skins: Vec::new(),
            textures: Vec::new(),
        }
    }
}

impl Default for GltfBuilder {
    fn default() -> Self {
        Self::new()
    }
}
