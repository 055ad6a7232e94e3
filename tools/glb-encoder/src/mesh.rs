//! High-level mesh construction

use crate::buffer::{AccessorIndex, BufferBuilder};
use crate::error::{Attribute, EncodeError, MAX_INDEX_VALUE, MAX_VERTEX_COUNT, ShapeError};

/// Accessor indices for a mesh
#[derive(Debug, Clone)]
pub struct MeshAccessors {
    pub positions: AccessorIndex,
    pub normals: Option<AccessorIndex>,
    pub indices: AccessorIndex,
}

/// Builder for a single indexed triangle mesh
///
/// Attributes are flat `f32` lists, three components per vertex. An empty
/// normal list means the mesh has no normals.
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    positions: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set flat xyz positions (required)
    pub fn positions(mut self, positions: &[f32]) -> Self {
        self.positions = positions.to_vec();
        self
    }

    /// Set positions from xyz triples
    pub fn positions_vec3(self, positions: &[[f32; 3]]) -> Self {
        self.positions(bytemuck::cast_slice(positions))
    }

    /// Set flat xyz normals (optional)
    pub fn normals(mut self, normals: &[f32]) -> Self {
        self.normals = normals.to_vec();
        self
    }

    /// Set normals from xyz triples
    pub fn normals_vec3(self, normals: &[[f32; 3]]) -> Self {
        self.normals(bytemuck::cast_slice(normals))
    }

    /// Set triangle indices (required)
    pub fn indices(mut self, indices: &[u32]) -> Self {
        self.indices = indices.to_vec();
        self
    }

    /// Set triangle indices from 16-bit values
    pub fn indices_u16(mut self, indices: &[u16]) -> Self {
        self.indices = indices.iter().map(|&i| u32::from(i)).collect();
        self
    }

    /// Number of complete vertices in the position list
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Check shape and index range without packing anything
    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.positions.is_empty() {
            return Err(ShapeError::Empty.into());
        }
        if self.positions.len() % 3 != 0 {
            return Err(ShapeError::NotTriples {
                attribute: Attribute::Positions,
                len: self.positions.len(),
            }
            .into());
        }

        let vertex_count = self.vertex_count();
        if vertex_count > MAX_VERTEX_COUNT {
            return Err(ShapeError::TooManyVertices(vertex_count).into());
        }

        if self.has_normals() {
            if self.normals.len() % 3 != 0 {
                return Err(ShapeError::NotTriples {
                    attribute: Attribute::Normals,
                    len: self.normals.len(),
                }
                .into());
            }
            if self.normals.len() / 3 != vertex_count {
                return Err(ShapeError::NormalCountMismatch {
                    vertices: vertex_count,
                    normals: self.normals.len() / 3,
                }
                .into());
            }
        }

        for (attribute, values) in [
            (Attribute::Positions, &self.positions),
            (Attribute::Normals, &self.normals),
        ] {
            if let Some(position) = values.iter().position(|v| !v.is_finite()) {
                return Err(ShapeError::NonFinite {
                    attribute,
                    position,
                }
                .into());
            }
        }

        if self.indices.is_empty() {
            return Err(ShapeError::NoTriangles.into());
        }
        if self.indices.len() % 3 != 0 {
            return Err(ShapeError::PartialTriangle(self.indices.len()).into());
        }

        // vertex_count <= MAX_VERTEX_COUNT, so this also enforces the u16 range
        if let Some((position, &value)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= vertex_count || **i > MAX_INDEX_VALUE)
        {
            return Err(EncodeError::IndexRange {
                position,
                value,
                vertex_count,
            });
        }

        Ok(())
    }

    /// Validate, then pack positions, normals and indices in that order
    pub fn build(&self, buffer: &mut BufferBuilder) -> Result<MeshAccessors, EncodeError> {
        self.validate()?;

        let indices: Vec<u16> = self.indices.iter().map(|&i| i as u16).collect();

        let positions = buffer.pack_positions(&self.positions);
        let normals = self.has_normals().then(|| buffer.pack_vec3(&self.normals));
        let indices = buffer.pack_indices_u16(&indices);

        Ok(MeshAccessors {
            positions,
            normals,
            indices,
        })
    }
}
