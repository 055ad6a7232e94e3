//! Low-level buffer packing with automatic alignment and accessor creation

use crate::utils::{align_buffer, compute_bounds};
use gltf_json as json;
use gltf_json::validation::Checked::Valid;

/// Accessor index returned by buffer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorIndex(pub u32);

impl AccessorIndex {
    pub fn as_json_index(&self) -> json::Index<json::Accessor> {
        json::Index::new(self.0)
    }
}

/// Builder for the single binary buffer of a GLB
///
/// Regions are appended in call order. Each region starts on a 4-byte
/// boundary and gets its own buffer view and accessor.
pub struct BufferBuilder {
    buffer: Vec<u8>,
    views: Vec<json::buffer::View>,
    accessors: Vec<json::Accessor>,
}

impl BufferBuilder {
    /// Create a new empty buffer builder
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            views: Vec::new(),
            accessors: Vec::new(),
        }
    }

    /// Get the current accessor count
    pub fn accessor_count(&self) -> u32 {
        self.accessors.len() as u32
    }

    /// Get the binary buffer data
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the buffer views
    pub fn views(&self) -> &[json::buffer::View] {
        &self.views
    }

    /// Get the accessors
    pub fn accessors(&self) -> &[json::Accessor] {
        &self.accessors
    }

    /// Pack flat xyz positions with bounds calculation
    pub fn pack_positions(&mut self, positions: &[f32]) -> AccessorIndex {
        let (min, max) = compute_bounds(positions);
        self.pack_region(
            Region {
                bytes: f32_le_bytes(positions),
                count: positions.len() / 3,
                component_type: json::accessor::ComponentType::F32,
                type_: json::accessor::Type::Vec3,
                target: json::buffer::Target::ArrayBuffer,
            },
            Some((bounds_value(min), bounds_value(max))),
        )
    }

    /// Pack flat xyz vectors without bounds (normals)
    pub fn pack_vec3(&mut self, data: &[f32]) -> AccessorIndex {
        self.pack_region(
            Region {
                bytes: f32_le_bytes(data),
                count: data.len() / 3,
                component_type: json::accessor::ComponentType::F32,
                type_: json::accessor::Type::Vec3,
                target: json::buffer::Target::ArrayBuffer,
            },
            None,
        )
    }

    /// Pack u16 triangle indices
    pub fn pack_indices_u16(&mut self, indices: &[u16]) -> AccessorIndex {
        self.pack_region(
            Region {
                bytes: u16_le_bytes(indices),
                count: indices.len(),
                component_type: json::accessor::ComponentType::U16,
                type_: json::accessor::Type::Scalar,
                target: json::buffer::Target::ElementArrayBuffer,
            },
            None,
        )
    }

    fn pack_region(
        &mut self,
        region: Region<'_>,
        bounds: Option<(json::Value, json::Value)>,
    ) -> AccessorIndex {
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(&region.bytes);

        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: region.bytes.len().into(),
            byte_offset: Some((offset as u64).into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: Some(Valid(region.target)),
        });

        let (min, max) = match bounds {
            Some((min, max)) => (Some(min), Some(max)),
            None => (None, None),
        };

        let accessor_idx = self.accessors.len() as u32;
        self.accessors.push(json::Accessor {
            buffer_view: Some(json::Index::new(self.views.len() as u32 - 1)),
            byte_offset: Some(0u64.into()),
            count: region.count.into(),
            component_type: Valid(json::accessor::GenericComponentType(region.component_type)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(region.type_),
            min,
            max,
            name: None,
            normalized: false,
            sparse: None,
        });

        tracing::debug!(
            accessor = accessor_idx,
            offset,
            length = region.bytes.len(),
            count = region.count,
            "packed buffer region"
        );

        align_buffer(&mut self.buffer);
        AccessorIndex(accessor_idx)
    }
}

impl Default for BufferBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct Region<'a> {
    bytes: std::borrow::Cow<'a, [u8]>,
    count: usize,
    component_type: json::accessor::ComponentType,
    type_: json::accessor::Type,
    target: json::buffer::Target,
}

fn bounds_value(values: [f32; 3]) -> json::Value {
    json::Value::Array(values.into_iter().map(json::Value::from).collect())
}

/// Little-endian bytes of an f32 slice, borrowed on little-endian hosts
fn f32_le_bytes(data: &[f32]) -> std::borrow::Cow<'_, [u8]> {
    if cfg!(target_endian = "little") {
        std::borrow::Cow::Borrowed(bytemuck::cast_slice(data))
    } else {
        std::borrow::Cow::Owned(data.iter().flat_map(|v| v.to_le_bytes()).collect())
    }
}

/// Little-endian bytes of a u16 slice, borrowed on little-endian hosts
fn u16_le_bytes(data: &[u16]) -> std::borrow::Cow<'_, [u8]> {
    if cfg!(target_endian = "little") {
        std::borrow::Cow::Borrowed(bytemuck::cast_slice(data))
    } else {
        std::borrow::Cow::Owned(data.iter().flat_map(|v| v.to_le_bytes()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_offset(view: &json::buffer::View) -> u64 {
        view.byte_offset.as_ref().map(|o| o.0).unwrap_or(0)
    }

    #[test]
    fn test_buffer_builder_positions() {
        let mut builder = BufferBuilder::new();
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0];
        let idx = builder.pack_positions(&positions);

        assert_eq!(idx, AccessorIndex(0));
        assert_eq!(builder.accessor_count(), 1);
        assert_eq!(builder.views().len(), 1);
        // 3 positions * 12 bytes = 36 bytes, aligned to 4 = 36
        assert_eq!(builder.data().len(), 36);

        let accessor = &builder.accessors()[0];
        assert_eq!(accessor.count.0, 3);
        assert!(accessor.min.is_some());
        assert!(accessor.max.is_some());
    }

    #[test]
    fn test_buffer_builder_indices() {
        let mut builder = BufferBuilder::new();
        let indices: [u16; 3] = [0, 1, 2];
        let idx = builder.pack_indices_u16(&indices);

        assert_eq!(idx, AccessorIndex(0));
        // 3 indices * 2 bytes = 6 bytes, aligned to 8
        assert_eq!(builder.data().len(), 8);
        // View length excludes the padding
        assert_eq!(builder.views()[0].byte_length.0, 6);
        assert_eq!(&builder.data()[6..], &[0, 0]);
    }

    #[test]
    fn test_regions_are_contiguous_and_little_endian() {
        let mut builder = BufferBuilder::new();
        builder.pack_positions(&[1.0, 2.0, 3.0]);
        builder.pack_vec3(&[0.0, 0.0, 1.0]);
        builder.pack_indices_u16(&[0x0102, 0, 0]);

        let views = builder.views();
        assert_eq!(view_offset(&views[0]), 0);
        assert_eq!(view_offset(&views[1]), 12);
        assert_eq!(view_offset(&views[2]), 24);

        let data = builder.data();
        assert_eq!(&data[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&data[20..24], &1.0f32.to_le_bytes());
        assert_eq!(&data[24..26], &[0x02, 0x01]);
    }

    #[test]
    fn test_normals_have_no_bounds() {
        let mut builder = BufferBuilder::new();
        builder.pack_vec3(&[0.0, 1.0, 0.0]);
        let accessor = &builder.accessors()[0];
        assert!(accessor.min.is_none());
        assert!(accessor.max.is_none());
    }
}
