//! Utility functions for GLB construction

use crate::error::EncodeError;
use gltf_json as json;

/// "glTF" read as a little-endian u32
pub const GLB_MAGIC: u32 = 0x4654_6C67;
/// Container version written in the header
pub const GLB_VERSION: u32 = 2;
/// Chunk type of the JSON document chunk ("JSON")
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// Chunk type of the binary payload chunk ("BIN\0")
pub const CHUNK_BIN: u32 = 0x004E_4942;

/// Size of the file header
pub const HEADER_LENGTH: usize = 12;
/// Size of each chunk header (length + type)
pub const CHUNK_HEADER_LENGTH: usize = 8;

/// Compute component-wise bounds of a flat xyz position list
///
/// A trailing partial triple is ignored.
pub fn compute_bounds(positions: &[f32]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];

    for pos in positions.chunks_exact(3) {
        for i in 0..3 {
            min[i] = min[i].min(pos[i]);
            max[i] = max[i].max(pos[i]);
        }
    }

    (min, max)
}

/// Bytes needed to reach the next 4-byte boundary
pub fn padding_for(len: usize) -> usize {
    (4 - (len % 4)) % 4
}

/// Align buffer to 4-byte boundary
pub fn align_buffer(buffer: &mut Vec<u8>) {
    let padding = padding_for(buffer.len());
    buffer.resize(buffer.len() + padding, 0);
}

/// Assemble GLB binary from JSON and buffer data
pub fn assemble_glb(root: &json::Root, buffer_data: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let json_string = json::serialize::to_string(root)?;
    let json_bytes = json_string.as_bytes();

    let json_padding = padding_for(json_bytes.len());
    let json_chunk_length = json_bytes.len() + json_padding;

    let buffer_padding = padding_for(buffer_data.len());
    let buffer_chunk_length = buffer_data.len() + buffer_padding;

    let total_length = HEADER_LENGTH
        + CHUNK_HEADER_LENGTH
        + json_chunk_length
        + CHUNK_HEADER_LENGTH
        + buffer_chunk_length;

    let mut glb = Vec::with_capacity(total_length);

    // Header
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    // JSON chunk, space padded
    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat_n(0x20u8, json_padding));

    // BIN chunk, zero padded
    glb.extend_from_slice(&(buffer_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    glb.extend_from_slice(buffer_data);
    glb.extend(std::iter::repeat_n(0u8, buffer_padding));

    debug_assert_eq!(glb.len(), total_length);
    Ok(glb)
}
