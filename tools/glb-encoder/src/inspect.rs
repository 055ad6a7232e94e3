//! Read-back of GLB files for verification and reporting

use crate::utils::{CHUNK_HEADER_LENGTH, HEADER_LENGTH};
use gltf::accessor::{DataType, Dimensions};
use gltf::buffer::Target;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("failed to parse GLB: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("GLB is truncated at {0} bytes")]
    Truncated(usize),
}

/// Byte range of one buffer view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSummary {
    pub offset: usize,
    pub length: usize,
    pub target: Option<Target>,
}

/// Shape and bounds of one accessor
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorSummary {
    pub count: usize,
    pub data_type: DataType,
    pub dimensions: Dimensions,
    pub min: Option<Vec<f64>>,
    pub max: Option<Vec<f64>>,
}

/// Container layout and document contents of a GLB
#[derive(Debug, Clone, PartialEq)]
pub struct GlbSummary {
    pub version: u32,
    /// Total length recorded in the file header
    pub total_length: u32,
    pub json_chunk_length: u32,
    pub bin_chunk_length: u32,
    pub views: Vec<ViewSummary>,
    pub accessors: Vec<AccessorSummary>,
    pub materials: usize,
}

/// Parse and validate a GLB, summarizing its layout
pub fn inspect_glb(bytes: &[u8]) -> Result<GlbSummary, InspectError> {
    let glb = gltf::Glb::from_slice(bytes)?;
    let gltf = gltf::Gltf::from_slice(bytes)?;

    let json_chunk_length = read_u32(bytes, HEADER_LENGTH)?;
    let bin_header = HEADER_LENGTH + CHUNK_HEADER_LENGTH + json_chunk_length as usize;
    let bin_chunk_length = read_u32(bytes, bin_header)?;

    let views = gltf
        .views()
        .map(|view| ViewSummary {
            offset: view.offset(),
            length: view.length(),
            target: view.target(),
        })
        .collect();

    let accessors = gltf
        .accessors()
        .map(|accessor| AccessorSummary {
            count: accessor.count(),
            data_type: accessor.data_type(),
            dimensions: accessor.dimensions(),
            min: accessor.min().as_ref().and_then(bounds_from_json),
            max: accessor.max().as_ref().and_then(bounds_from_json),
        })
        .collect();

    Ok(GlbSummary {
        version: glb.header.version,
        total_length: glb.header.length,
        json_chunk_length,
        bin_chunk_length,
        views,
        accessors,
        materials: gltf.materials().count(),
    })
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, InspectError> {
    bytes
        .get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or(InspectError::Truncated(bytes.len()))
}

fn bounds_from_json(value: &gltf::json::Value) -> Option<Vec<f64>> {
    value.as_array()?.iter().map(|v| v.as_f64()).collect()
}

impl fmt::Display for GlbSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GLB version {}, {} bytes", self.version, self.total_length)?;
        writeln!(f, "  JSON chunk: {} bytes", self.json_chunk_length)?;
        writeln!(f, "  BIN chunk:  {} bytes", self.bin_chunk_length)?;
        writeln!(f, "  Materials: {}", self.materials)?;

        writeln!(f, "  Buffer views:")?;
        for (i, view) in self.views.iter().enumerate() {
            writeln!(
                f,
                "    [{i}] offset={} length={} target={:?}",
                view.offset, view.length, view.target
            )?;
        }

        writeln!(f, "  Accessors:")?;
        for (i, accessor) in self.accessors.iter().enumerate() {
            write!(
                f,
                "    [{i}] {:?} {:?} count={}",
                accessor.dimensions, accessor.data_type, accessor.count
            )?;
            if let (Some(min), Some(max)) = (&accessor.min, &accessor.max) {
                write!(f, " min={min:?} max={max:?}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
