//! CPU-side mesh data shared by the authored models and the parametric
//! generators. Every mesh uses the same interleaved vertex layout so a
//! single pipeline can draw all of them.

pub mod authored;
pub mod cylinder;
pub mod sphere;

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

pub use cylinder::Cylinder;
pub use sphere::sphere;

/// Floats per interleaved vertex: position(3) + normal(3) + uv(2).
pub const FLOATS_PER_VERTEX: usize = 8;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    fn from_slice(chunk: &[f32]) -> Self {
        Self {
            position: [chunk[0], chunk[1], chunk[2]],
            normal: [chunk[3], chunk[4], chunk[5]],
            uv: [chunk[6], chunk[7]],
        }
    }
}

/// One draw sub-call. Ranges index vertices for non-indexed meshes and
/// indices for indexed meshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawSection {
    pub range: Range<u32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("vertex data has {0} floats, expected a multiple of 8")]
    RaggedVertexData(usize),
    #[error("{0} vertices do not form whole triangles")]
    PartialTriangle(usize),
}

/// Interleaved triangle-list geometry ready for upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    vertices: Vec<Vertex>,
    indices: Option<Vec<u32>>,
    sections: Vec<DrawSection>,
}

impl MeshData {
    /// Builds a non-indexed mesh from a flat `pos, normal, uv` float array.
    pub fn from_interleaved(data: &[f32]) -> Result<Self, MeshError> {
        if data.len() % FLOATS_PER_VERTEX != 0 {
            return Err(MeshError::RaggedVertexData(data.len()));
        }
        let vertices: Vec<Vertex> = data
            .chunks_exact(FLOATS_PER_VERTEX)
            .map(Vertex::from_slice)
            .collect();
        if vertices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(vertices.len()));
        }
        let sections = if vertices.is_empty() {
            Vec::new()
        } else {
            vec![DrawSection {
                range: 0..vertices.len() as u32,
            }]
        };
        Ok(Self {
            vertices,
            indices: None,
            sections,
        })
    }

    /// Generators build their index lists in bounds by construction.
    pub(crate) fn from_generated(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        sections: Vec<DrawSection>,
    ) -> Self {
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        debug_assert!(sections
            .iter()
            .all(|s| s.range.end as usize <= indices.len()));
        Self {
            vertices,
            indices: Some(indices),
            sections,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn sections(&self) -> &[DrawSection] {
        &self.sections
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Triangles issued by one full draw of the mesh.
    pub fn primitive_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| (section.range.end - section.range.start) as usize / 3)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_triangle_has_one_section() {
        let data = [
            0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0,
        ];
        let mesh = MeshData::from_interleaved(&data).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.primitive_count(), 1);
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.vertices()[2].uv, [0.0, 1.0]);
    }

    #[test]
    fn ragged_data_is_rejected() {
        let err = MeshData::from_interleaved(&[0.0; 12]).unwrap_err();
        assert_eq!(err, MeshError::RaggedVertexData(12));
        let err = MeshData::from_interleaved(&[0.0; 16]).unwrap_err();
        assert_eq!(err, MeshError::PartialTriangle(2));
    }

    #[test]
    fn vertex_is_eight_floats() {
        assert_eq!(
            std::mem::size_of::<Vertex>(),
            FLOATS_PER_VERTEX * std::mem::size_of::<f32>()
        );
    }
}
