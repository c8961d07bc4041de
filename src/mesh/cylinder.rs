use std::f32::consts::TAU;

use super::{DrawSection, MeshData, Vertex};

/// Capped cylinder centred on the origin with its axis along +Y.
///
/// The side wall is laid out as a strip of `2 * (slices + 1)` vertices and
/// each cap as a fan around its centre; both are emitted as triangle lists.
/// Every enabled part becomes its own draw section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub radius: f32,
    pub slices: u32,
    pub height: f32,
    pub top: bool,
    pub bottom: bool,
    pub side: bool,
}

impl Cylinder {
    pub fn new(radius: f32, slices: u32, height: f32) -> Self {
        Self {
            radius,
            slices,
            height,
            top: true,
            bottom: true,
            side: true,
        }
    }

    pub fn with_top(mut self, enabled: bool) -> Self {
        self.top = enabled;
        self
    }

    pub fn with_bottom(mut self, enabled: bool) -> Self {
        self.bottom = enabled;
        self
    }

    pub fn with_side(mut self, enabled: bool) -> Self {
        self.side = enabled;
        self
    }

    pub fn build(&self) -> MeshData {
        let slices = self.slices.max(3);
        let half = self.height * 0.5;
        let mut builder = Builder::default();

        if self.side {
            builder.section(|vertices, indices| {
                let base = vertices.len() as u32;
                for j in 0..=slices {
                    let (sin, cos) = (j as f32 * TAU / slices as f32).sin_cos();
                    let u = j as f32 / slices as f32;
                    let (x, z) = (self.radius * cos, self.radius * sin);
                    vertices.push(Vertex::new([x, half, z], [cos, 0.0, sin], [u, 1.0]));
                    vertices.push(Vertex::new([x, -half, z], [cos, 0.0, sin], [u, 0.0]));
                }
                for j in 0..slices {
                    let top = base + 2 * j;
                    let bottom = top + 1;
                    let next_top = top + 2;
                    let next_bottom = top + 3;
                    indices.extend_from_slice(&[top, next_top, bottom]);
                    indices.extend_from_slice(&[next_top, next_bottom, bottom]);
                }
            });
        }
        if self.top {
            builder.section(|vertices, indices| {
                cap(vertices, indices, self.radius, slices, half, true)
            });
        }
        if self.bottom {
            builder.section(|vertices, indices| {
                cap(vertices, indices, self.radius, slices, -half, false)
            });
        }

        MeshData::from_generated(builder.vertices, builder.indices, builder.sections)
    }
}

fn cap(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    radius: f32,
    slices: u32,
    y: f32,
    facing_up: bool,
) {
    let normal = if facing_up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let centre = vertices.len() as u32;
    vertices.push(Vertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));
    for j in 0..=slices {
        let (sin, cos) = (j as f32 * TAU / slices as f32).sin_cos();
        vertices.push(Vertex::new(
            [radius * cos, y, radius * sin],
            normal,
            [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
        ));
    }
    for j in 0..slices {
        let rim = centre + 1 + j;
        // counter-clockwise when seen from outside the cylinder
        if facing_up {
            indices.extend_from_slice(&[centre, rim + 1, rim]);
        } else {
            indices.extend_from_slice(&[centre, rim, rim + 1]);
        }
    }
}

#[derive(Default)]
struct Builder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    sections: Vec<DrawSection>,
}

impl Builder {
    fn section(&mut self, emit: impl FnOnce(&mut Vec<Vertex>, &mut Vec<u32>)) {
        let start = self.indices.len() as u32;
        emit(&mut self.vertices, &mut self.indices);
        let end = self.indices.len() as u32;
        self.sections.push(DrawSection { range: start..end });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salt_cylinder_has_three_sections() {
        let mesh = Cylinder::new(2.0, 20, 3.0).build();
        assert_eq!(mesh.sections().len(), 3);
        assert_eq!(mesh.vertex_count(), 2 * 21 + 2 * 22);
        assert_eq!(mesh.primitive_count(), 2 * 20 + 20 + 20);
        let side = &mesh.sections()[0];
        assert_eq!(side.range, 0..120);
    }

    #[test]
    fn only_requested_sections_are_emitted() {
        let mesh = Cylinder::new(1.0, 8, 2.0)
            .with_side(false)
            .with_bottom(false)
            .build();
        assert_eq!(mesh.sections().len(), 1);
        assert_eq!(mesh.vertex_count(), 10);
        assert!(mesh.vertices().iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(mesh.vertices().iter().all(|v| v.position[1] == 1.0));
    }

    #[test]
    fn side_normals_are_radial() {
        let mesh = Cylinder::new(2.0, 12, 3.0).with_top(false).with_bottom(false).build();
        for vertex in mesh.vertices() {
            let [x, _, z] = vertex.position;
            let [nx, ny, nz] = vertex.normal;
            assert_eq!(ny, 0.0);
            assert!((x / 2.0 - nx).abs() < 1e-5);
            assert!((z / 2.0 - nz).abs() < 1e-5);
            assert!(vertex.position[1].abs() == 1.5);
        }
    }

    #[test]
    fn empty_cylinder_draws_nothing() {
        let mesh = Cylinder::new(1.0, 8, 1.0)
            .with_top(false)
            .with_bottom(false)
            .with_side(false)
            .build();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.primitive_count(), 0);
    }
}
