use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::{DrawSection, MeshData, Vertex};

/// Generates a UV sphere of `radius` centred on the origin.
///
/// Stacks run from the north pole (stack 0) to the south pole. The pole rows
/// only emit the triangle that is not degenerate, so the mesh holds
/// `2 * sectors * (stacks - 1)` triangles.
pub fn sphere(radius: f32, sector_count: u32, stack_count: u32) -> MeshData {
    let sectors = sector_count.max(3);
    let stacks = stack_count.max(2);
    let inv_radius = if radius != 0.0 { 1.0 / radius } else { 0.0 };

    let mut vertices = Vec::with_capacity(((sectors + 1) * (stacks + 1)) as usize);
    for i in 0..=stacks {
        let stack_angle = FRAC_PI_2 - i as f32 * PI / stacks as f32;
        let xz = radius * stack_angle.cos();
        let y = radius * stack_angle.sin();
        for j in 0..=sectors {
            let sector_angle = j as f32 * TAU / sectors as f32;
            let position = [xz * sector_angle.cos(), y, xz * sector_angle.sin()];
            let normal = position.map(|c| c * inv_radius);
            let uv = [j as f32 / sectors as f32, i as f32 / stacks as f32];
            vertices.push(Vertex::new(position, normal, uv));
        }
    }

    let mut indices = Vec::with_capacity((6 * sectors * (stacks - 1)) as usize);
    for i in 0..stacks {
        let mut k1 = i * (sectors + 1);
        let mut k2 = k1 + sectors + 1;
        for _ in 0..sectors {
            if i != 0 {
                indices.extend_from_slice(&[k1, k2, k1 + 1]);
            }
            if i != stacks - 1 {
                indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
            }
            k1 += 1;
            k2 += 1;
        }
    }

    let sections = vec![DrawSection {
        range: 0..indices.len() as u32,
    }];
    MeshData::from_generated(vertices, indices, sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn juicer_sphere_counts() {
        let mesh = sphere(1.0, 20, 20);
        assert_eq!(mesh.vertex_count(), 21 * 21);
        assert_eq!(mesh.primitive_count(), 2 * 20 * 19);
        assert!(mesh.is_indexed());
        assert_eq!(mesh.sections().len(), 1);
    }

    #[test]
    fn poles_and_normals() {
        let mesh = sphere(2.0, 8, 4);
        let north = mesh.vertices()[0];
        assert!((north.position[1] - 2.0).abs() < 1e-5);
        assert_eq!(north.uv, [0.0, 0.0]);
        let south = mesh.vertices()[mesh.vertex_count() - 1];
        assert!((south.position[1] + 2.0).abs() < 1e-5);
        assert_eq!(south.uv, [1.0, 1.0]);
        for vertex in mesh.vertices() {
            let [x, y, z] = vertex.normal;
            assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn counts_are_clamped_to_minimums() {
        let mesh = sphere(1.0, 1, 1);
        assert_eq!(mesh.vertex_count(), 4 * 3);
        assert_eq!(mesh.primitive_count(), 2 * 3);
    }

    #[test]
    fn zero_radius_has_finite_normals() {
        let mesh = sphere(0.0, 4, 2);
        assert!(mesh
            .vertices()
            .iter()
            .all(|v| v.normal.iter().all(|c| c.is_finite())));
    }
}
