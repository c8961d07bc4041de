//! Hand-modeled vertex arrays, interleaved as `position, normal, uv`.

/// Tapered grater body: four sloped walls, a bottom and a narrower top.
#[rustfmt::skip]
pub const GRATER: [f32; 288] = [
    // positions         normals            uv
     -0.5,  -0.5,  -0.5,   0.0,   0.2,  -1.0,   0.0,   0.0,
      0.5,  -0.5,  -0.5,   0.0,   0.2,  -1.0,   1.0,   0.0,
      0.3,   0.5,  -0.3,   0.0,   0.2,  -1.0,   0.8,   1.0,
      0.3,   0.5,  -0.3,   0.0,   0.2,  -1.0,   0.8,   1.0,
     -0.3,   0.5,  -0.3,   0.0,   0.2,  -1.0,   0.2,   1.0,
     -0.5,  -0.5,  -0.5,   0.0,   0.2,  -1.0,   0.0,   0.0,
     -0.5,  -0.5,   0.5,   0.0,   0.2,   1.0,   0.0,   0.0,
      0.5,  -0.5,   0.5,   0.0,   0.2,   1.0,   1.0,   0.0,
      0.3,   0.5,   0.3,   0.0,   0.2,   1.0,   0.8,   1.0,
      0.3,   0.5,   0.3,   0.0,   0.2,   1.0,   0.8,   1.0,
     -0.3,   0.5,   0.3,   0.0,   0.2,   1.0,   0.2,   1.0,
     -0.5,  -0.5,   0.5,   0.0,   0.2,   1.0,   0.0,   0.0,
     -0.3,   0.5,   0.3,  -1.0,   0.2,   0.0,   0.8,   2.0,
     -0.3,   0.5,  -0.3,  -1.0,   0.2,   0.0,   0.2,   2.0,
     -0.5,  -0.5,  -0.5,  -1.0,   0.2,   0.0,   0.0,   0.0,
     -0.5,  -0.5,  -0.5,  -1.0,   0.2,   0.0,   0.0,   0.0,
     -0.5,  -0.5,   0.5,  -1.0,   0.2,   0.0,   1.0,   0.0,
     -0.3,   0.5,   0.3,  -1.0,   0.2,   0.0,   0.8,   2.0,
      0.3,   0.5,   0.3,   1.0,   0.2,   0.0,   0.2,   2.0,
      0.3,   0.5,  -0.3,   1.0,   0.2,   0.0,   0.8,   2.0,
      0.5,  -0.5,  -0.5,   1.0,   0.2,   0.0,   1.0,   0.0,
      0.5,  -0.5,  -0.5,   1.0,   0.2,   0.0,   1.0,   0.0,
      0.5,  -0.5,   0.5,   1.0,   0.2,   0.0,   0.0,   0.0,
      0.3,   0.5,   0.3,   1.0,   0.2,   0.0,   0.2,   2.0,
     -0.5,  -0.5,  -0.5,   0.0,  -1.0,   0.0,   0.0,   0.0,
      0.5,  -0.5,  -0.5,   0.0,  -1.0,   0.0,   0.0,   0.0,
      0.5,  -0.5,   0.5,   0.0,  -1.0,   0.0,   0.0,   0.0,
      0.5,  -0.5,   0.5,   0.0,  -1.0,   0.0,   0.0,   0.0,
     -0.5,  -0.5,   0.5,   0.0,  -1.0,   0.0,   0.0,   0.0,
     -0.5,  -0.5,  -0.5,   0.0,  -1.0,   0.0,   0.0,   0.0,
     -0.3,   0.5,  -0.3,   0.0,   1.0,   0.0,   0.0,   0.0,
      0.3,   0.5,  -0.3,   0.0,   1.0,   0.0,   0.0,   0.0,
      0.3,   0.5,   0.3,   0.0,   1.0,   0.0,   0.0,   0.0,
      0.3,   0.5,   0.3,   0.0,   1.0,   0.0,   0.0,   0.0,
     -0.3,   0.5,   0.3,   0.0,   1.0,   0.0,   0.0,   0.0,
     -0.3,   0.5,  -0.3,   0.0,   1.0,   0.0,   0.0,   0.0,
];

/// Raised handle block sitting on the grater top.
#[rustfmt::skip]
pub const GRATER_HANDLE: [f32; 144] = [
    // positions         normals            uv
      0.3,   0.5,  -0.3,   1.0,   0.0,  -1.0,   0.0,   0.0,
      0.3,   0.5,   0.3,   1.0,   0.0,  -1.0,   1.0,   0.0,
      0.3,   0.7,   0.3,   1.0,   0.0,  -1.0,   1.0,   1.0,
      0.3,   0.5,  -0.3,   1.0,   0.0,  -1.0,   0.0,   0.0,
      0.3,   0.7,  -0.3,   1.0,   0.0,  -1.0,   0.0,   1.0,
      0.3,   0.7,   0.3,   1.0,   0.0,  -1.0,   1.0,   1.0,
     -0.3,   0.5,  -0.3,   1.0,   0.0,  -1.0,   0.0,   0.0,
     -0.3,   0.5,   0.3,   1.0,   0.0,  -1.0,   1.0,   0.0,
     -0.3,   0.7,   0.3,   1.0,   0.0,  -1.0,   1.0,   1.0,
     -0.3,   0.5,  -0.3,   1.0,   0.0,  -1.0,   0.0,   0.0,
     -0.3,   0.7,  -0.3,   1.0,   0.0,  -1.0,   0.0,   1.0,
     -0.3,   0.7,   0.3,   1.0,   0.0,  -1.0,   1.0,   1.0,
     -0.3,   0.7,  -0.3,   0.0,   1.0,  -0.0,   1.0,   0.0,
      0.3,   0.7,  -0.3,   0.0,   1.0,  -0.0,   1.0,   1.0,
      0.3,   0.7,   0.3,   0.0,   1.0,  -0.0,   0.0,   1.0,
      0.3,   0.7,   0.3,   0.0,   1.0,  -0.0,   0.0,   1.0,
     -0.3,   0.7,   0.3,   0.0,   1.0,  -0.0,   0.0,   0.0,
     -0.3,   0.7,  -0.3,   0.0,   1.0,  -0.0,   1.0,   0.0,
];

/// Ground mat quad at y = -0.5.
#[rustfmt::skip]
pub const MAT: [f32; 48] = [
    // positions         normals            uv
      4.0,  -0.5,  -4.0,   0.0,   1.0,   0.0,   1.0,   0.0,
      4.0,  -0.5,   4.0,   0.0,   1.0,   0.0,   1.0,   1.0,
     -4.0,  -0.5,   4.0,   0.0,   1.0,   0.0,   0.0,   1.0,
     -4.0,  -0.5,  -4.0,   0.0,   1.0,   0.0,   0.0,   0.0,
     -4.0,  -0.5,   4.0,   0.0,   1.0,   0.0,   0.0,   1.0,
      4.0,  -0.5,  -4.0,   0.0,   1.0,   0.0,   1.0,   0.0,
];

/// Unit cube centred on the origin.
#[rustfmt::skip]
pub const UNIT_CUBE: [f32; 288] = [
    // positions         normals            uv
     -0.5,  -0.5,  -0.5,   0.0,   0.0,  -1.0,   0.0,   0.0,
      0.5,  -0.5,  -0.5,   0.0,   0.0,  -1.0,   1.0,   0.0,
      0.5,   0.5,  -0.5,   0.0,   0.0,  -1.0,   1.0,   1.0,
      0.5,   0.5,  -0.5,   0.0,   0.0,  -1.0,   1.0,   1.0,
     -0.5,   0.5,  -0.5,   0.0,   0.0,  -1.0,   0.0,   1.0,
     -0.5,  -0.5,  -0.5,   0.0,   0.0,  -1.0,   0.0,   0.0,
     -0.5,  -0.5,   0.5,   0.0,   0.0,   1.0,   0.0,   0.0,
      0.5,  -0.5,   0.5,   0.0,   0.0,   1.0,   1.0,   0.0,
      0.5,   0.5,   0.5,   0.0,   0.0,   1.0,   1.0,   1.0,
      0.5,   0.5,   0.5,   0.0,   0.0,   1.0,   1.0,   1.0,
     -0.5,   0.5,   0.5,   0.0,   0.0,   1.0,   0.0,   1.0,
     -0.5,  -0.5,   0.5,   0.0,   0.0,   1.0,   0.0,   0.0,
     -0.5,   0.5,   0.5,  -1.0,   0.0,   0.0,   1.0,   1.0,
     -0.5,   0.5,  -0.5,  -1.0,   0.0,   0.0,   0.0,   1.0,
     -0.5,  -0.5,  -0.5,  -1.0,   0.0,   0.0,   0.0,   0.0,
     -0.5,  -0.5,  -0.5,  -1.0,   0.0,   0.0,   0.0,   0.0,
     -0.5,  -0.5,   0.5,  -1.0,   0.0,   0.0,   1.0,   0.0,
     -0.5,   0.5,   0.5,  -1.0,   0.0,   0.0,   1.0,   1.0,
      0.5,   0.5,   0.5,   1.0,   0.0,   0.0,   1.0,   1.0,
      0.5,   0.5,  -0.5,   1.0,   0.0,   0.0,   0.0,   1.0,
      0.5,  -0.5,  -0.5,   1.0,   0.0,   0.0,   0.0,   0.0,
      0.5,  -0.5,  -0.5,   1.0,   0.0,   0.0,   0.0,   0.0,
      0.5,  -0.5,   0.5,   1.0,   0.0,   0.0,   1.0,   0.0,
      0.5,   0.5,   0.5,   1.0,   0.0,   0.0,   1.0,   1.0,
     -0.5,  -0.5,  -0.5,   0.0,  -1.0,   0.0,   0.0,   1.0,
      0.5,  -0.5,  -0.5,   0.0,  -1.0,   0.0,   1.0,   1.0,
      0.5,  -0.5,   0.5,   0.0,  -1.0,   0.0,   1.0,   0.0,
      0.5,  -0.5,   0.5,   0.0,  -1.0,   0.0,   1.0,   0.0,
     -0.5,  -0.5,   0.5,   0.0,  -1.0,   0.0,   0.0,   0.0,
     -0.5,  -0.5,  -0.5,   0.0,  -1.0,   0.0,   0.0,   1.0,
     -0.5,   0.5,  -0.5,   0.0,   1.0,   0.0,   0.0,   1.0,
      0.5,   0.5,  -0.5,   0.0,   1.0,   0.0,   1.0,   1.0,
      0.5,   0.5,   0.5,   0.0,   1.0,   0.0,   1.0,   0.0,
      0.5,   0.5,   0.5,   0.0,   1.0,   0.0,   1.0,   0.0,
     -0.5,   0.5,   0.5,   0.0,   1.0,   0.0,   0.0,   0.0,
     -0.5,   0.5,  -0.5,   0.0,   1.0,   0.0,   0.0,   1.0,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshData;

    #[test]
    fn authored_arrays_form_whole_triangles() {
        let counts = [
            (&GRATER[..], 36),
            (&GRATER_HANDLE[..], 18),
            (&MAT[..], 6),
            (&UNIT_CUBE[..], 36),
        ];
        for (data, expected) in counts {
            let mesh = MeshData::from_interleaved(data).unwrap();
            assert_eq!(mesh.vertex_count(), expected);
            assert_eq!(mesh.primitive_count(), expected / 3);
        }
    }

    #[test]
    fn mat_lies_below_the_grater() {
        let mesh = MeshData::from_interleaved(&MAT).unwrap();
        assert!(mesh.vertices().iter().all(|v| v.position[1] == -0.5));
        assert!(mesh.vertices().iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn handle_sits_on_grater_top() {
        let mesh = MeshData::from_interleaved(&GRATER_HANDLE).unwrap();
        assert!(mesh
            .vertices()
            .iter()
            .all(|v| v.position[1] >= 0.5 && v.position[1] <= 0.7));
    }
}
