//! Matrix helpers shared by the camera, the scene and the frame planner.
//!
//! Everything is expressed with `glam` types. Projections target wgpu clip
//! space, whose depth range is `[0, 1]`.

use glam::{Mat4, Vec3};

/// Degrees to radians.
pub fn radians(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Builds `translate * rotate(axis, angle) * scale`, applied to the identity
/// in that order.
///
/// A zero angle or a degenerate axis leaves the rotation out.
pub fn model_matrix(translation: Vec3, axis: Vec3, angle_degrees: f32, scale: Vec3) -> Mat4 {
    let rotation = match axis.try_normalize() {
        Some(axis) if angle_degrees != 0.0 => Mat4::from_axis_angle(axis, radians(angle_degrees)),
        _ => Mat4::IDENTITY,
    };
    Mat4::from_translation(translation) * rotation * Mat4::from_scale(scale)
}

/// Right-handed perspective projection.
pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(radians(fov_degrees), aspect.max(0.01), near, far)
}

/// Right-handed orthographic projection.
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::orthographic_rh(left, right, bottom, top, near, far)
}

/// Right-handed view matrix looking from `eye` towards `target`.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, target, up)
}

/// Packs a 3x3 normal matrix into three `vec4` columns for uniform upload.
pub fn normal_matrix_3x4(model: Mat4) -> [[f32; 4]; 3] {
    let normal = glam::Mat3::from_mat4(model).inverse().transpose();
    let cols = normal.to_cols_array();
    [
        [cols[0], cols[1], cols[2], 0.0],
        [cols[3], cols[4], cols[5], 0.0],
        [cols[6], cols[7], cols[8], 0.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_matrix_translates_after_scaling() {
        let model = model_matrix(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::Y,
            0.0,
            Vec3::new(2.0, 2.0, 2.0),
        );
        let point = model.transform_point3(Vec3::ONE);
        assert!((point - Vec3::new(3.0, 4.0, 5.0)).length() < 1e-6);
    }

    #[test]
    fn rotation_is_applied_before_translation() {
        let model = model_matrix(Vec3::new(10.0, 0.0, 0.0), Vec3::Y, 90.0, Vec3::ONE);
        let point = model.transform_point3(Vec3::X);
        assert!((point - Vec3::new(10.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn degenerate_axis_skips_rotation() {
        let model = model_matrix(Vec3::ZERO, Vec3::ZERO, 45.0, Vec3::ONE);
        assert_eq!(model, Mat4::IDENTITY);
    }

    #[test]
    fn normal_matrix_of_uniform_scale_keeps_direction() {
        let model = Mat4::from_scale(Vec3::splat(3.0));
        let packed = normal_matrix_3x4(model);
        assert!(packed[0][1].abs() < 1e-6);
        assert!(packed[0][0] > 0.0);
        assert_eq!(packed[2][3], 0.0);
    }
}
