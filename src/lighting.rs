use glam::Vec3;

use crate::camera::Camera;

/// Distance falloff `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// Roughly a 50 unit range.
    pub const MEDIUM: Self = Self {
        constant: 1.0,
        linear: 0.09,
        quadratic: 0.032,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
}

impl PointLight {
    /// A light that contributes nothing but keeps its slot in the block.
    pub fn disabled(position: Vec3) -> Self {
        Self {
            position,
            ambient: Vec3::ZERO,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            attenuation: Attenuation::MEDIUM,
        }
    }
}

/// Cone light; cut-offs are stored as cosines of the half angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
    pub cut_off: f32,
    pub outer_cut_off: f32,
}

pub const POINT_LIGHT_COUNT: usize = 4;

pub const POINT_LIGHT_POSITIONS: [Vec3; POINT_LIGHT_COUNT] = [
    Vec3::new(1.0, 2.0, 1.0),
    Vec3::new(-2.0, 2.0, 2.0),
    Vec3::new(-4.0, 2.0, -12.0),
    Vec3::new(0.0, 0.0, -3.0),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSet {
    pub directional: DirectionalLight,
    pub points: [PointLight; POINT_LIGHT_COUNT],
    pub spot: SpotLight,
}

impl LightSet {
    /// The countertop lighting rig. The spotlight rides on the camera but is
    /// dark, as are the last two point lights.
    pub fn authored(camera: &Camera) -> Self {
        let warm = |position| PointLight {
            position,
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::new(0.5, 0.5, 0.2),
            specular: Vec3::new(0.5, 0.5, 0.2),
            attenuation: Attenuation::MEDIUM,
        };
        Self {
            directional: DirectionalLight {
                direction: Vec3::new(0.0, -1.0, 0.0),
                ambient: Vec3::splat(0.5),
                diffuse: Vec3::splat(1.0),
                specular: Vec3::splat(0.5),
            },
            points: [
                warm(POINT_LIGHT_POSITIONS[0]),
                warm(POINT_LIGHT_POSITIONS[1]),
                PointLight::disabled(POINT_LIGHT_POSITIONS[2]),
                PointLight::disabled(POINT_LIGHT_POSITIONS[3]),
            ],
            spot: SpotLight {
                position: camera.position(),
                direction: camera.front(),
                ambient: Vec3::ZERO,
                diffuse: Vec3::ZERO,
                specular: Vec3::ZERO,
                attenuation: Attenuation::MEDIUM,
                cut_off: 12.5f32.to_radians().cos(),
                outer_cut_off: 15.0f32.to_radians().cos(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authored_rig_matches_countertop() {
        let camera = Camera::default();
        let lights = LightSet::authored(&camera);
        assert_eq!(lights.directional.direction, Vec3::NEG_Y);
        assert_eq!(lights.points[0].diffuse, Vec3::new(0.5, 0.5, 0.2));
        assert_eq!(lights.points[1].specular, Vec3::new(0.5, 0.5, 0.2));
        assert_eq!(lights.points[2], PointLight::disabled(POINT_LIGHT_POSITIONS[2]));
        assert_eq!(lights.points[3].ambient, Vec3::ZERO);
        assert_eq!(lights.points[2].position, Vec3::new(-4.0, 2.0, -12.0));
        assert_eq!(lights.spot.position, camera.position());
        assert_eq!(lights.spot.direction, camera.front());
        assert!(lights.spot.cut_off > lights.spot.outer_cut_off);
        assert!((lights.spot.cut_off - 0.976_296).abs() < 1e-5);
    }
}
