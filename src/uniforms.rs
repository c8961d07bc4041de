//! Uniform blocks shared with the WGSL programs. Every field is padded to a
//! `vec4` so the Rust layout matches WGSL's uniform address space rules.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::lighting::{
    Attenuation, DirectionalLight, LightSet, PointLight, SpotLight, POINT_LIGHT_COUNT,
};
use crate::math;

/// Specular exponent used for every material.
pub const SHININESS: f32 = 32.0;

fn vec4(v: Vec3) -> [f32; 4] {
    v.extend(0.0).to_array()
}

fn attenuation4(att: &Attenuation) -> [f32; 4] {
    [att.constant, att.linear, att.quadratic, 0.0]
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DirLightUniform {
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl From<&DirectionalLight> for DirLightUniform {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            direction: vec4(light.direction),
            ambient: vec4(light.ambient),
            diffuse: vec4(light.diffuse),
            specular: vec4(light.specular),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub attenuation: [f32; 4],
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: vec4(light.position),
            ambient: vec4(light.ambient),
            diffuse: vec4(light.diffuse),
            specular: vec4(light.specular),
            attenuation: attenuation4(&light.attenuation),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpotLightUniform {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub attenuation: [f32; 4],
    /// `(cut_off, outer_cut_off, 0, 0)` as cosines.
    pub cutoff: [f32; 4],
}

impl From<&SpotLight> for SpotLightUniform {
    fn from(light: &SpotLight) -> Self {
        Self {
            position: vec4(light.position),
            direction: vec4(light.direction),
            ambient: vec4(light.ambient),
            diffuse: vec4(light.diffuse),
            specular: vec4(light.specular),
            attenuation: attenuation4(&light.attenuation),
            cutoff: [light.cut_off, light.outer_cut_off, 0.0, 0.0],
        }
    }
}

/// Bind group 0: camera matrices, the light rig and material constants.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GlobalUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub view_pos: [f32; 4],
    pub dir_light: DirLightUniform,
    pub point_lights: [PointLightUniform; POINT_LIGHT_COUNT],
    pub spot_light: SpotLightUniform,
    /// `x` holds the shininess.
    pub material: [f32; 4],
}

impl GlobalUniforms {
    pub fn new(projection: Mat4, view: Mat4, view_pos: Vec3, lights: &LightSet) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            view_pos: view_pos.extend(1.0).to_array(),
            dir_light: (&lights.directional).into(),
            point_lights: lights.points.each_ref().map(PointLightUniform::from),
            spot_light: (&lights.spot).into(),
            material: [SHININESS, 0.0, 0.0, 0.0],
        }
    }
}

/// Bind group 1: per-instance transforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
}

impl ObjectUniforms {
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: math::normal_matrix_3x4(model),
        }
    }
}
