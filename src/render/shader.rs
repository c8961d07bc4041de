use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{error, info};

/// Phong shading with one directional light, four point lights and a spot
/// light. Bind groups: 0 globals, 1 object, 2 material.
pub const LIGHTING_SHADER: &str = r#"
struct DirLight {
    direction: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
}

struct PointLight {
    position: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
    attenuation: vec4<f32>,
}

struct SpotLight {
    position: vec4<f32>,
    direction: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
    attenuation: vec4<f32>,
    cutoff: vec4<f32>,
}

struct Globals {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    view_pos: vec4<f32>,
    dir_light: DirLight,
    point_lights: array<PointLight, 4>,
    spot_light: SpotLight,
    material: vec4<f32>,
}

struct Object {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var<uniform> object: Object;

@group(2) @binding(0)
var diffuse_map: texture_2d<f32>;
@group(2) @binding(1)
var diffuse_sampler: sampler;
@group(2) @binding(2)
var specular_map: texture_2d<f32>;
@group(2) @binding(3)
var specular_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) frag_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = object.model * vec4<f32>(input.position, 1.0);
    out.frag_pos = world.xyz;
    out.normal = mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz
    ) * input.normal;
    out.uv = input.uv;
    out.clip_position = globals.projection * globals.view * world;
    return out;
}

struct Surface {
    normal: vec3<f32>,
    view_dir: vec3<f32>,
    diffuse: vec3<f32>,
    specular: vec3<f32>,
}

fn specular_term(surface: Surface, light_dir: vec3<f32>) -> f32 {
    let reflect_dir = reflect(-light_dir, surface.normal);
    return pow(max(dot(surface.view_dir, reflect_dir), 0.0), globals.material.x);
}

fn attenuate(attenuation: vec4<f32>, distance: f32) -> f32 {
    return 1.0 / (attenuation.x + attenuation.y * distance + attenuation.z * distance * distance);
}

fn directional(light: DirLight, surface: Surface) -> vec3<f32> {
    let light_dir = normalize(-light.direction.xyz);
    let diff = max(dot(surface.normal, light_dir), 0.0);
    let spec = specular_term(surface, light_dir);
    return light.ambient.xyz * surface.diffuse
        + light.diffuse.xyz * diff * surface.diffuse
        + light.specular.xyz * spec * surface.specular;
}

fn point(light: PointLight, surface: Surface, frag_pos: vec3<f32>) -> vec3<f32> {
    let light_dir = normalize(light.position.xyz - frag_pos);
    let diff = max(dot(surface.normal, light_dir), 0.0);
    let spec = specular_term(surface, light_dir);
    let falloff = attenuate(light.attenuation, length(light.position.xyz - frag_pos));
    return (light.ambient.xyz * surface.diffuse
        + light.diffuse.xyz * diff * surface.diffuse
        + light.specular.xyz * spec * surface.specular) * falloff;
}

fn spot(light: SpotLight, surface: Surface, frag_pos: vec3<f32>) -> vec3<f32> {
    let light_dir = normalize(light.position.xyz - frag_pos);
    let diff = max(dot(surface.normal, light_dir), 0.0);
    let spec = specular_term(surface, light_dir);
    let falloff = attenuate(light.attenuation, length(light.position.xyz - frag_pos));
    let theta = dot(light_dir, normalize(-light.direction.xyz));
    let epsilon = light.cutoff.x - light.cutoff.y;
    let intensity = clamp((theta - light.cutoff.y) / epsilon, 0.0, 1.0);
    return (light.ambient.xyz * surface.diffuse
        + light.diffuse.xyz * diff * surface.diffuse * intensity
        + light.specular.xyz * spec * surface.specular * intensity) * falloff;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    var surface: Surface;
    surface.normal = normalize(input.normal);
    surface.view_dir = normalize(globals.view_pos.xyz - input.frag_pos);
    surface.diffuse = textureSample(diffuse_map, diffuse_sampler, input.uv).rgb;
    surface.specular = textureSample(specular_map, specular_sampler, input.uv).rgb;

    var result = directional(globals.dir_light, surface);
    for (var i = 0u; i < 4u; i = i + 1u) {
        result = result + point(globals.point_lights[i], surface, input.frag_pos);
    }
    result = result + spot(globals.spot_light, surface, input.frag_pos);
    return vec4<f32>(result, 1.0);
}
"#;

/// Unlit white cubes marking the point lights.
pub const LIGHT_MARKER_SHADER: &str = r#"
struct Camera {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
}

struct Object {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
}

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0)
var<uniform> object: Object;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return camera.projection * camera.view * object.model * vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;

pub fn builtin_module(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

/// The lighting program, read from `override_path` when given. A file that
/// cannot be read or fails validation is reported and the built-in program
/// is used instead.
pub fn lighting_module(device: &wgpu::Device, override_path: Option<&Path>) -> wgpu::ShaderModule {
    if let Some(path) = override_path {
        match load_override(device, path) {
            Ok(module) => {
                info!("using lighting shader {}", path.display());
                return module;
            }
            Err(err) => error!("{err:#}; falling back to the built-in lighting shader"),
        }
    }
    builtin_module(device, "lighting-shader", LIGHTING_SHADER)
}

fn load_override(device: &wgpu::Device, path: &Path) -> Result<wgpu::ShaderModule> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read shader {}", path.display()))?;
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = builtin_module(device, "lighting-shader-override", &source);
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        bail!("shader {} failed to compile: {err}", path.display());
    }
    Ok(module)
}
