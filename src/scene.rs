use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};

use crate::math;
use crate::mesh::{authored, sphere, Cylinder, MeshData, MeshError};

/// Meshes the countertop scene is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeshKey {
    Grater,
    GraterHandle,
    Mat,
    UnitCube,
    Juicer,
    SaltCylinder,
}

impl MeshKey {
    pub const ALL: [MeshKey; 6] = [
        MeshKey::Grater,
        MeshKey::GraterHandle,
        MeshKey::Mat,
        MeshKey::UnitCube,
        MeshKey::Juicer,
        MeshKey::SaltCylinder,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MeshKey::Grater => "grater",
            MeshKey::GraterHandle => "grater-handle",
            MeshKey::Mat => "mat",
            MeshKey::UnitCube => "unit-cube",
            MeshKey::Juicer => "juicer",
            MeshKey::SaltCylinder => "salt-cylinder",
        }
    }

    /// Produces the geometry behind this key.
    pub fn build(self) -> Result<MeshData, MeshError> {
        match self {
            MeshKey::Grater => MeshData::from_interleaved(&authored::GRATER),
            MeshKey::GraterHandle => MeshData::from_interleaved(&authored::GRATER_HANDLE),
            MeshKey::Mat => MeshData::from_interleaved(&authored::MAT),
            MeshKey::UnitCube => MeshData::from_interleaved(&authored::UNIT_CUBE),
            MeshKey::Juicer => Ok(sphere(1.0, 20, 20)),
            MeshKey::SaltCylinder => Ok(Cylinder::new(2.0, 20, 3.0).build()),
        }
    }
}

/// Image files the scene samples, one per material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureKey {
    CheeseGrater,
    BlackPlastic,
    GrayVinyl,
    Flour,
    Juicer,
    Lid,
    Salt,
}

impl TextureKey {
    pub const ALL: [TextureKey; 7] = [
        TextureKey::CheeseGrater,
        TextureKey::BlackPlastic,
        TextureKey::GrayVinyl,
        TextureKey::Flour,
        TextureKey::Juicer,
        TextureKey::Lid,
        TextureKey::Salt,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TextureKey::CheeseGrater => "cheesegrater.png",
            TextureKey::BlackPlastic => "BlackPlastic.png",
            TextureKey::GrayVinyl => "GrayVinyl.png",
            TextureKey::Flour => "FlourTexture.png",
            TextureKey::Juicer => "JuicerTexture.png",
            TextureKey::Lid => "LidTexture.png",
            TextureKey::Salt => "SaltTexture.png",
        }
    }

    pub fn path_in(self, assets: &Path) -> PathBuf {
        assets.join(self.file_name())
    }
}

/// One drawable object: a mesh, its material textures and a transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneInstance {
    pub name: &'static str,
    pub mesh: MeshKey,
    pub diffuse: TextureKey,
    pub specular: TextureKey,
    pub translation: Vec3,
    pub scale: Vec3,
    pub rotation_axis: Vec3,
    pub rotation_angle: f32,
}

impl SceneInstance {
    fn new(name: &'static str, mesh: MeshKey, texture: TextureKey) -> Self {
        Self {
            name,
            mesh,
            diffuse: texture,
            specular: texture,
            translation: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation_axis: Vec3::new(1.0, 0.3, 0.5),
            rotation_angle: 0.0,
        }
    }

    fn at(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    fn scaled(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    fn rotated(mut self, axis: Vec3, angle: f32) -> Self {
        self.rotation_axis = axis;
        self.rotation_angle = angle;
        self
    }

    /// `translate * rotate * scale` in world units, angle in degrees.
    pub fn model_matrix(&self) -> Mat4 {
        math::model_matrix(
            self.translation,
            self.rotation_axis,
            self.rotation_angle,
            self.scale,
        )
    }
}

/// The authored, flat instance list. Declaration order is draw order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub instances: Vec<SceneInstance>,
}

impl Scene {
    pub fn authored() -> Self {
        let grater_scale = Vec3::new(2.0, 3.0, 1.0);
        let salt_position = Vec3::new(-5.5, 0.1, 1.5);
        let instances = vec![
            SceneInstance::new("grater-body", MeshKey::Grater, TextureKey::CheeseGrater)
                .scaled(grater_scale),
            SceneInstance::new("grater-handle", MeshKey::GraterHandle, TextureKey::BlackPlastic)
                .scaled(grater_scale),
            SceneInstance::new("mat", MeshKey::Mat, TextureKey::GrayVinyl).scaled(grater_scale),
            SceneInstance::new("flour-box", MeshKey::UnitCube, TextureKey::Flour)
                .at(Vec3::new(-3.0, -0.5, -1.0))
                .scaled(Vec3::splat(2.5))
                .rotated(Vec3::Y, 40.0),
            SceneInstance::new("lid", MeshKey::UnitCube, TextureKey::Lid)
                .at(Vec3::new(-3.0, 1.0, -1.0))
                .scaled(Vec3::new(2.65, 0.5, 2.65))
                .rotated(Vec3::Y, 40.0),
            SceneInstance::new("juicer-bowl", MeshKey::Juicer, TextureKey::Juicer)
                .at(Vec3::new(2.0, -1.5, 1.0)),
            SceneInstance::new("juicer-handle", MeshKey::UnitCube, TextureKey::Juicer)
                .at(Vec3::new(4.5, -1.3, 1.0))
                .scaled(Vec3::new(4.0, 0.5, 0.3)),
            SceneInstance::new("salt-body", MeshKey::SaltCylinder, TextureKey::Salt)
                .at(salt_position)
                .scaled(Vec3::new(0.5, 0.8, 0.5)),
            SceneInstance::new("salt-top", MeshKey::SaltCylinder, TextureKey::Lid)
                .at(salt_position)
                .scaled(Vec3::new(0.49, 1.0, 0.49)),
        ];
        Self { instances }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn authored_scene_order() {
        let scene = Scene::authored();
        let names: Vec<_> = scene.instances.iter().map(|i| i.name).collect();
        assert_eq!(
            names,
            [
                "grater-body",
                "grater-handle",
                "mat",
                "flour-box",
                "lid",
                "juicer-bowl",
                "juicer-handle",
                "salt-body",
                "salt-top",
            ]
        );
    }

    #[test]
    fn every_mesh_and_texture_is_used() {
        let scene = Scene::authored();
        let meshes: BTreeSet<_> = scene.instances.iter().map(|i| i.mesh).collect();
        let textures: BTreeSet<_> = scene
            .instances
            .iter()
            .flat_map(|i| [i.diffuse, i.specular])
            .collect();
        assert_eq!(meshes.len(), MeshKey::ALL.len());
        assert_eq!(textures.len(), TextureKey::ALL.len());
    }

    #[test]
    fn flour_box_is_turned_forty_degrees() {
        let scene = Scene::authored();
        let flour = &scene.instances[3];
        assert_eq!(flour.rotation_axis, Vec3::Y);
        assert_eq!(flour.rotation_angle, 40.0);
        let centre = flour.model_matrix().transform_point3(Vec3::ZERO);
        assert!((centre - Vec3::new(-3.0, -0.5, -1.0)).length() < 1e-6);
    }

    #[test]
    fn grater_parts_share_a_transform() {
        let scene = Scene::authored();
        let body = scene.instances[0].model_matrix();
        assert_eq!(scene.instances[1].model_matrix(), body);
        assert_eq!(scene.instances[2].model_matrix(), body);
        assert_eq!(body, Mat4::from_scale(Vec3::new(2.0, 3.0, 1.0)));
    }

    #[test]
    fn every_mesh_key_builds() {
        for key in MeshKey::ALL {
            let mesh = key.build().unwrap();
            assert!(mesh.primitive_count() > 0, "{} is empty", key.label());
        }
    }

    #[test]
    fn texture_paths_resolve_under_assets() {
        let path = TextureKey::Lid.path_in(Path::new("assets"));
        assert_eq!(path, Path::new("assets").join("LidTexture.png"));
    }
}
