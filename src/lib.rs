//! Countertop: an interactive, lit kitchen-countertop scene.
//!
//! The crate is split so that everything up to the per-frame draw plan is
//! plain data and testable without a GPU. The `render` and `app` modules
//! bind that plan to wgpu and winit.

pub mod app;
pub mod camera;
pub mod config;
pub mod frame;
pub mod input;
pub mod lighting;
pub mod math;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod texture;
pub mod timing;
pub mod uniforms;

pub use app::{run, CountertopApp, InitError};
pub use camera::{Camera, Direction};
pub use config::{ConfigError, RuntimeConfig};
pub use frame::{DrawCall, FrameContext, FramePlan};
pub use input::{Action, InputState, KeyCode, MouseLatch, NamedKey};
pub use lighting::LightSet;
pub use mesh::{MeshData, MeshError, Vertex};
pub use render::Renderer;
pub use scene::{MeshKey, Scene, SceneInstance, TextureKey};
pub use texture::{TextureError, TextureImage};
pub use timing::FrameTimer;
pub use uniforms::{GlobalUniforms, ObjectUniforms};
