//! GPU side of the viewer: uploads, shaders and the frame renderer.

pub mod gpu_mesh;
pub mod gpu_texture;
pub mod renderer;
pub mod resources;
pub mod shader;

pub use gpu_mesh::GpuMesh;
pub use gpu_texture::GpuTexture;
pub use renderer::Renderer;
pub use resources::ResourceTable;
