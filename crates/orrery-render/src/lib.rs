//! wgpu rendering foundation: device and surface management, the shared
//! camera uniform and binding, pipeline helpers, depth buffer, frame
//! encoding, and texture upload.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod surface;
pub mod texture;

pub use buffer::{MeshBuffer, MeshVertex, create_uniform_buffer};
pub use camera::{Camera, CameraUniform};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use pipeline::{
    ADDITIVE_BLENDING, CameraBinding, DepthMode, PipelineDesc, create_pipeline, create_shader,
    sampler_entry, texture_entry, uniform_entry,
};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};
pub use texture::{GpuTexture, ImageData, TextureError};
