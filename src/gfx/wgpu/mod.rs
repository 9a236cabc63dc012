//! wgpu 图形后端实现
//!
//! wgpu 是一个跨平台的图形 API，可以在 Vulkan、Metal、DirectX 12、OpenGL 等多种后端上运行。
//!
//! # 模块结构
//!
//! - `backend` - WgpuBackend 结构（设备初始化和管理，实现 `GpuDevice`）
//! - `renderer` - Renderer 结构（管线、绑定组和每帧绘制）

mod backend;
mod renderer;

pub use backend::{GpuTexture, WgpuBackend, TEXTURE_FORMAT};
pub use renderer::Renderer;
