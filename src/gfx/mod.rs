//! 图形后端模块
//!
//! - `backend`：资源创建接口 [`GpuDevice`]，上层的网格上传和纹理缓存只依赖它
//! - `wgpu`：基于 wgpu 的设备和渲染器实现

pub mod backend;
pub mod wgpu;

pub use backend::GpuDevice;
