//! 渲染资源模块
//!
//! 与具体图形 API 无关的渲染侧数据：
//!
//! - `draw_object`：每个形状一个 GPU 顶点缓冲区
//! - `texture`：按名字缓存的漫反射纹理
//!
//! 真正的 wgpu 管线和每帧绘制在 `gfx::wgpu` 中。

pub mod draw_object;
pub mod texture;

pub use draw_object::{build_draw_objects, DrawObject};
pub use texture::{DecodedImage, TextureCache};
