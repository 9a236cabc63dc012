//! objview - OBJ 模型查看器
//!
//! 加载 Wavefront OBJ 模型（含 MTL 材质和漫反射贴图），在模型没有法线时
//! 按平滑组重建法线，然后用 wgpu 交互式地显示：轨迹球旋转、平移、推拉、
//! 线框叠加以及背面剔除开关。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（数学、日志、配置、错误处理、轨迹球、查看器状态）
//! - `geometry`: 几何处理模块（OBJ 加载、平滑组划分、法线合成、网格转换）
//! - `renderer`: 渲染资源（可绘制对象、纹理缓存）
//! - `gfx`: 图形后端抽象层和 wgpu 实现
//!
//! # 使用示例
//!
//! ```no_run
//! use objview::geometry::convert::{convert_mesh, NormalPolicy};
//! use objview::geometry::loaders::load_mesh;
//! use std::path::Path;
//!
//! let mesh = load_mesh(Path::new("cube.obj"))?;
//! let converted = convert_mesh(&mesh.attrib, &mesh.shapes, &mesh.materials, NormalPolicy::Auto);
//! println!("{} triangles", converted.triangle_count());
//! # Ok::<(), objview::core::ViewerError>(())
//! ```

pub mod core;
pub mod geometry;
pub mod gfx;
pub mod renderer;
