/// 绘制顶点定义模块
///
/// 转换器输出的交错顶点格式，直接作为 GPU 顶点缓冲区的内容。

use bytemuck::{Pod, Zeroable};

/// 每个顶点的浮点数个数
pub const FLOATS_PER_VERTEX: usize = 11;

/// 每个三角形的浮点数个数
pub const FLOATS_PER_FACE: usize = 3 * FLOATS_PER_VERTEX;

/// 交错的绘制顶点
///
/// 内存布局与GPU兼容，使用 `#[repr(C)]` 保证顺序和对齐。
///
/// # 内存布局
///
/// - position: 12 bytes (3 * f32)
/// - normal: 12 bytes (3 * f32)
/// - color: 12 bytes (3 * f32)
/// - texcoord: 8 bytes (2 * f32)
/// - **总计**: 44 bytes
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawVertex {
    /// 顶点位置 (x, y, z)
    pub position: [f32; 3],

    /// 法线向量 (nx, ny, nz)
    pub normal: [f32; 3],

    /// 由法线和漫反射颜色混合出的伪颜色，范围 [0, 1]
    pub color: [f32; 3],

    /// 纹理坐标 (u, v)，V 轴已翻转
    pub texcoord: [f32; 2],
}

impl DrawVertex {
    #[inline]
    pub fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 3], texcoord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            color,
            texcoord,
        }
    }

    /// wgpu 顶点缓冲区布局
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x3,
            3 => Float32x2,
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<DrawVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}
