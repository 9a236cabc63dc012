//! 可绘制对象
//!
//! 每个形状转换后得到一个 `DrawObject`：拥有 GPU 顶点缓冲区、三角形数量和材质 ID。
//! 缓冲区类型由设备决定，drop 时释放对应的 GPU 资源。

use tracing::debug;

use crate::geometry::convert::{ConvertedMesh, ShapeBuffer};
use crate::gfx::backend::GpuDevice;

/// 一个形状的 GPU 侧表示
#[derive(Debug)]
pub struct DrawObject<B> {
    pub name: String,
    /// 顶点缓冲区；形状没有产生任何顶点时为 `None`
    pub buffer: Option<B>,
    pub triangle_count: usize,
    pub material_id: usize,
}

impl<B> DrawObject<B> {
    /// 上传一个形状的顶点数据
    ///
    /// 空形状不会创建缓冲区。
    pub fn upload<D>(device: &D, shape: &ShapeBuffer) -> Self
    where
        D: GpuDevice<Buffer = B>,
    {
        let buffer = if shape.is_empty() {
            None
        } else {
            let label = format!("Vertex Buffer [{}]", shape.name);
            Some(device.create_vertex_buffer(&label, shape.as_bytes()))
        };

        Self {
            name: shape.name.clone(),
            buffer,
            triangle_count: shape.triangle_count(),
            material_id: shape.material_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_none()
    }

    /// 绘制时使用的顶点数
    pub fn vertex_count(&self) -> u32 {
        (self.triangle_count * 3) as u32
    }
}

/// 为转换结果中的每个形状创建一个可绘制对象
pub fn build_draw_objects<D: GpuDevice>(device: &D, mesh: &ConvertedMesh) -> Vec<DrawObject<D::Buffer>> {
    let objects: Vec<_> = mesh
        .shapes
        .iter()
        .map(|shape| DrawObject::upload(device, shape))
        .collect();

    debug!(
        backend = device.backend_name(),
        objects = objects.len(),
        empty = objects.iter().filter(|o| o.is_empty()).count(),
        "Uploaded draw objects"
    );

    objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bounds::BoundingBox;
    use crate::geometry::vertex::DrawVertex;
    use crate::gfx::backend::testing::CountingDevice;

    fn shape(name: &str, triangles: usize, material_id: usize) -> ShapeBuffer {
        ShapeBuffer {
            name: name.to_string(),
            vertices: vec![DrawVertex::default(); triangles * 3],
            material_id,
        }
    }

    #[test]
    fn test_build_draw_objects() {
        let mesh = ConvertedMesh {
            shapes: vec![shape("a", 2, 0), shape("empty", 0, 1), shape("b", 5, 1)],
            bounds: BoundingBox::empty(),
            regenerated_normals: false,
        };
        let device = CountingDevice::default();

        let objects = build_draw_objects(&device, &mesh);

        assert_eq!(objects.len(), 3);
        assert_eq!(device.buffers.borrow().len(), 2);

        assert_eq!(objects[0].triangle_count, 2);
        assert_eq!(objects[0].vertex_count(), 6);
        assert_eq!(objects[0].buffer.as_ref().map(|b| b.len), Some(2 * 3 * 44));

        assert!(objects[1].is_empty());
        assert_eq!(objects[1].triangle_count, 0);
        assert_eq!(objects[1].material_id, 1);

        assert_eq!(objects[2].triangle_count, 5);
        assert_eq!(objects[2].name, "b");
    }
}
