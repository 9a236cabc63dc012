/// 网格到可绘制数据的转换
///
/// 把索引网格（每个角独立索引位置 / 法线 / 纹理坐标）展开成不带索引的
/// 交错顶点流，每个形状一个缓冲区。转换过程中：
///
/// 1. 决定是否完全重建法线；需要时先做平滑组划分，再做 group-aware 法线合成
/// 2. 逐面解析材质、纹理坐标、位置、法线，缺失数据按固定的回退规则处理
/// 3. 计算所有输出顶点的包围盒
///
/// 输入被假定已经由加载器校验过；越界索引属于调用约定被破坏，直接 panic。

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::attrib::{AttribPool, FaceCorner, Shape};
use super::bounds::BoundingBox;
use super::material::Materials;
use super::math_utils::{compute_face_normal, normalize};
use super::normals::{accumulate_group_normals, accumulate_vertex_normals, VertexNormalMap};
use super::smoothing::{has_smoothing_group, partition_by_smoothing_group};
use super::vertex::{DrawVertex, FLOATS_PER_FACE, FLOATS_PER_VERTEX};

/// 伪颜色中法线所占的权重，其余为漫反射颜色
const NORMAL_FACTOR: f32 = 0.2;
const DIFFUSE_FACTOR: f32 = 1.0 - NORMAL_FACTOR;

/// 法线重建策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalPolicy {
    /// 只有源文件完全没有法线时才重建
    #[default]
    Auto,
    /// 总是按平滑组重建全部法线
    Always,
}

impl NormalPolicy {
    /// 对给定的属性池是否需要完全重建法线
    pub fn should_regenerate(self, attrib: &AttribPool) -> bool {
        match self {
            NormalPolicy::Auto => !attrib.has_normals(),
            NormalPolicy::Always => true,
        }
    }
}

/// 一个形状的转换结果
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeBuffer {
    pub name: String,
    /// 每个面 3 个顶点
    pub vertices: Vec<DrawVertex>,
    /// 整个形状使用的材质 ID（第一个面的材质）
    pub material_id: usize,
}

impl ShapeBuffer {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// 缓冲区中的浮点数个数
    pub fn float_count(&self) -> usize {
        self.vertices.len() * FLOATS_PER_VERTEX
    }

    /// 三角形数量 = 浮点数 / 11 / 3
    pub fn triangle_count(&self) -> usize {
        self.float_count() / FLOATS_PER_FACE
    }

    /// 作为浮点数组查看
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// 作为字节数组查看，用于上传到 GPU
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// 整个网格的转换结果
#[derive(Debug, Clone)]
pub struct ConvertedMesh {
    pub shapes: Vec<ShapeBuffer>,
    pub bounds: BoundingBox,
    /// 是否走了平滑组划分 + 全部重建法线的路径
    pub regenerated_normals: bool,
}

impl ConvertedMesh {
    pub fn triangle_count(&self) -> usize {
        self.shapes.iter().map(ShapeBuffer::triangle_count).sum()
    }
}

/// 把网格转换成每个形状一个的交错顶点缓冲区
pub fn convert_mesh(
    attrib: &AttribPool,
    shapes: &[Shape],
    materials: &Materials,
    policy: NormalPolicy,
) -> ConvertedMesh {
    let regenerate = policy.should_regenerate(attrib);

    let partition;
    let (attrib, shapes) = if regenerate {
        info!("Regenerating all normals from smoothing groups");
        let mut part = partition_by_smoothing_group(attrib, shapes);
        accumulate_group_normals(&mut part.attrib, &part.shapes);
        debug!(
            shapes = part.shapes.len(),
            vertices = part.attrib.vertex_count(),
            "Smoothing group partition done"
        );
        partition = part;
        (&partition.attrib, partition.shapes.as_slice())
    } else {
        (attrib, shapes)
    };

    let mut bounds = BoundingBox::empty();
    let mut buffers = Vec::with_capacity(shapes.len());

    for (s, shape) in shapes.iter().enumerate() {
        let smooth_normals = if !regenerate && has_smoothing_group(shape) {
            debug!(shape = s, "Computing smoothing normals");
            Some(accumulate_vertex_normals(attrib, shape))
        } else {
            None
        };

        let buffer = convert_shape(attrib, shape, materials, smooth_normals.as_ref(), &mut bounds);
        info!(
            shape = s,
            name = %buffer.name,
            material_id = buffer.material_id,
            triangles = buffer.triangle_count(),
            "Converted shape"
        );
        buffers.push(buffer);
    }

    info!(bmin = ?bounds.min, bmax = ?bounds.max, "Mesh bounds");

    ConvertedMesh {
        shapes: buffers,
        bounds,
        regenerated_normals: regenerate,
    }
}

/// 转换单个形状
fn convert_shape(
    attrib: &AttribPool,
    shape: &Shape,
    materials: &Materials,
    smooth_normals: Option<&VertexNormalMap>,
    bounds: &mut BoundingBox,
) -> ShapeBuffer {
    let mut vertices = Vec::with_capacity(shape.corners.len());

    for f in 0..shape.face_count() {
        let face = shape.face(f);

        let material = materials.get(materials.resolve(shape.material_id(f)));
        let diffuse = material.diffuse;

        let texcoords = resolve_texcoords(attrib, face);

        let positions = [
            attrib.position(face[0].vertex),
            attrib.position(face[1].vertex),
            attrib.position(face[2].vertex),
        ];
        for p in positions {
            bounds.extend(p);
        }

        let normals = resolve_normals(attrib, face, &positions, smooth_normals);

        for k in 0..3 {
            vertices.push(DrawVertex::new(
                positions[k],
                normals[k],
                blend_color(normals[k], diffuse),
                texcoords[k],
            ));
        }
    }

    let material_id = if shape.has_material_ids() {
        materials.resolve(shape.material_id(0))
    } else {
        materials.default_id()
    };

    ShapeBuffer {
        name: shape.name.clone(),
        vertices,
        material_id,
    }
}

/// 三个角都有纹理坐标时取出并翻转 V，否则整个面用 (0, 0)
fn resolve_texcoords(attrib: &AttribPool, face: &[FaceCorner]) -> [[f32; 2]; 3] {
    if !attrib.has_texcoords() {
        return [[0.0; 2]; 3];
    }

    match (face[0].texcoord, face[1].texcoord, face[2].texcoord) {
        (Some(t0), Some(t1), Some(t2)) => [t0, t1, t2].map(|t| {
            let [u, v] = attrib.texcoord(t);
            [u, 1.0 - v]
        }),
        _ => [[0.0; 2]; 3],
    }
}

/// 按优先级解析三个角的法线
///
/// 1. 三个角都有法线索引时直接使用
/// 2. 否则三个顶点都能在平滑法线表中找到时使用平滑法线
/// 3. 否则三个角共用几何面法线
fn resolve_normals(
    attrib: &AttribPool,
    face: &[FaceCorner],
    positions: &[[f32; 3]; 3],
    smooth_normals: Option<&VertexNormalMap>,
) -> [[f32; 3]; 3] {
    if attrib.has_normals() {
        if let (Some(n0), Some(n1), Some(n2)) = (face[0].normal, face[1].normal, face[2].normal) {
            return [attrib.normal(n0), attrib.normal(n1), attrib.normal(n2)];
        }
    }

    if let Some(map) = smooth_normals {
        if let (Some(n0), Some(n1), Some(n2)) = (
            map.get(&face[0].vertex),
            map.get(&face[1].vertex),
            map.get(&face[2].vertex),
        ) {
            return [*n0, *n1, *n2];
        }
    }

    let n = compute_face_normal(positions[0], positions[1], positions[2]);
    [n; 3]
}

/// 法线与漫反射颜色混合成伪颜色，并从 [-1, 1] 映射到 [0, 1]
fn blend_color(normal: [f32; 3], diffuse: [f32; 3]) -> [f32; 3] {
    let c = normalize([
        normal[0] * NORMAL_FACTOR + diffuse[0] * DIFFUSE_FACTOR,
        normal[1] * NORMAL_FACTOR + diffuse[1] * DIFFUSE_FACTOR,
        normal[2] * NORMAL_FACTOR + diffuse[2] * DIFFUSE_FACTOR,
    ]);
    [c[0] * 0.5 + 0.5, c[1] * 0.5 + 0.5, c[2] * 0.5 + 0.5]
}
