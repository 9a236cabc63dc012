/// 模型加载器模块
///
/// 提供统一的模型加载接口和具体格式的实现。
///
/// # 支持的格式
///
/// - **OBJ**: Wavefront OBJ 格式（使用 tobj crate）
///
/// # 使用示例
///
/// ```rust,no_run
/// use objview::geometry::loaders::load_mesh;
/// use std::path::Path;
///
/// let mesh = load_mesh(Path::new("model.obj"))?;
/// for warning in &mesh.warnings {
///     println!("WARN: {}", warning);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::attrib::{AttribPool, Shape};
use crate::geometry::material::Materials;
use std::path::{Path, PathBuf};

pub mod obj_loader;

// 重新导出加载器
pub use obj_loader::ObjLoader;

/// 加载器的输出：CPU 侧的索引网格
///
/// 已经过 [`LoadedMesh::validate`] 校验，之后的处理流程可以假定索引都有效。
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    pub attrib: AttribPool,
    pub shapes: Vec<Shape>,
    /// 末尾已附加默认材质
    pub materials: Materials,
    /// 非致命的加载警告
    pub warnings: Vec<String>,
    /// 模型文件所在目录，用于查找纹理
    pub base_dir: PathBuf,
}

impl LoadedMesh {
    pub fn triangle_count(&self) -> usize {
        self.shapes.iter().map(Shape::face_count).sum()
    }

    /// 验证网格数据的完整性
    pub fn validate(&self) -> std::result::Result<(), String> {
        let attrib = &self.attrib;

        if attrib.positions.len() % 3 != 0 {
            return Err(format!("顶点位置数据不完整: {} 个浮点数", attrib.positions.len()));
        }
        if attrib.normals.len() % 3 != 0 {
            return Err(format!("法线数据不完整: {} 个浮点数", attrib.normals.len()));
        }
        if attrib.texcoords.len() % 2 != 0 {
            return Err(format!("纹理坐标数据不完整: {} 个浮点数", attrib.texcoords.len()));
        }

        let (vertices, normals, texcoords) = (
            attrib.vertex_count(),
            attrib.normal_count(),
            attrib.texcoord_count(),
        );

        for shape in &self.shapes {
            if shape.corners.len() % 3 != 0 {
                return Err(format!("形状 '{}' 的角数量不是 3 的倍数", shape.name));
            }
            let faces = shape.face_count();
            if shape.smoothing_group_ids.len() != faces {
                return Err(format!(
                    "形状 '{}' 的平滑组数量 {} 与面数 {} 不一致",
                    shape.name,
                    shape.smoothing_group_ids.len(),
                    faces
                ));
            }
            if shape.has_material_ids() && shape.material_ids.len() != faces {
                return Err(format!(
                    "形状 '{}' 的材质数量 {} 与面数 {} 不一致",
                    shape.name,
                    shape.material_ids.len(),
                    faces
                ));
            }

            for corner in &shape.corners {
                if corner.vertex >= vertices {
                    return Err(format!(
                        "形状 '{}' 的顶点索引 {} 越界 (顶点数: {})",
                        shape.name, corner.vertex, vertices
                    ));
                }
                if corner.normal.is_some_and(|n| n >= normals) {
                    return Err(format!("形状 '{}' 的法线索引越界", shape.name));
                }
                if corner.texcoord.is_some_and(|t| t >= texcoords) {
                    return Err(format!("形状 '{}' 的纹理坐标索引越界", shape.name));
                }
            }
        }

        Ok(())
    }
}

/// 网格加载器 trait
///
/// 定义统一的加载接口，所有格式的加载器都实现此 trait。
/// 返回 CPU 侧的 `LoadedMesh`，不涉及 GPU 资源。
pub trait MeshLoader {
    /// 从文件路径加载网格
    ///
    /// # 错误
    ///
    /// - 文件不存在或无法读取
    /// - 文件格式错误或损坏
    /// - 数据验证失败
    fn load_from_file(path: &Path) -> Result<LoadedMesh>;

    /// 从内存数据加载网格
    ///
    /// 没有文件路径，外部材质库无法解析，只会记录一条警告。
    fn load_from_memory(data: &[u8]) -> Result<LoadedMesh>;

    /// 获取支持的文件扩展名列表（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];
}

/// 根据文件扩展名选择合适的加载器
pub fn load_mesh(path: &Path) -> Result<LoadedMesh> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| MeshLoadError::UnsupportedFormat("无法确定文件扩展名".to_string()))?;

    if ObjLoader::supported_extensions().contains(&extension.as_str()) {
        ObjLoader::load_from_file(path)
    } else {
        Err(MeshLoadError::UnsupportedFormat(format!("不支持的文件格式: .{}", extension)).into())
    }
}
