/// 几何体加载和处理模块
///
/// 加载 OBJ 模型，按需重建法线，并把索引网格转换成可直接上传到 GPU 的交错顶点流。
///
/// # 模块结构
///
/// - `attrib`: 顶点属性池、面角索引、形状
/// - `material`: 材质与默认材质
/// - `bounds`: 轴对齐包围盒
/// - `math_utils`: 几何数学工具（面法线、叉乘、归一化）
/// - `smoothing`: 平滑组划分
/// - `normals`: 法线合成（legacy / group-aware）
/// - `vertex`: 绘制顶点定义
/// - `convert`: 网格到可绘制数据的转换
/// - `loaders`: 各种格式的模型加载器
///
/// # 架构设计
///
/// ```text
/// 文件 (OBJ + MTL)
///     ↓
/// Loader (ObjLoader)
///     ↓
/// LoadedMesh (属性池 + 形状 + 材质)
///     ↓ 没有法线时：平滑组划分 + 法线合成
/// convert_mesh
///     ↓
/// ConvertedMesh (每个形状一个交错顶点缓冲区 + 包围盒)
///     ↓
/// Renderer (上传到GPU)
/// ```
///
/// # 使用示例
///
/// ```rust,no_run
/// use objview::geometry::convert::{convert_mesh, NormalPolicy};
/// use objview::geometry::loaders::load_mesh;
/// use std::path::Path;
///
/// let mesh = load_mesh(Path::new("model.obj"))?;
/// let converted = convert_mesh(&mesh.attrib, &mesh.shapes, &mesh.materials, NormalPolicy::Auto);
///
/// println!("三角形数: {}", converted.triangle_count());
/// println!("包围盒: {:?} - {:?}", converted.bounds.min, converted.bounds.max);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```

pub mod attrib;
pub mod bounds;
pub mod convert;
pub mod loaders;
pub mod material;
pub mod math_utils;
pub mod normals;
pub mod smoothing;
pub mod vertex;

// 重新导出常用类型
pub use attrib::{AttribPool, FaceCorner, Shape};
pub use bounds::BoundingBox;
pub use convert::{convert_mesh, ConvertedMesh, NormalPolicy, ShapeBuffer};
pub use material::{Material, Materials};
pub use vertex::DrawVertex;
