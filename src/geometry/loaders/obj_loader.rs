/// OBJ 文件加载器
///
/// 使用 tobj crate 加载 Wavefront OBJ 格式的3D模型，保留位置 / 法线 / 纹理坐标
/// 三套独立索引（不合并为单一索引），由后续的转换流程展开。
///
/// tobj 不输出平滑组，并且会给文件中没写 `vt` / `vn` 的面角补上一个现成的索引，
/// 所以另外扫描一遍 OBJ 文本中的 `s` 和 `f` 行，为每个三角化后的三角形记录
/// 它所在的平滑组，以及每个角是否真的带有纹理坐标和法线。
use super::{LoadedMesh, MeshLoader};
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::attrib::{AttribPool, FaceCorner, Shape};
use crate::geometry::material::{Material, Materials};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// OBJ 格式加载器
///
/// # 特性
///
/// - 自动三角化（扇形）
/// - 忽略点和线
/// - 多个对象（`o` / `g`）各自成为一个形状，属性数组合并成一个属性池
/// - 材质库加载失败只记录警告
pub struct ObjLoader;

impl ObjLoader {
    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: true,    // 自动三角化
            single_index: false,  // 保留每个角的独立索引
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        }
    }

    /// 把 tobj 的输出整理成 `LoadedMesh`
    fn assemble(
        models: Vec<tobj::Model>,
        materials: std::result::Result<Vec<tobj::Material>, tobj::LoadError>,
        source: &str,
        base_dir: PathBuf,
    ) -> Result<LoadedMesh> {
        let mut warnings = Vec::new();

        let materials = match materials {
            Ok(materials) => materials,
            Err(e) => {
                warnings.push(format!("材质库加载失败: {}", e));
                Vec::new()
            }
        };
        let materials = Materials::new(
            materials
                .into_iter()
                .map(|m| Material {
                    name: m.name,
                    diffuse: m.diffuse.unwrap_or([0.0; 3]),
                    diffuse_texture: m.diffuse_texture,
                })
                .collect(),
        );

        let triangle_count: usize = models.iter().map(|m| m.mesh.indices.len() / 3).sum();
        let mut triangles = scan_faces(source);
        if triangles.len() != triangle_count {
            warnings.push(format!(
                "面扫描得到 {} 个三角形，与解析结果 {} 不一致，全部按平滑组 0 处理",
                triangles.len(),
                triangle_count
            ));
            triangles = vec![ScannedTriangle::default(); triangle_count];
        }

        let mut attrib = AttribPool::new();
        let mut shapes = Vec::with_capacity(models.len());
        let mut next_triangle = triangles.into_iter();

        for model in models {
            let mesh = model.mesh;

            if mesh.positions.len() % 3 != 0 {
                return Err(MeshLoadError::ParseError(format!(
                    "顶点位置数据不完整: {} 个浮点数",
                    mesh.positions.len()
                ))
                .into());
            }

            let vertex_offset = attrib.vertex_count();
            let normal_offset = attrib.normal_count();
            let texcoord_offset = attrib.texcoord_count();

            attrib.positions.extend_from_slice(&mesh.positions);
            attrib.normals.extend_from_slice(&mesh.normals);
            attrib.texcoords.extend_from_slice(&mesh.texcoords);

            // tobj 的法线 / 纹理坐标索引要么为空，要么和顶点索引一一对应
            let corner = |i: usize, present: CornerAttribs| {
                FaceCorner::new(
                    vertex_offset + mesh.indices[i] as usize,
                    mesh.normal_indices
                        .get(i)
                        .filter(|_| present.normal)
                        .map(|&n| normal_offset + n as usize),
                    mesh.texcoord_indices
                        .get(i)
                        .filter(|_| present.texcoord)
                        .map(|&t| texcoord_offset + t as usize),
                )
            };

            let mut shape = Shape::new(model.name.clone());
            for f in 0..mesh.indices.len() / 3 {
                let scanned = next_triangle.next().unwrap_or_default();
                shape.push_face(
                    [
                        corner(3 * f, scanned.corners[0]),
                        corner(3 * f + 1, scanned.corners[1]),
                        corner(3 * f + 2, scanned.corners[2]),
                    ],
                    mesh.material_id,
                    scanned.group,
                );
            }
            shapes.push(shape);
        }

        let loaded = LoadedMesh {
            attrib,
            shapes,
            materials,
            warnings,
            base_dir,
        };

        loaded.validate().map_err(MeshLoadError::ValidationError)?;

        Ok(loaded)
    }
}

impl MeshLoader for ObjLoader {
    fn load_from_file(path: &Path) -> Result<LoadedMesh> {
        // 检查文件是否存在
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let start = Instant::now();

        let (models, materials) = tobj::load_obj(path, &Self::load_options())
            .map_err(|e| MeshLoadError::ParseError(format!("tobj 解析失败: {}", e)))?;

        let source = std::fs::read_to_string(path)?;

        let base_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let loaded = Self::assemble(models, materials, &source, base_dir)?;
        log_statistics(&loaded, start.elapsed().as_millis());

        Ok(loaded)
    }

    fn load_from_memory(data: &[u8]) -> Result<LoadedMesh> {
        let start = Instant::now();

        let mut reader = Cursor::new(data);
        let (models, materials) = tobj::load_obj_buf(&mut reader, &Self::load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|e| MeshLoadError::ParseError(format!("tobj 解析失败: {}", e)))?;

        let source = String::from_utf8_lossy(data);

        let loaded = Self::assemble(models, materials, &source, PathBuf::from("."))?;
        log_statistics(&loaded, start.elapsed().as_millis());

        Ok(loaded)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}

/// 一个面角在文件中写明了哪些属性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CornerAttribs {
    texcoord: bool,
    normal: bool,
}

impl CornerAttribs {
    /// 解析 `v`、`v/t`、`v//n`、`v/t/n`
    fn parse(token: &str) -> Self {
        let mut parts = token.split('/').skip(1);
        let texcoord = parts.next().is_some_and(|t| !t.is_empty());
        let normal = parts.next().is_some_and(|n| !n.is_empty());
        Self { texcoord, normal }
    }
}

/// 扫描时无法对齐的情况下，保留 tobj 给出的索引
impl Default for CornerAttribs {
    fn default() -> Self {
        Self {
            texcoord: true,
            normal: true,
        }
    }
}

/// 扫描得到的一个三角形
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ScannedTriangle {
    group: u32,
    corners: [CornerAttribs; 3],
}

/// 扫描 OBJ 文本，按 tobj 的顺序为每个三角化后的三角形返回平滑组和面角属性
///
/// `s off` 和 `s 0` 都表示平滑组 0；n 边形按扇形 (0, i, i + 1) 三角化，产生 n - 2 个三角形。
fn scan_faces(source: &str) -> Vec<ScannedTriangle> {
    let mut current = 0u32;
    let mut triangles = Vec::new();

    for line in source.lines() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("s") => {
                current = match tokens.next() {
                    Some("off") | None => 0,
                    Some(id) => id.parse().unwrap_or(0),
                };
            }
            Some("f") => {
                let corners: Vec<CornerAttribs> = tokens.map(CornerAttribs::parse).collect();
                for i in 1..corners.len().saturating_sub(1) {
                    triangles.push(ScannedTriangle {
                        group: current,
                        corners: [corners[0], corners[i], corners[i + 1]],
                    });
                }
            }
            _ => {}
        }
    }

    triangles
}

/// 输出加载统计信息
fn log_statistics(mesh: &LoadedMesh, parse_ms: u128) {
    for warning in &mesh.warnings {
        warn!("{}", warning);
    }

    info!("Parsing time: {} [ms]", parse_ms);
    info!(
        vertices = mesh.attrib.vertex_count(),
        normals = mesh.attrib.normal_count(),
        texcoords = mesh.attrib.texcoord_count(),
        materials = mesh.materials.loaded_count(),
        shapes = mesh.shapes.len(),
        triangles = mesh.triangle_count(),
        "成功加载 OBJ 文件"
    );

    for (i, material) in mesh.materials.iter().enumerate() {
        debug!(
            "material[{}] = {}, diffuse_texname = {}",
            i,
            material.name,
            material.texture_name().unwrap_or("")
        );
    }
}
