/// 顶点属性池与形状定义
///
/// OBJ 风格的索引网格：位置、法线、纹理坐标分别存放在三个扁平数组里，
/// 每个三角形的每个角独立地索引这三个数组。法线和纹理坐标可能整体缺失，
/// 也可能只在部分角上缺失，缺失用 `None` 表示。

/// 三角形的一个角
///
/// `vertex` 总是有效；`normal` / `texcoord` 可能缺失。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceCorner {
    /// 位置数组中的顶点索引
    pub vertex: usize,
    /// 法线数组中的索引
    pub normal: Option<usize>,
    /// 纹理坐标数组中的索引
    pub texcoord: Option<usize>,
}

impl FaceCorner {
    #[inline]
    pub fn new(vertex: usize, normal: Option<usize>, texcoord: Option<usize>) -> Self {
        Self {
            vertex,
            normal,
            texcoord,
        }
    }

    /// 只有位置索引的角
    #[inline]
    pub fn position_only(vertex: usize) -> Self {
        Self::new(vertex, None, None)
    }
}

/// 顶点属性池
///
/// # 不变量
///
/// - `positions.len()` 是 3 的倍数
/// - `normals.len()` 是 3 的倍数（可以为空）
/// - `texcoords.len()` 是 2 的倍数（可以为空）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttribPool {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub texcoords: Vec<f32>,
}

impl AttribPool {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn normal_count(&self) -> usize {
        self.normals.len() / 3
    }

    #[inline]
    pub fn texcoord_count(&self) -> usize {
        self.texcoords.len() / 2
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    /// 第 `i` 个顶点位置，越界时 panic
    #[inline]
    pub fn position(&self, i: usize) -> [f32; 3] {
        [
            self.positions[3 * i],
            self.positions[3 * i + 1],
            self.positions[3 * i + 2],
        ]
    }

    /// 第 `i` 个法线，越界时 panic
    #[inline]
    pub fn normal(&self, i: usize) -> [f32; 3] {
        [
            self.normals[3 * i],
            self.normals[3 * i + 1],
            self.normals[3 * i + 2],
        ]
    }

    /// 第 `i` 个纹理坐标，越界时 panic
    #[inline]
    pub fn texcoord(&self, i: usize) -> [f32; 2] {
        [self.texcoords[2 * i], self.texcoords[2 * i + 1]]
    }
}

/// 形状：一组具名的三角形
///
/// 三个按面对齐的数组：
/// - `corners`：每个面 3 个角
/// - `material_ids`：每个面一个材质 ID，整个数组可以为空（表示没有材质分配）
/// - `smoothing_group_ids`：每个面一个平滑组 ID，0 表示硬边
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub name: String,
    pub corners: Vec<FaceCorner>,
    pub material_ids: Vec<Option<usize>>,
    pub smoothing_group_ids: Vec<u32>,
}

impl Shape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 追加一个面，保持三个数组对齐
    ///
    /// 当 `material_id` 为 `None` 且此前没有任何材质分配时，
    /// `material_ids` 保持为空。
    pub fn push_face(
        &mut self,
        corners: [FaceCorner; 3],
        material_id: Option<usize>,
        smoothing_group_id: u32,
    ) {
        let face = self.face_count();
        if material_id.is_some() && self.material_ids.len() < face {
            self.material_ids.resize(face, None);
        }
        if material_id.is_some() || !self.material_ids.is_empty() {
            self.material_ids.push(material_id);
        }

        self.corners.extend_from_slice(&corners);
        self.smoothing_group_ids.push(smoothing_group_id);
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.corners.len() / 3
    }

    /// 第 `f` 个面的三个角
    #[inline]
    pub fn face(&self, f: usize) -> &[FaceCorner] {
        &self.corners[3 * f..3 * f + 3]
    }

    /// 第 `f` 个面的材质 ID；没有材质分配时返回 `None`
    #[inline]
    pub fn material_id(&self, f: usize) -> Option<usize> {
        self.material_ids.get(f).copied().flatten()
    }

    pub fn has_material_ids(&self) -> bool {
        !self.material_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners(a: usize, b: usize, c: usize) -> [FaceCorner; 3] {
        [
            FaceCorner::position_only(a),
            FaceCorner::position_only(b),
            FaceCorner::position_only(c),
        ]
    }

    #[test]
    fn test_pool_accessors() {
        let pool = AttribPool {
            positions: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            normals: vec![0.0, 0.0, 1.0],
            texcoords: vec![0.25, 0.75],
        };

        assert_eq!(pool.vertex_count(), 2);
        assert_eq!(pool.normal_count(), 1);
        assert_eq!(pool.texcoord_count(), 1);
        assert_eq!(pool.position(1), [3.0, 4.0, 5.0]);
        assert_eq!(pool.normal(0), [0.0, 0.0, 1.0]);
        assert_eq!(pool.texcoord(0), [0.25, 0.75]);
    }

    #[test]
    fn test_push_face_without_materials() {
        let mut shape = Shape::new("tri");
        shape.push_face(corners(0, 1, 2), None, 0);
        shape.push_face(corners(2, 1, 3), None, 1);

        assert_eq!(shape.face_count(), 2);
        assert!(!shape.has_material_ids());
        assert_eq!(shape.smoothing_group_ids, vec![0, 1]);
        assert_eq!(shape.face(1)[0].vertex, 2);
        assert_eq!(shape.material_id(1), None);
    }

    #[test]
    fn test_push_face_backfills_material_ids() {
        let mut shape = Shape::new("mixed");
        shape.push_face(corners(0, 1, 2), None, 0);
        shape.push_face(corners(0, 2, 3), Some(4), 0);
        shape.push_face(corners(0, 3, 4), None, 0);

        assert_eq!(shape.material_ids, vec![None, Some(4), None]);
        assert_eq!(shape.material_id(1), Some(4));
    }
}
