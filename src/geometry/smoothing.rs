/// 平滑组划分
///
/// 把每个形状的面按平滑组 ID 分组，每组重建一个新形状，并且只在组内共享顶点。
/// 平滑组 0 表示硬边：组内也不共享顶点，每个角都生成一个新顶点。
///
/// 输出的属性池里法线数组与顶点数组一一对应且全部为零，
/// 随后由 [`crate::geometry::normals::accumulate_group_normals`] 填充。
///
/// ```text
/// 输入形状 (面带平滑组 ID)
///     ↓ 按 (组 ID, 原始顺序) 稳定排序
/// 连续的同组面
///     ↓ 组内 remap: 输入顶点 → 输出顶点
/// 每组一个输出形状
/// ```

use std::collections::HashMap;

use super::attrib::{AttribPool, FaceCorner, Shape};

/// 划分结果：新的属性池和按组拆分后的形状
#[derive(Debug, Clone, Default)]
pub struct SmoothingPartition {
    pub attrib: AttribPool,
    pub shapes: Vec<Shape>,
}

/// 形状中是否有平滑组 ID 大于 0 的面
pub fn has_smoothing_group(shape: &Shape) -> bool {
    shape.smoothing_group_ids.iter().any(|&id| id > 0)
}

/// 按平滑组划分所有形状
///
/// # Panics
///
/// 任何形状的 `smoothing_group_ids` 长度与面数不一致，或角的顶点索引越界时 panic。
pub fn partition_by_smoothing_group(attrib: &AttribPool, shapes: &[Shape]) -> SmoothingPartition {
    let mut out = SmoothingPartition::default();

    for shape in shapes {
        let face_count = shape.face_count();
        assert_eq!(
            shape.smoothing_group_ids.len(),
            face_count,
            "shape '{}' has no per-face smoothing group ids",
            shape.name
        );

        let mut sorted: Vec<(u32, usize)> = shape
            .smoothing_group_ids
            .iter()
            .copied()
            .zip(0..face_count)
            .collect();
        sorted.sort_by_key(|&(group, _)| group);

        let mut begin = 0;
        while begin < sorted.len() {
            let group = sorted[begin].0;
            let end = sorted[begin..]
                .iter()
                .position(|&(id, _)| id != group)
                .map_or(sorted.len(), |len| begin + len);

            out.shapes.push(build_group_shape(
                attrib,
                shape,
                &sorted[begin..end],
                &mut out.attrib,
            ));
            begin = end;
        }
    }

    out
}

/// 用一段同组的面构建一个输出形状
fn build_group_shape(
    input: &AttribPool,
    shape: &Shape,
    run: &[(u32, usize)],
    output: &mut AttribPool,
) -> Shape {
    let group = run[0].0;
    let copy_texcoords = input.has_texcoords();
    let mut out_shape = Shape::new(shape.name.clone());
    let mut remap: HashMap<usize, usize> = HashMap::new();

    for &(_, face) in run {
        let mut corners = [FaceCorner::position_only(0); 3];

        for (slot, corner) in corners.iter_mut().zip(shape.face(face)) {
            let shared = if group != 0 {
                remap.get(&corner.vertex).copied()
            } else {
                None
            };

            let index = match shared {
                Some(index) => index,
                None => {
                    let index = output.vertex_count();
                    output.positions.extend_from_slice(&input.position(corner.vertex));
                    output.normals.extend_from_slice(&[0.0; 3]);
                    if copy_texcoords {
                        // 纹理坐标与顶点一一对应，没有纹理坐标的角填零占位
                        let uv = corner.texcoord.map_or([0.0; 2], |t| input.texcoord(t));
                        output.texcoords.extend_from_slice(&uv);
                    }
                    remap.insert(corner.vertex, index);
                    index
                }
            };

            *slot = FaceCorner::new(index, Some(index), corner.texcoord.map(|_| index));
        }

        let material_id = if shape.has_material_ids() {
            shape.material_id(face)
        } else {
            None
        };
        out_shape.push_face(corners, material_id, group);
    }

    // 输入有材质分配时，输出按面对齐保留（包括全为 None 的情况）
    if shape.has_material_ids() && out_shape.material_ids.is_empty() {
        out_shape.material_ids = vec![None; out_shape.face_count()];
    }

    out_shape
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 平面上的 2x2 网格（9 个顶点，8 个三角形），全部位于 z = 0
    fn grid_pool() -> AttribPool {
        let mut positions = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                positions.extend_from_slice(&[x as f32, y as f32, 0.0]);
            }
        }
        AttribPool {
            positions,
            ..Default::default()
        }
    }

    fn grid_shape(group: u32) -> Shape {
        let mut shape = Shape::new("grid");
        for y in 0..2 {
            for x in 0..2 {
                let i = y * 3 + x;
                let c = |v: usize| FaceCorner::position_only(v);
                shape.push_face([c(i), c(i + 1), c(i + 4)], None, group);
                shape.push_face([c(i), c(i + 4), c(i + 3)], None, group);
            }
        }
        shape
    }

    #[test]
    fn test_group_zero_never_shares_vertices() {
        let shape = grid_shape(0);
        let part = partition_by_smoothing_group(&grid_pool(), &[shape.clone()]);

        assert_eq!(part.shapes.len(), 1);
        assert_eq!(part.attrib.vertex_count(), 3 * shape.face_count());
        assert_eq!(part.attrib.normal_count(), part.attrib.vertex_count());
        assert!(part.attrib.normals.iter().all(|&n| n == 0.0));
    }

    #[test]
    fn test_single_group_collapses_to_distinct_vertices() {
        let part = partition_by_smoothing_group(&grid_pool(), &[grid_shape(1)]);

        assert_eq!(part.shapes.len(), 1);
        assert_eq!(part.attrib.vertex_count(), 9);
        for corner in &part.shapes[0].corners {
            assert_eq!(corner.normal, Some(corner.vertex));
            assert_eq!(corner.texcoord, None);
        }
    }

    #[test]
    fn test_groups_split_shared_vertices() {
        // 两个三角形共享边 (1, 2)，但属于不同平滑组
        let pool = AttribPool {
            positions: vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                1.0, 1.0, 1.0,
            ],
            ..Default::default()
        };
        let c = FaceCorner::position_only;
        let mut shape = Shape::new("wedge");
        shape.push_face([c(0), c(1), c(2)], Some(0), 2);
        shape.push_face([c(2), c(1), c(3)], Some(1), 1);

        let part = partition_by_smoothing_group(&pool, &[shape]);

        // 组 1 排在组 2 之前
        assert_eq!(part.shapes.len(), 2);
        assert_eq!(part.shapes[0].smoothing_group_ids, vec![1]);
        assert_eq!(part.shapes[1].smoothing_group_ids, vec![2]);
        assert_eq!(part.shapes[0].material_ids, vec![Some(1)]);
        assert_eq!(part.shapes[1].material_ids, vec![Some(0)]);
        assert_eq!(part.attrib.vertex_count(), 6);
        assert_eq!(part.attrib.position(0), [0.0, 1.0, 0.0]);
        assert_eq!(part.shapes[0].name, "wedge");
    }

    #[test]
    fn test_sort_is_stable_within_group() {
        let pool = grid_pool();
        let c = FaceCorner::position_only;
        let mut shape = Shape::new("order");
        shape.push_face([c(0), c(1), c(4)], None, 3);
        shape.push_face([c(1), c(2), c(5)], None, 0);
        shape.push_face([c(3), c(4), c(7)], None, 3);

        let part = partition_by_smoothing_group(&pool, &[shape]);

        assert_eq!(part.shapes.len(), 2);
        let group3 = &part.shapes[1];
        assert_eq!(group3.face_count(), 2);
        // 先处理原始的第 0 个面，再处理第 2 个面；顶点 4 在组内共享
        assert_eq!(part.attrib.position(group3.face(0)[0].vertex), [0.0, 0.0, 0.0]);
        assert_eq!(part.attrib.position(group3.face(1)[0].vertex), [0.0, 1.0, 0.0]);
        assert_eq!(group3.face(0)[2].vertex, group3.face(1)[1].vertex);
    }

    #[test]
    fn test_texcoords_follow_vertices() {
        let pool = AttribPool {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: Vec::new(),
            texcoords: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        };
        let mut shape = Shape::new("uv");
        shape.push_face(
            [
                FaceCorner::new(0, None, Some(0)),
                FaceCorner::new(1, None, Some(1)),
                FaceCorner::new(2, None, None),
            ],
            None,
            1,
        );

        let part = partition_by_smoothing_group(&pool, &[shape]);
        let face = part.shapes[0].face(0);

        assert_eq!(face[0].texcoord, Some(face[0].vertex));
        assert_eq!(face[2].texcoord, None);
        assert_eq!(part.attrib.texcoord_count(), part.attrib.vertex_count());
        assert_eq!(part.attrib.texcoord(face[1].vertex), [1.0, 0.0]);
        assert_eq!(part.attrib.texcoord(face[2].vertex), [0.0, 0.0]);
    }

    #[test]
    #[should_panic]
    fn test_missing_group_ids_panics() {
        let mut shape = grid_shape(1);
        shape.smoothing_group_ids.clear();
        partition_by_smoothing_group(&grid_pool(), &[shape]);
    }

    #[test]
    fn test_has_smoothing_group() {
        assert!(!has_smoothing_group(&grid_shape(0)));
        assert!(has_smoothing_group(&grid_shape(5)));
    }
}
