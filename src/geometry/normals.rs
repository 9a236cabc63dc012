/// 法线合成
///
/// 两种互不替代的策略：
///
/// - **legacy**：按原始顶点索引累加单位面法线，只用来填补个别角缺失的法线，
///   不改变形状和顶点拓扑，也不区分多个平滑组。
/// - **group-aware**：在平滑组划分的输出上累加未归一化的面法线（按面积加权），
///   由于顶点已经按组拆分，硬边两侧的法线不会被混合。

use std::collections::HashMap;

use super::attrib::{AttribPool, Shape};
use super::math_utils::{add_assign, compute_face_normal, face_cross, normalize};

/// legacy 模式的结果：原始顶点索引 → 平滑后的单位法线
pub type VertexNormalMap = HashMap<usize, [f32; 3]>;

/// 按原始顶点索引累加并平均一个形状的面法线
///
/// 零向量（只被退化三角形引用的顶点）保持为零。
pub fn accumulate_vertex_normals(attrib: &AttribPool, shape: &Shape) -> VertexNormalMap {
    let mut normals = VertexNormalMap::new();

    for f in 0..shape.face_count() {
        let face = shape.face(f);
        let n = compute_face_normal(
            attrib.position(face[0].vertex),
            attrib.position(face[1].vertex),
            attrib.position(face[2].vertex),
        );

        for corner in face {
            add_assign(normals.entry(corner.vertex).or_insert([0.0; 3]), n);
        }
    }

    for n in normals.values_mut() {
        *n = normalize(*n);
    }

    normals
}

/// 在平滑组划分的输出上合成全部法线
///
/// 把每个面的未归一化法线加到它三个角的法线槽上，所有形状处理完后
/// 再逐槽归一化。调用前 `attrib.normals` 应该已经按槽清零。
///
/// # Panics
///
/// 任何角缺少法线索引，或索引越界时 panic。
pub fn accumulate_group_normals(attrib: &mut AttribPool, shapes: &[Shape]) {
    for shape in shapes {
        for f in 0..shape.face_count() {
            let face = shape.face(f);
            let n = face_cross(
                attrib.position(face[0].vertex),
                attrib.position(face[1].vertex),
                attrib.position(face[2].vertex),
            );

            for corner in face {
                let slot = corner
                    .normal
                    .expect("partitioned corners always carry a normal index");
                let dst = &mut attrib.normals[3 * slot..3 * slot + 3];
                dst[0] += n[0];
                dst[1] += n[1];
                dst[2] += n[2];
            }
        }
    }

    for slot in attrib.normals.chunks_exact_mut(3) {
        let n = normalize([slot[0], slot[1], slot[2]]);
        slot.copy_from_slice(&n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::attrib::FaceCorner;
    use crate::geometry::smoothing::partition_by_smoothing_group;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        (0..3).all(|k| (a[k] - b[k]).abs() < 1e-5)
    }

    /// 不规则三角剖分的平面：中心顶点的度数与边缘顶点不同
    fn tilted_fan() -> (AttribPool, Shape) {
        // 平面 x + y + z = 1 上的点
        let points: [[f32; 2]; 6] = [
            [0.0, 0.0],
            [2.0, 0.0],
            [1.0, 1.5],
            [-1.0, 2.0],
            [-2.0, -0.5],
            [0.5, -2.0],
        ];
        let mut positions = Vec::new();
        for [x, y] in points {
            positions.extend_from_slice(&[x, y, 1.0 - x - y]);
        }
        let pool = AttribPool {
            positions,
            ..Default::default()
        };

        let c = FaceCorner::position_only;
        let mut shape = Shape::new("fan");
        for i in 1..6 {
            let next = if i == 5 { 1 } else { i + 1 };
            shape.push_face([c(0), c(i), c(next)], None, 1);
        }
        (pool, shape)
    }

    #[test]
    fn test_group_normals_on_plane_match_face_normal() {
        let (pool, shape) = tilted_fan();
        let expected = normalize([1.0, 1.0, 1.0]);

        let mut part = partition_by_smoothing_group(&pool, &[shape]);
        accumulate_group_normals(&mut part.attrib, &part.shapes);

        assert_eq!(part.attrib.normal_count(), 6);
        for i in 0..part.attrib.normal_count() {
            let n = part.attrib.normal(i);
            assert!(approx(n, expected), "normal {} = {:?}", i, n);
        }
    }

    #[test]
    fn test_group_normals_keep_hard_edges() {
        // 两个互相垂直的三角形共享一条边，分属不同平滑组
        let pool = AttribPool {
            positions: vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0,
            ],
            ..Default::default()
        };
        let c = FaceCorner::position_only;
        let mut shape = Shape::new("corner");
        shape.push_face([c(0), c(1), c(2)], None, 1);
        shape.push_face([c(0), c(3), c(1)], None, 2);

        let mut part = partition_by_smoothing_group(&pool, &[shape]);
        accumulate_group_normals(&mut part.attrib, &part.shapes);

        for corner in part.shapes[0].face(0) {
            assert!(approx(part.attrib.normal(corner.normal.unwrap()), [0.0, 0.0, 1.0]));
        }
        for corner in part.shapes[1].face(0) {
            assert!(approx(part.attrib.normal(corner.normal.unwrap()), [0.0, 1.0, 0.0]));
        }
    }

    #[test]
    fn test_group_normals_degenerate_stays_zero() {
        let pool = AttribPool {
            positions: vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0],
            ..Default::default()
        };
        let c = FaceCorner::position_only;
        let mut shape = Shape::new("line");
        shape.push_face([c(0), c(1), c(2)], None, 0);

        let mut part = partition_by_smoothing_group(&pool, &[shape]);
        accumulate_group_normals(&mut part.attrib, &part.shapes);

        assert!(part.attrib.normals.iter().all(|&n| n == 0.0));
    }

    #[test]
    fn test_legacy_uniform_normal() {
        // 平面扇形中每个顶点周围所有面法线都相同
        let (pool, shape) = tilted_fan();
        let expected = normalize([1.0, 1.0, 1.0]);

        let normals = accumulate_vertex_normals(&pool, &shape);

        assert_eq!(normals.len(), 6);
        for (v, n) in &normals {
            assert!(approx(*n, expected), "vertex {} = {:?}", v, n);
        }
    }

    #[test]
    fn test_legacy_averages_adjacent_faces() {
        // 顶点 0 被两个垂直的面共享
        let pool = AttribPool {
            positions: vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0,
            ],
            ..Default::default()
        };
        let c = FaceCorner::position_only;
        let mut shape = Shape::new("corner");
        shape.push_face([c(0), c(1), c(2)], None, 1);
        shape.push_face([c(0), c(3), c(1)], None, 1);

        let normals = accumulate_vertex_normals(&pool, &shape);

        let s = std::f32::consts::FRAC_1_SQRT_2;
        assert!(approx(normals[&0], [0.0, s, s]));
        assert!(approx(normals[&2], [0.0, 0.0, 1.0]));
        assert!(approx(normals[&3], [0.0, 1.0, 0.0]));
    }
}
