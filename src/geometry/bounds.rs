/// 轴对齐包围盒
///
/// 在网格转换时对所有输出顶点位置逐分量取 min / max。
/// 没有任何顶点时保持哨兵值 `(+∞, -∞)`。

/// 轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    /// 创建空包围盒（哨兵值）
    pub fn empty() -> Self {
        Self {
            min: [f32::INFINITY; 3],
            max: [f32::NEG_INFINITY; 3],
        }
    }

    /// 把一个点并入包围盒
    #[inline]
    pub fn extend(&mut self, p: [f32; 3]) {
        for k in 0..3 {
            self.min[k] = self.min[k].min(p[k]);
            self.max[k] = self.max[k].max(p[k]);
        }
    }

    /// 是否还没有并入任何点
    pub fn is_empty(&self) -> bool {
        (0..3).any(|k| self.min[k] > self.max[k])
    }

    /// 包围盒中心
    pub fn center(&self) -> [f32; 3] {
        [
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
            0.5 * (self.min[2] + self.max[2]),
        ]
    }

    /// 三个轴上最大的半边长
    pub fn max_half_extent(&self) -> f32 {
        (0..3)
            .map(|k| 0.5 * (self.max[k] - self.min[k]))
            .fold(0.0, f32::max)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_keeps_sentinels() {
        let b = BoundingBox::empty();
        assert!(b.is_empty());
        assert_eq!(b.min, [f32::INFINITY; 3]);
        assert_eq!(b.max, [f32::NEG_INFINITY; 3]);
    }

    #[test]
    fn test_unit_cube_bounds() {
        let mut b = BoundingBox::empty();
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for z in [-1.0, 1.0] {
                    b.extend([x, y, z]);
                }
            }
        }

        assert!(!b.is_empty());
        assert_eq!(b.min, [-1.0, -1.0, -1.0]);
        assert_eq!(b.max, [1.0, 1.0, 1.0]);
        assert_eq!(b.center(), [0.0, 0.0, 0.0]);
        assert_eq!(b.max_half_extent(), 1.0);
    }

    #[test]
    fn test_single_point_is_not_empty() {
        let mut b = BoundingBox::empty();
        b.extend([3.0, -2.0, 5.0]);

        assert!(!b.is_empty());
        assert_eq!(b.min, b.max);
        assert_eq!(b.max_half_extent(), 0.0);
    }
}
