//! 几何数学工具模块
//!
//! 网格处理用到的三维向量运算，直接操作 `[f32; 3]`：
//! - 面法线计算（归一化 / 不归一化两种）
//! - 叉乘、点乘、归一化
//!
//! 零长度向量归一化后仍是零向量，不会产生 NaN。

/// 计算三角形 (v0, v1, v2) 的单位面法线
///
/// 法线方向为 `(v1 - v0) × (v2 - v0)`，即逆时针绕序的正面方向。
/// 退化三角形（共线或重合顶点）的叉乘长度为零，此时直接返回零向量；
/// 调用者应把全零法线视为"没有可用法线"。
///
/// # 示例
///
/// ```rust
/// use objview::geometry::math_utils::compute_face_normal;
///
/// let n = compute_face_normal([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
/// assert_eq!(n, [0.0, 0.0, 1.0]);
/// ```
pub fn compute_face_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    normalize(face_cross(v0, v1, v2))
}

/// 计算三角形的未归一化面法线
///
/// 长度等于三角形面积的两倍，用于按面积加权累加顶点法线。
#[inline]
pub fn face_cross(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    cross(sub(v1, v0), sub(v2, v0))
}

/// 计算两个3D向量的叉乘
#[inline]
pub fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// 计算两个3D向量的点乘
#[inline]
pub fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// 把 `b` 累加到 `a`
#[inline]
pub fn add_assign(a: &mut [f32; 3], b: [f32; 3]) {
    a[0] += b[0];
    a[1] += b[1];
    a[2] += b[2];
}

/// 归一化3D向量
///
/// 只有长度严格为零时才保持零向量，其余情况一律缩放到单位长度。
#[inline]
pub fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len2 = dot(v, v);
    if len2 > 0.0 {
        let len = len2.sqrt();
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}
