//! 虚拟轨迹球
//!
//! 把两次鼠标位置（归一化到 [-1, 1] 的窗口坐标）投影到一个虚拟球面上，
//! 得到这次拖动对应的旋转四元数。靠近球心处投影到球面，远离球心处投影到
//! 双曲面，使拖出窗口边缘时旋转仍然连续。

use super::math::{Quaternion, Unit, Vector3};

/// 虚拟球半径（相对于归一化窗口坐标）
pub const TRACKBALL_SIZE: f32 = 0.8;

/// 计算从 `(p1x, p1y)` 拖动到 `(p2x, p2y)` 的旋转
///
/// 坐标都是归一化窗口坐标：x 向右、y 向上，范围 [-1, 1]。
/// 两点相同时返回单位四元数。
pub fn trackball(p1x: f32, p1y: f32, p2x: f32, p2y: f32) -> Quaternion {
    if p1x == p2x && p1y == p2y {
        return Quaternion::identity();
    }

    let p1 = Vector3::new(p1x, p1y, project_to_sphere(TRACKBALL_SIZE, p1x, p1y));
    let p2 = Vector3::new(p2x, p2y, project_to_sphere(TRACKBALL_SIZE, p2x, p2y));

    let axis = p1.cross(&p2);
    let Some(axis) = Unit::try_new(axis, 1e-12) else {
        return Quaternion::identity();
    };

    let t = ((p1 - p2).norm() / (2.0 * TRACKBALL_SIZE)).clamp(-1.0, 1.0);
    let phi = 2.0 * t.asin();

    Quaternion::from_axis_angle(&axis, phi)
}

/// 把 (x, y) 投影到半径为 `r` 的球面，或在球外投影到双曲面
fn project_to_sphere(r: f32, x: f32, y: f32) -> f32 {
    let d = (x * x + y * y).sqrt();
    if d < r * std::f32::consts::FRAC_1_SQRT_2 {
        (r * r - d * d).sqrt()
    } else {
        let t = r / std::f32::consts::SQRT_2;
        t * t / d
    }
}
