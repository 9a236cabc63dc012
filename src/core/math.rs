//! 数学库模块
//!
//! 基于 `nalgebra` 的类型别名和少量矩阵辅助函数，供相机和渲染器使用。
//! 网格处理（法线、包围盒）直接操作 `[f32; 3]`，见 `geometry::math_utils`。

pub use nalgebra::{Matrix4 as Mat4, Point3, Unit, UnitQuaternion, Vector3 as Vec3};

pub type Vector3 = Vec3<f32>;
pub type Matrix4 = Mat4<f32>;
pub type Quaternion = UnitQuaternion<f32>;

/// 数学常量
pub mod constants {
    /// 角度转弧度的系数
    pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;
}

/// 矩阵辅助函数
pub mod matrix {
    use super::*;

    /// OpenGL 裁剪空间 (z ∈ [-1, 1]) 到 wgpu 裁剪空间 (z ∈ [0, 1]) 的修正矩阵
    #[rustfmt::skip]
    pub fn opengl_to_wgpu() -> Matrix4 {
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 0.5, 0.5,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// 创建平移矩阵
    pub fn translation(v: &Vector3) -> Matrix4 {
        Matrix4::new_translation(v)
    }

    /// 创建均匀缩放矩阵
    pub fn scaling(s: f32) -> Matrix4 {
        Matrix4::new_scaling(s)
    }

    /// 从四元数创建旋转矩阵
    pub fn from_quaternion(quat: &Quaternion) -> Matrix4 {
        quat.to_homogeneous()
    }

    /// 创建 wgpu 深度范围的透视投影矩阵
    ///
    /// `fov_y_degrees` 为垂直视场角（度数）。
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Matrix4 {
        opengl_to_wgpu()
            * Matrix4::new_perspective(aspect, fov_y_degrees * constants::DEG_TO_RAD, near, far)
    }

    /// 创建 Look-At 视图矩阵
    pub fn look_at(eye: &Vector3, target: &Vector3, up: &Vector3) -> Matrix4 {
        Matrix4::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
    }
}
