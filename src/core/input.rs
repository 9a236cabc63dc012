//! 查看器状态与输入处理
//!
//! `ViewerState` 保存窗口尺寸、鼠标按键、轨迹球旋转以及 eye/lookat/up 相机向量。
//! 事件循环在两帧之间调用这里的处理函数修改状态，渲染器在绘制时只读取它。

use tracing::debug;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use super::config::Config;
use super::math::{matrix, Matrix4, Quaternion, Vector3};
use super::trackball::trackball;
use crate::geometry::bounds::BoundingBox;

/// 鼠标平移 / 推拉的灵敏度
const TRANSLATE_SCALE: f32 = 2.0;
/// 轨迹球旋转的灵敏度
const ROTATE_SCALE: f32 = 1.0;

/// 按键处理的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// 没有对应动作
    None,
    /// 线框叠加开关已切换
    ToggledWire,
    /// 背面剔除开关已切换（背面改画线框）
    ToggledCull,
    /// 请求退出
    Quit,
}

/// 查看器的全部可变状态
#[derive(Debug, Clone)]
pub struct ViewerState {
    pub width: u32,
    pub height: u32,

    pub prev_mouse: (f64, f64),
    pub left_pressed: bool,
    pub middle_pressed: bool,
    pub right_pressed: bool,

    /// 累积的模型旋转
    pub curr_quat: Quaternion,
    /// 最近一次拖动产生的增量旋转
    pub prev_quat: Quaternion,

    pub eye: Vector3,
    pub lookat: Vector3,
    pub up: Vector3,

    pub show_wire: bool,
    /// 实体只画正面，背面用线框画出
    pub cull_face: bool,

    pub fov: f32,
    pub near_clip: f32,
    pub far_clip: f32,
}

impl ViewerState {
    /// 根据配置创建初始状态
    pub fn new(config: &Config) -> Self {
        let camera = &config.camera;
        Self {
            width: config.window.width,
            height: config.window.height,
            prev_mouse: (0.0, 0.0),
            left_pressed: false,
            middle_pressed: false,
            right_pressed: false,
            curr_quat: Quaternion::identity(),
            prev_quat: Quaternion::identity(),
            eye: Vector3::from(camera.eye),
            lookat: Vector3::from(camera.lookat),
            up: Vector3::from(camera.up),
            show_wire: config.graphics.show_wire,
            cull_face: config.graphics.cull_face,
            fov: camera.fov,
            near_clip: camera.near_clip,
            far_clip: camera.far_clip,
        }
    }

    /// 窗口尺寸变化
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// 处理按下（或重复）的按键
    pub fn on_key(&mut self, key: KeyCode) -> KeyAction {
        match key {
            KeyCode::KeyQ | KeyCode::Escape => KeyAction::Quit,
            KeyCode::KeyW => {
                self.show_wire = !self.show_wire;
                debug!(show_wire = self.show_wire, "Toggled wireframe");
                KeyAction::ToggledWire
            }
            KeyCode::KeyC => {
                self.cull_face = !self.cull_face;
                debug!(cull_face = self.cull_face, "Toggled back-face lines");
                KeyAction::ToggledCull
            }
            _ => KeyAction::None,
        }
    }

    /// 处理鼠标按键
    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => {
                self.left_pressed = pressed;
                if pressed {
                    self.prev_quat = Quaternion::identity();
                }
            }
            MouseButton::Middle => self.middle_pressed = pressed,
            MouseButton::Right => self.right_pressed = pressed,
            _ => {}
        }
    }

    /// 处理鼠标移动
    ///
    /// 左键拖动旋转模型，中键拖动平移相机，右键拖动沿 z 轴推拉相机。
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let width = self.width.max(1) as f32;
        let height = self.height.max(1) as f32;
        let (prev_x, prev_y) = (self.prev_mouse.0 as f32, self.prev_mouse.1 as f32);
        let (mouse_x, mouse_y) = (x as f32, y as f32);

        if self.left_pressed {
            self.prev_quat = trackball(
                ROTATE_SCALE * (2.0 * prev_x - width) / width,
                ROTATE_SCALE * (height - 2.0 * prev_y) / height,
                ROTATE_SCALE * (2.0 * mouse_x - width) / width,
                ROTATE_SCALE * (height - 2.0 * mouse_y) / height,
            );
            self.curr_quat = self.prev_quat * self.curr_quat;
            self.curr_quat.renormalize();
        } else if self.middle_pressed {
            let dx = TRANSLATE_SCALE * (mouse_x - prev_x) / width;
            let dy = TRANSLATE_SCALE * (mouse_y - prev_y) / height;
            self.eye.x -= dx;
            self.lookat.x -= dx;
            self.eye.y += dy;
            self.lookat.y += dy;
        } else if self.right_pressed {
            let dz = TRANSLATE_SCALE * (mouse_y - prev_y) / height;
            self.eye.z += dz;
            self.lookat.z += dz;
        }

        self.prev_mouse = (x, y);
    }

    /// 视图矩阵
    pub fn view_matrix(&self) -> Matrix4 {
        matrix::look_at(&self.eye, &self.lookat, &self.up)
    }

    /// 投影矩阵（wgpu 深度范围）
    pub fn projection_matrix(&self) -> Matrix4 {
        let aspect = self.width.max(1) as f32 / self.height.max(1) as f32;
        matrix::perspective(self.fov, aspect, self.near_clip, self.far_clip)
    }

    /// 模型矩阵：先把网格中心移到原点并缩放到单位尺寸，再应用轨迹球旋转
    pub fn model_matrix(&self, bounds: &BoundingBox) -> Matrix4 {
        let rotation = matrix::from_quaternion(&self.curr_quat);
        if bounds.is_empty() {
            return rotation;
        }

        let extent = bounds.max_half_extent();
        let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };
        let center = Vector3::from(bounds.center());

        rotation * matrix::scaling(scale) * matrix::translation(&-center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector4;

    fn state() -> ViewerState {
        let mut config = Config::default();
        config.window.width = 100;
        config.window.height = 100;
        ViewerState::new(&config)
    }

    #[test]
    fn test_key_toggles() {
        let mut s = state();
        let wire = s.show_wire;

        assert_eq!(s.on_key(KeyCode::KeyW), KeyAction::ToggledWire);
        assert_eq!(s.show_wire, !wire);
        assert_eq!(s.on_key(KeyCode::KeyC), KeyAction::ToggledCull);
        assert!(s.cull_face);
        assert_eq!(s.on_key(KeyCode::Escape), KeyAction::Quit);
        assert_eq!(s.on_key(KeyCode::KeyQ), KeyAction::Quit);
        assert_eq!(s.on_key(KeyCode::KeyZ), KeyAction::None);
    }

    #[test]
    fn test_middle_drag_pans_eye_and_lookat() {
        let mut s = state();
        s.on_cursor_moved(50.0, 50.0);
        s.on_mouse_button(MouseButton::Middle, ElementState::Pressed);
        s.on_cursor_moved(60.0, 40.0);

        // dx = 2 * 10 / 100, dy = 2 * -10 / 100
        assert!((s.eye.x + 0.2).abs() < 1e-6);
        assert!((s.lookat.x + 0.2).abs() < 1e-6);
        assert!((s.eye.y + 0.2).abs() < 1e-6);
        assert!((s.lookat.y + 0.2).abs() < 1e-6);
        assert!((s.eye.z - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_right_drag_dollies() {
        let mut s = state();
        s.on_cursor_moved(0.0, 0.0);
        s.on_mouse_button(MouseButton::Right, ElementState::Pressed);
        s.on_cursor_moved(0.0, 25.0);

        assert!((s.eye.z - 3.5).abs() < 1e-6);
        assert!((s.lookat.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_left_drag_rotates() {
        let mut s = state();
        s.on_cursor_moved(50.0, 50.0);
        s.on_mouse_button(MouseButton::Left, ElementState::Pressed);
        s.on_cursor_moved(60.0, 50.0);

        assert!(s.curr_quat.angle() > 0.0);
        assert!(s.prev_quat.angle() > 0.0);

        s.on_mouse_button(MouseButton::Left, ElementState::Released);
        let before = s.curr_quat;
        s.on_cursor_moved(90.0, 90.0);
        assert_eq!(s.curr_quat, before);
    }

    #[test]
    fn test_model_matrix_frames_bounds() {
        let s = state();
        let mut bounds = BoundingBox::empty();
        bounds.extend([2.0, 2.0, 2.0]);
        bounds.extend([6.0, 4.0, 2.0]);

        let m = s.model_matrix(&bounds);
        let corner = m * Vector4::new(6.0, 4.0, 2.0, 1.0);

        // 中心 (4, 3, 2)，最大半边长 2
        assert!((corner.x - 1.0).abs() < 1e-6);
        assert!((corner.y - 0.5).abs() < 1e-6);
        assert!(corner.z.abs() < 1e-6);
    }
}
