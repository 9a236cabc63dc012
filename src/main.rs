//! objview - OBJ 模型查看器
//!
//! # 使用方法
//!
//! ```bash
//! # 指定模型
//! cargo run -- models/cube.obj
//!
//! # 总是按平滑组重建法线，关闭线框
//! cargo run -- models/cube.obj --regen-normals --no-wire
//! ```
//!
//! # 操作
//!
//! - 左键拖动：轨迹球旋转
//! - 中键拖动：平移
//! - 右键拖动：推拉
//! - `W`：线框叠加开关
//! - `C`：背面剔除开关
//! - `Q` / `Esc`：退出

use std::path::Path;

use anyhow::Context;
use objview::core::{log, Config, KeyAction, ViewerState};
use objview::geometry::convert::convert_mesh;
use objview::geometry::loaders::load_mesh;
use objview::gfx::wgpu::{Renderer, WgpuBackend};
use objview::renderer::{build_draw_objects, TextureCache};
use tracing::{debug, error, info, warn};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::PhysicalKey;

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载配置文件（config.toml）并应用命令行参数
/// 2. 初始化日志系统
/// 3. 加载 OBJ 模型并转换成交错顶点数据
/// 4. 创建窗口和 wgpu 设备
/// 5. 上传顶点缓冲区和纹理，创建渲染器
/// 6. 启动主循环
fn main() -> anyhow::Result<()> {
    // 1. 加载配置（在初始化日志之前）
    let mut config = Config::from_file_or_default("config.toml");
    config.apply_args(std::env::args());
    config.validate().context("Invalid configuration")?;

    // 2. 初始化日志系统
    let log_file = config
        .logging
        .file_output
        .then_some(config.logging.log_file.as_str());
    log::init_logger(config.logging.level, config.logging.file_output, log_file);
    info!(version = env!("CARGO_PKG_VERSION"), "objview starting...");

    // 3. 加载模型
    let model_path = config.mesh.path.clone().unwrap_or_default();
    let mesh = load_mesh(Path::new(&model_path))
        .with_context(|| format!("Failed to load model: {}", model_path))?;
    for warning in &mesh.warnings {
        warn!("{}", warning);
    }

    let converted = convert_mesh(&mesh.attrib, &mesh.shapes, &mesh.materials, config.mesh.normals);
    info!(
        shapes = converted.shapes.len(),
        triangles = converted.triangle_count(),
        regenerated_normals = converted.regenerated_normals,
        bmin = ?converted.bounds.min,
        bmax = ?converted.bounds.max,
        "Mesh converted"
    );

    // 4. 创建事件循环和图形后端
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let gfx = WgpuBackend::new(&event_loop, &config)?;

    // 5. 上传资源
    let draw_objects = build_draw_objects(&gfx, &converted);
    let mut textures = TextureCache::new();
    textures
        .ensure_loaded(&gfx, &mesh.materials, &mesh.base_dir)
        .context("Failed to load textures")?;

    let mut renderer = Renderer::new(
        gfx,
        &config,
        draw_objects,
        &mesh.materials,
        &textures,
        converted.bounds,
    )?;

    let mut state = ViewerState::new(&config);
    let size = renderer.window().inner_size();
    state.on_resize(size.width, size.height);

    info!("Entering main loop...");

    // 6. 启动事件循环
    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            WindowEvent::Resized(new_size) => {
                debug!(width = new_size.width, height = new_size.height, "Window resized");
                state.on_resize(new_size.width, new_size.height);
                renderer.resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if state.on_key(code) == KeyAction::Quit {
                    info!("Quit requested, shutting down...");
                    elwt.exit();
                }
            }
            WindowEvent::MouseInput { state: button_state, button, .. } => {
                state.on_mouse_button(button, button_state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = renderer.draw(&state) {
                    error!("Draw failed: {}", e);
                    elwt.exit();
                }
            }
            _ => (),
        },
        Event::AboutToWait => renderer.request_redraw(),
        _ => (),
    })?;

    Ok(())
}
